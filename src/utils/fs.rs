use std::io;
use std::path::{Path, PathBuf};
use chrono::Utc;
use tokio::fs;
use crate::utils::ValuerResult;

/// Creates the capture directory (and parents) if missing.
pub async fn ensure_dir(path: impl AsRef<Path>) -> ValuerResult<()> {
    fs::create_dir_all(path.as_ref()).await?;
    Ok(())
}

/// Deletes `path` if it lives inside `dir`.
///
/// Returns whether a file was removed. Paths outside `dir` and files that are
/// already gone are left alone.
pub async fn remove_owned_file(dir: &Path, path: &Path) -> ValuerResult<bool> {
    if !path.starts_with(dir) {
        return Ok(false);
    }
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Builds a unique, timestamped file path inside `dir`.
///
/// `prefix-YYYYmmddHHMMSSfff.ext`
pub fn timestamped_path(dir: &Path, prefix: &str, ext: &str) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
    let mut candidate = dir.join(format!("{prefix}-{stamp}.{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{prefix}-{stamp}-{n}.{ext}"));
        n += 1;
    }
    candidate
}
