use std::path::Path;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::fs;
use crate::utils::SubmissionFailure;

/// Reads the image and returns its standard base64 encoding.
pub async fn encode_image(path: impl AsRef<Path>) -> Result<String, SubmissionFailure> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .await
        .map_err(|e| SubmissionFailure::EncodingFailed(format!("{}: {}", path.display(), e)))?;

    if bytes.is_empty() {
        return Err(SubmissionFailure::EncodingFailed(format!(
            "{} is empty",
            path.display()
        )));
    }

    Ok(STANDARD.encode(bytes))
}
