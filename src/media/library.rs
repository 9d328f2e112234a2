//! Picking an existing image from local storage.

use std::path::Path;
use tokio::fs;
use tracing::debug;
use crate::core::{ImageReference, ImageSource};
use crate::utils::{AcquisitionFailure, format_from_extension, timestamped_path};

/// Copies the selected image into `capture_dir` and returns a reference to the copy.
///
/// `None` means the picker was dismissed.
pub(crate) async fn import_from_library(
    selection: Option<&Path>,
    capture_dir: &Path,
) -> Result<ImageReference, AcquisitionFailure> {
    let Some(selected) = selection else {
        return Err(AcquisitionFailure::Cancelled);
    };

    let format = format_from_extension(selected).map_err(AcquisitionFailure::pick)?;
    let meta = fs::metadata(selected)
        .await
        .map_err(|e| AcquisitionFailure::pick(format!("{}: {}", selected.display(), e)))?;
    if !meta.is_file() {
        return Err(AcquisitionFailure::pick(format!("Not a file: {}", selected.display())));
    }

    let dest = timestamped_path(capture_dir, "library", format.primary_extension());
    if let Err(e) = fs::copy(selected, &dest).await {
        // drop a partial copy
        let _ = fs::remove_file(&dest).await;
        return Err(AcquisitionFailure::pick(format!("{}: {}", selected.display(), e)));
    }
    debug!("Imported {} as {}", selected.display(), dest.display());

    Ok(ImageReference::new(dest, ImageSource::Library))
}
