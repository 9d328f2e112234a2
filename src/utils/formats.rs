use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::utils::ValuerError;

/// Image formats accepted from the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    JPEG,
    PNG,
    GIF,
    BMP,
    WebP,
    HEIC,
}

impl ImageFormat {
    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::GIF => &["gif"],
            Self::BMP => &["bmp"],
            Self::WebP => &["webp"],
            Self::HEIC => &["heic", "heif"],
        }
    }

    /// Get the primary extension for this format
    pub fn primary_extension(&self) -> &str {
        self.extensions()[0]
    }
}

impl FromStr for ImageFormat {
    type Err = ValuerError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "gif" => Ok(Self::GIF),
            "bmp" => Ok(Self::BMP),
            "webp" => Ok(Self::WebP),
            "heic" | "heif" => Ok(Self::HEIC),
            _ => Err(ValuerError::format(format!("Unsupported image format: {ext}"))),
        }
    }
}

/// Get format from file extension
pub fn format_from_extension(path: impl AsRef<Path>) -> Result<ImageFormat, ValuerError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ValuerError::format(format!("File has no extension: {}", path.display())))?;

    ImageFormat::from_str(ext)
}
