//! Core types shared by acquisition, submission, and the workflow controller.

use std::fmt;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device permission needed before media can be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    Camera,
    MediaLibrary,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => f.write_str("Camera"),
            Self::MediaLibrary => f.write_str("Media library"),
        }
    }
}

/// Where an image reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    Camera,
    Library,
}

/// Locator for a captured or selected image on local storage.
///
/// Exactly one reference is active per workflow; it is replaced on recapture
/// and dropped on reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    path: PathBuf,
    source: ImageSource,
    acquired_at: DateTime<Utc>,
}

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>, source: ImageSource) -> Self {
        Self {
            path: path.into(),
            source,
            acquired_at: Utc::now(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

/// Result of the last health check against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityStatus {
    pub reachable: bool,
    pub checked_at: DateTime<Utc>,
}

impl ConnectivityStatus {
    pub fn now(reachable: bool) -> Self {
        Self {
            reachable,
            checked_at: Utc::now(),
        }
    }
}

/// Successful analysis returned by the backend.
///
/// Either field may be missing from the response; a partial appraisal is
/// still a success.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appraisal {
    pub depreciation_score: Option<f64>,
    pub estimated_value: Option<f64>,
}

impl Appraisal {
    /// Score as reported, or `N/A`.
    pub fn score_label(&self) -> String {
        self.depreciation_score
            .map(|score| score.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Estimated value formatted as dollars, or `N/A`.
    pub fn value_label(&self) -> String {
        self.estimated_value
            .map(|value| format!("${value:.2}"))
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Score expressed as a percentage with one decimal, e.g. `68.0%`.
    pub fn depreciation_percentage(&self) -> Option<String> {
        self.depreciation_score.map(|score| format!("{:.1}%", score * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appraisal_labels() {
        let full = Appraisal { depreciation_score: Some(0.42), estimated_value: Some(55.0) };
        assert_eq!(full.score_label(), "0.42");
        assert_eq!(full.value_label(), "$55.00");
        assert_eq!(full.depreciation_percentage().as_deref(), Some("42.0%"));

        let partial = Appraisal { depreciation_score: Some(0.68), estimated_value: None };
        assert_eq!(partial.value_label(), "N/A");
        assert_eq!(Appraisal::default().score_label(), "N/A");
    }

    #[test]
    fn image_reference_serializes_camel_case() {
        let image = ImageReference::new("/tmp/a.jpg", ImageSource::Camera);
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["path"], "/tmp/a.jpg");
        assert_eq!(json["source"], "camera");
        assert!(json.get("acquiredAt").is_some());
    }
}
