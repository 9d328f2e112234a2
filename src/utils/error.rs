//! Error types for the garment valuer.
//!
//! Provides a hierarchy of error types using `thiserror`. Acquisition and
//! submission failures are recovered by the workflow controller and surfaced
//! as [`WorkflowFailure`]; [`ValuerError`] covers configuration and IO
//! problems outside the workflow.

use std::io;
use serde::Serialize;
use thiserror::Error;
use crate::core::Permission;

/// Failures produced while obtaining a local image.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum AcquisitionFailure {
    /// The device permission was never granted
    #[error("{0} permission is required. Please grant permissions to continue.")]
    PermissionDenied(Permission),
    /// No frame was produced or the picked file was unusable
    #[error("{0}")]
    CaptureFailed(String),
    /// The user dismissed the picker without selecting anything
    #[error("No image was selected.")]
    Cancelled,
}

/// Failures produced by a single submission call.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum SubmissionFailure {
    /// The image could not be read or encoded into a payload
    #[error("Failed to encode image: {0}")]
    EncodingFailed(String),
    /// The request was cancelled at its timeout boundary
    #[error("Request timed out.")]
    Timeout,
    /// Non-success HTTP status
    #[error("Server error {status}: {}", body_or_unknown(body))]
    ServerError { status: u16, body: String },
    /// Success status, but the server reported a problem in the payload
    #[error("{0}")]
    ApplicationError(String),
    /// Success status, but the payload was not a JSON object
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
    /// Connection-level failure before any response arrived
    #[error("Network error occurred: {0}")]
    Network(String),
}

/// Terminal failure of a workflow step, as shown to the user.
///
/// Every variant renders a distinct message; the user can always retry.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum WorkflowFailure {
    #[error("{0} permission is required. Please grant permissions to continue.")]
    PermissionDenied(Permission),
    #[error("{0}")]
    CaptureFailed(String),
    #[error("No image was selected.")]
    Cancelled,
    #[error("No image. Please take or upload an image first.")]
    NoImage,
    #[error("Invalid image. The selected image is corrupted or inaccessible. Please try again.")]
    InvalidImage,
    #[error("Backend offline. Cannot connect to the backend server. Please check your internet connection and try again.")]
    Unreachable,
    #[error("Failed to calculate depreciation. Request timed out.")]
    Timeout,
    #[error("Failed to calculate depreciation. Server error {status}: {}", body_or_unknown(body))]
    ServerError { status: u16, body: String },
    #[error("Failed to calculate depreciation. {0}")]
    ApplicationError(String),
    #[error("Failed to calculate depreciation. Invalid response from server: {0}")]
    InvalidResponse(String),
    #[error("Failed to encode image: {0}")]
    EncodingFailed(String),
    #[error("Failed to calculate depreciation. Network error occurred: {0}")]
    Network(String),
}

/// Rejection of an operation that could not start at all.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowError {
    /// Another capture or submission is in flight on the same controller
    #[error("Another operation is already in progress")]
    Busy,
}

/// Main error type for everything outside the capture-and-submit workflow.
#[derive(Error, Debug, Serialize)]
pub enum ValuerError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Malformed user input (currency codes, amounts)
    #[error("Format error: {0}")]
    Format(String),

    /// Backend call outside the workflow failed
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Convenience result type for non-workflow operations.
pub type ValuerResult<T> = Result<T, ValuerError>;

fn body_or_unknown(body: &str) -> &str {
    if body.trim().is_empty() { "Unknown error" } else { body }
}

impl ValuerError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn backend<T: Into<String>>(msg: T) -> Self {
        Self::Backend(msg.into())
    }
}

impl AcquisitionFailure {
    pub fn capture<T: std::fmt::Display>(msg: T) -> Self {
        Self::CaptureFailed(format!("Failed to take picture: {msg}"))
    }

    pub fn pick<T: std::fmt::Display>(msg: T) -> Self {
        Self::CaptureFailed(format!("Failed to pick image: {msg}"))
    }
}

impl SubmissionFailure {
    /// Whether the failure says something about backend reachability.
    pub fn is_connectivity_loss(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }
}

// Convert std::io::Error to ValuerError
impl From<io::Error> for ValuerError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<AcquisitionFailure> for WorkflowFailure {
    fn from(failure: AcquisitionFailure) -> Self {
        match failure {
            AcquisitionFailure::PermissionDenied(permission) => Self::PermissionDenied(permission),
            AcquisitionFailure::CaptureFailed(msg) => Self::CaptureFailed(msg),
            AcquisitionFailure::Cancelled => Self::Cancelled,
        }
    }
}

impl From<SubmissionFailure> for WorkflowFailure {
    fn from(failure: SubmissionFailure) -> Self {
        match failure {
            SubmissionFailure::EncodingFailed(msg) => Self::EncodingFailed(msg),
            SubmissionFailure::Timeout => Self::Timeout,
            SubmissionFailure::ServerError { status, body } => Self::ServerError { status, body },
            SubmissionFailure::ApplicationError(msg) => Self::ApplicationError(msg),
            SubmissionFailure::InvalidResponse(msg) => Self::InvalidResponse(msg),
            SubmissionFailure::Network(msg) => Self::Network(msg),
        }
    }
}
