//! Core application types and state.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`ImageReference`]: the active captured or picked image
//! - [`ConnectivityStatus`]: result of the last backend health check
//! - [`SubmissionRequest`]: body posted to the analysis endpoint
//! - [`Appraisal`] / [`SubmissionResult`]: outcome of a submission
//! - [`WorkflowState`]: the controller's state machine value

mod types;
mod state;
mod request;

pub use types::{Appraisal, ConnectivityStatus, ImageReference, ImageSource, Permission};
pub use state::{WorkflowSnapshot, WorkflowState};
pub use request::{DepreciationResponse, SubmissionRequest, SubmissionResult};
