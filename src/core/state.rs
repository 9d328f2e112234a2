//! Workflow state machine values.

use std::fmt;
use serde::Serialize;
use crate::core::{Appraisal, ConnectivityStatus, ImageReference};
use crate::utils::WorkflowFailure;

/// The single active state of a workflow instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "camelCase")]
pub enum WorkflowState {
    #[default]
    Idle,
    Capturing,
    ImageReady,
    Validating,
    CheckingConnectivity,
    Submitting,
    Succeeded(Appraisal),
    Failed(WorkflowFailure),
}

impl WorkflowState {
    /// States that only exist while an operation is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Capturing | Self::Validating | Self::CheckingConnectivity | Self::Submitting
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::ImageReady => "image ready",
            Self::Validating => "validating",
            Self::CheckingConnectivity => "checking connectivity",
            Self::Submitting => "analyzing",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Everything the display layer needs to render the workflow.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub image: Option<ImageReference>,
    pub connectivity: Option<ConnectivityStatus>,
}

impl WorkflowSnapshot {
    /// Whether the last probe said the backend is reachable.
    pub fn is_backend_connected(&self) -> bool {
        self.connectivity.is_some_and(|status| status.reachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_states() {
        assert!(WorkflowState::Submitting.is_in_flight());
        assert!(!WorkflowState::ImageReady.is_in_flight());
        assert!(!WorkflowState::Failed(WorkflowFailure::NoImage).is_in_flight());
    }

    #[test]
    fn state_serializes_tagged() {
        let state = WorkflowState::Succeeded(Appraisal {
            depreciation_score: Some(0.42),
            estimated_value: Some(55.0),
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "succeeded");
        assert_eq!(json["detail"]["depreciationScore"], 0.42);
        assert_eq!(json["detail"]["estimatedValue"], 55.0);
    }
}
