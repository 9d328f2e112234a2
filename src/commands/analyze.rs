//! Command handlers for the CLI display layer.

use std::path::PathBuf;
use serde::Serialize;
use tracing::{debug, warn};
use crate::backend::{Conversion, CurrencyConverter, http_client};
use crate::config::AppConfig;
use crate::core::{Appraisal, ConnectivityStatus, WorkflowState};
use crate::media::Camera;
use crate::utils::WorkflowError;
use crate::workflow::WorkflowController;

/// Where the garment photo comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    Camera,
    Library(PathBuf),
}

/// Final outcome printed by the CLI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub state: WorkflowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_value: Option<Conversion>,
}

/// Result of the `health` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub backend: ConnectivityStatus,
    pub camera_ready: bool,
}

/// Probes the backend once and asks the camera whether it can capture.
///
/// # Returns
/// The reachability status and camera readiness; never fails.
pub async fn check_health<C: Camera>(controller: &WorkflowController<C>) -> HealthReport {
    HealthReport {
        backend: controller.refresh_connectivity().await,
        camera_ready: controller.media().is_camera_ready(),
    }
}

/// Acquires an image and, if that worked, analyzes it.
///
/// # Arguments
/// * `controller` - Workflow controller with permissions already requested
/// * `input` - Camera capture or a library file
///
/// # Returns
/// The terminal workflow state (`Succeeded` or `Failed`).
pub async fn analyze_garment<C: Camera>(
    controller: &WorkflowController<C>,
    input: ImageInput,
) -> Result<WorkflowState, WorkflowError> {
    let acquired = match &input {
        ImageInput::Camera => controller.capture_from_camera().await?,
        ImageInput::Library(path) => controller.pick_from_library(Some(path.as_path())).await?,
    };

    if acquired != WorkflowState::ImageReady {
        debug!("Acquisition ended in {}, not analyzing", acquired);
        return Ok(acquired);
    }
    controller.analyze().await
}

/// Converts the estimated value (assumed USD) into `currency`.
///
/// Conversion problems are logged and yield `None`; they never change the
/// workflow outcome.
pub async fn convert_estimate(config: &AppConfig, appraisal: &Appraisal, currency: &str) -> Option<Conversion> {
    let value = appraisal.estimated_value?;
    let http = match http_client() {
        Ok(http) => http,
        Err(e) => {
            warn!("Currency conversion unavailable: {}", e);
            return None;
        }
    };
    let converter = CurrencyConverter::new(http, config.backend_url().clone(), config.probe_timeout);
    match converter.convert(value, "USD", currency).await {
        Ok(conversion) => Some(conversion),
        Err(e) => {
            warn!("Currency conversion failed: {}", e);
            None
        }
    }
}

/// Human-readable rendering of a workflow state.
pub fn render_state(state: &WorkflowState) -> String {
    match state {
        WorkflowState::Succeeded(appraisal) => {
            let mut out = format!(
                "Depreciation Analysis Complete\nDepreciation Score: {}\nEstimated Value: {}",
                appraisal.score_label(),
                appraisal.value_label()
            );
            if let Some(pct) = appraisal.depreciation_percentage() {
                out.push_str(&format!("\nDepreciation: {pct}"));
            }
            out
        }
        WorkflowState::Failed(reason) => format!("Analysis Error: {reason}"),
        WorkflowState::Submitting => "Analyzing...".to_string(),
        other => format!("Status: {}", other.label()),
    }
}

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = render_state(&report.state);
    if let Some(conversion) = &report.converted_value {
        out.push_str(&format!(
            "\nEstimated Value ({}): {:.2} (rate {})",
            conversion.currency, conversion.amount, conversion.exchange_rate
        ));
    }
    out
}

pub fn render_connectivity(status: &ConnectivityStatus) -> String {
    if status.reachable {
        "Backend Connected".to_string()
    } else {
        "Backend Offline".to_string()
    }
}

pub fn render_health(report: &HealthReport) -> String {
    let camera = if report.camera_ready { "Camera Ready" } else { "Camera Not Ready" };
    format!("{}\n{}", render_connectivity(&report.backend), camera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::WorkflowFailure;

    #[test]
    fn renders_success_with_optional_fields() {
        let full = WorkflowState::Succeeded(Appraisal {
            depreciation_score: Some(0.42),
            estimated_value: Some(55.0),
        });
        assert_eq!(
            render_state(&full),
            "Depreciation Analysis Complete\nDepreciation Score: 0.42\nEstimated Value: $55.00\nDepreciation: 42.0%"
        );

        let partial = WorkflowState::Succeeded(Appraisal {
            depreciation_score: Some(0.68),
            estimated_value: None,
        });
        assert!(render_state(&partial).contains("Estimated Value: N/A"));
    }

    #[test]
    fn renders_failures_and_progress() {
        assert_eq!(
            render_state(&WorkflowState::Failed(WorkflowFailure::Timeout)),
            "Analysis Error: Failed to calculate depreciation. Request timed out."
        );
        assert_eq!(render_state(&WorkflowState::Submitting), "Analyzing...");
        assert_eq!(render_state(&WorkflowState::CheckingConnectivity), "Status: checking connectivity");
    }

    #[test]
    fn renders_health() {
        let report = HealthReport {
            backend: ConnectivityStatus::now(false),
            camera_ready: true,
        };
        assert_eq!(render_health(&report), "Backend Offline\nCamera Ready");
    }

    #[test]
    fn report_appends_conversion() {
        let report = AnalysisReport {
            state: WorkflowState::Succeeded(Appraisal {
                depreciation_score: None,
                estimated_value: Some(10.0),
            }),
            converted_value: Some(Conversion {
                amount: 9.2,
                currency: "EUR".into(),
                exchange_rate: 0.92,
            }),
        };
        assert!(render_report(&report).ends_with("Estimated Value (EUR): 9.20 (rate 0.92)"));
    }
}
