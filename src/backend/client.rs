use std::time::Duration;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use crate::config::BackendUrl;
use crate::core::{DepreciationResponse, ImageReference, SubmissionRequest, SubmissionResult};
use crate::utils::SubmissionFailure;
use super::{DEPRECIATION_PATH, encode_image};

/// Posts encoded images to the analysis endpoint.
///
/// Holds no per-call state: every [`submit`](Self::submit) yields exactly one
/// terminal outcome and leaves workflow state to the caller.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: Client,
    base: BackendUrl,
    timeout: Duration,
    platform: String,
}

impl SubmissionClient {
    pub fn new(http: Client, base: BackendUrl, timeout: Duration, platform: impl Into<String>) -> Self {
        Self {
            http,
            base,
            timeout,
            platform: platform.into(),
        }
    }

    /// Encodes `image` and submits it, bounded by the configured timeout.
    pub async fn submit(&self, image: &ImageReference) -> SubmissionResult {
        let image_data = encode_image(image.path()).await?;
        let request = SubmissionRequest::new(image_data, self.platform.as_str(), image.acquired_at());
        debug!(
            "Submitting {} ({} encoded bytes, platform {})",
            image.path().display(),
            request.image_size,
            request.platform
        );

        match timeout(self.timeout, self.post(&request)).await {
            Ok(result) => {
                match &result {
                    Ok(appraisal) => info!(
                        "Depreciation analysis complete: score={} value={}",
                        appraisal.score_label(),
                        appraisal.value_label()
                    ),
                    Err(failure) => warn!("Depreciation calculation error: {}", failure),
                }
                result
            }
            Err(_) => {
                warn!("Depreciation request timed out after {:?}", self.timeout);
                Err(SubmissionFailure::Timeout)
            }
        }
    }

    async fn post(&self, request: &SubmissionRequest) -> SubmissionResult {
        let response = self
            .http
            .post(self.base.endpoint(DEPRECIATION_PATH))
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(SubmissionFailure::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        DepreciationResponse::parse(&body)
    }
}

fn classify(err: reqwest::Error) -> SubmissionFailure {
    if err.is_timeout() {
        SubmissionFailure::Timeout
    } else {
        SubmissionFailure::Network(err.to_string())
    }
}
