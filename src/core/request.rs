//! Wire types for the analysis endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::core::Appraisal;
use crate::utils::SubmissionFailure;

/// Outcome of one submission: an appraisal or a classified failure.
pub type SubmissionResult = Result<Appraisal, SubmissionFailure>;

/// JSON body posted to `/depreciation`.
///
/// Built immediately before a submission and dropped afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRequest {
    /// Base64-encoded image bytes
    pub image_data: String,
    /// Platform tag of the submitting device
    pub platform: String,
    /// ISO-8601 capture time
    pub timestamp: String,
    /// Length of `image_data`, for server-side diagnostics
    pub image_size: usize,
}

impl SubmissionRequest {
    pub fn new(image_data: String, platform: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        let image_size = image_data.len();
        Self {
            image_data,
            platform: platform.into(),
            timestamp: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            image_size,
        }
    }
}

/// Loosely-typed response body; converted straight into a [`SubmissionResult`].
#[derive(Debug, Default, Deserialize)]
pub struct DepreciationResponse {
    #[serde(default)]
    pub depreciation_score: Option<Value>,
    #[serde(default)]
    pub estimated_value: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl DepreciationResponse {
    /// Parses a success-status body. Only a JSON object is accepted.
    pub fn parse(body: &str) -> SubmissionResult {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| SubmissionFailure::InvalidResponse(e.to_string()))?;
        if !value.is_object() {
            return Err(SubmissionFailure::InvalidResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        let response: Self = serde_json::from_value(value)
            .map_err(|e| SubmissionFailure::InvalidResponse(e.to_string()))?;
        response.into_result()
    }

    pub fn into_result(self) -> SubmissionResult {
        if let Some(message) = self.error.as_ref().and_then(error_message) {
            return Err(SubmissionFailure::ApplicationError(message));
        }

        Ok(Appraisal {
            depreciation_score: self.depreciation_score.as_ref().and_then(Value::as_f64),
            estimated_value: self.estimated_value.as_ref().and_then(Value::as_f64),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// null, false and "" do not signal an error
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
