use std::time::Duration;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio::time::timeout;
use tracing::{debug, warn};
use crate::config::BackendUrl;
use crate::core::ConnectivityStatus;
use super::HEALTH_PATH;

/// Health checker bound to one backend address.
#[derive(Debug, Clone)]
pub struct ConnectivityProber {
    http: Client,
    base: BackendUrl,
    timeout: Duration,
}

impl ConnectivityProber {
    pub fn new(http: Client, base: BackendUrl, timeout: Duration) -> Self {
        Self { http, base, timeout }
    }

    /// Probes the backend and timestamps the outcome.
    pub async fn check(&self) -> ConnectivityStatus {
        ConnectivityStatus::now(probe(&self.http, &self.base, self.timeout).await)
    }
}

/// `GET {base}/health`, true only for a success status inside `bound`.
///
/// Transport errors, non-success statuses, and expiry all read as `false`.
/// On expiry the request future is dropped, which closes the connection.
pub async fn probe(http: &Client, base: &BackendUrl, bound: Duration) -> bool {
    let url = base.endpoint(HEALTH_PATH);
    let request = http.get(&url).header(ACCEPT, "application/json").send();

    match timeout(bound, request).await {
        Ok(Ok(response)) => {
            let healthy = response.status().is_success();
            debug!("Health check {} -> {}", url, response.status());
            healthy
        }
        Ok(Err(e)) => {
            warn!("Backend connection error: {}", e);
            false
        }
        Err(_) => {
            warn!("Health check timed out after {:?}", bound);
            false
        }
    }
}
