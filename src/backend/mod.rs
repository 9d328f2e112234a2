//! HTTP access to the analysis backend.
//!
//! - [`ConnectivityProber`]: bounded `GET /health`
//! - [`SubmissionClient`]: bounded `POST /depreciation`
//! - [`CurrencyConverter`]: `POST /convert-currency` for display purposes

mod probe;
mod client;
mod encoding;
mod currency;

pub use probe::{ConnectivityProber, probe};
pub use client::SubmissionClient;
pub use encoding::encode_image;
pub use currency::{Conversion, CurrencyConverter};

use reqwest::Client;
use crate::utils::{ValuerError, ValuerResult};

pub(crate) const HEALTH_PATH: &str = "/health";
pub(crate) const DEPRECIATION_PATH: &str = "/depreciation";
pub(crate) const CONVERT_CURRENCY_PATH: &str = "/convert-currency";

/// Shared HTTP client for all backend calls.
///
/// Per-call bounds are enforced by the callers with `tokio::time::timeout`,
/// so no client-wide timeout is set here.
pub fn http_client() -> ValuerResult<Client> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ValuerError::backend(format!("Failed to build HTTP client: {e}")))
}
