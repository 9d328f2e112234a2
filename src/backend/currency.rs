use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;
use crate::config::BackendUrl;
use crate::utils::{ValuerError, ValuerResult};
use super::CONVERT_CURRENCY_PATH;

/// Amount converted into a target currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub amount: f64,
    pub currency: String,
    pub exchange_rate: f64,
}

#[derive(Serialize)]
struct ConversionRequest<'a> {
    amount: f64,
    base_currency: &'a str,
    target_currency: &'a str,
}

#[derive(Deserialize)]
struct ConversionResponse {
    converted_amount: Option<f64>,
    exchange_rate: Option<f64>,
    error: Option<String>,
}

/// Converts estimated values through the backend's exchange-rate endpoint.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    http: Client,
    base: BackendUrl,
    timeout: Duration,
}

impl CurrencyConverter {
    pub fn new(http: Client, base: BackendUrl, timeout: Duration) -> Self {
        Self { http, base, timeout }
    }

    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> ValuerResult<Conversion> {
        if !amount.is_finite() {
            return Err(ValuerError::format(format!("Invalid amount: {amount}")));
        }
        let from = currency_code(from)?;
        let to = currency_code(to)?;

        if from == to {
            return Ok(Conversion { amount, currency: to, exchange_rate: 1.0 });
        }

        let request = ConversionRequest {
            amount,
            base_currency: &from,
            target_currency: &to,
        };
        debug!("Converting {} {} to {}", amount, from, to);

        let call = async {
            let response = self
                .http
                .post(self.base.endpoint(CONVERT_CURRENCY_PATH))
                .json(&request)
                .send()
                .await
                .map_err(|e| ValuerError::backend(e.to_string()))?;
            let status = response.status();
            let body: ConversionResponse = response
                .json()
                .await
                .map_err(|e| ValuerError::backend(format!("status {status}: {e}")))?;
            Ok::<_, ValuerError>((status, body))
        };

        let (status, body) = timeout(self.timeout, call)
            .await
            .map_err(|_| ValuerError::backend("Currency conversion timed out"))??;

        if let Some(error) = body.error {
            return Err(ValuerError::backend(error));
        }
        if !status.is_success() {
            return Err(ValuerError::backend(format!("Currency conversion failed with status {status}")));
        }

        match (body.converted_amount, body.exchange_rate) {
            (Some(converted), Some(rate)) => Ok(Conversion {
                amount: converted,
                currency: to,
                exchange_rate: rate,
            }),
            _ => Err(ValuerError::backend("Currency conversion response is incomplete")),
        }
    }
}

/// Upper-cased three-letter ISO 4217 code.
fn currency_code(raw: &str) -> ValuerResult<String> {
    let code = raw.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ValuerError::format(format!("Invalid currency code: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_codes_are_normalized() {
        assert_eq!(currency_code(" eur ").unwrap(), "EUR");
        assert!(currency_code("euro").is_err());
        assert!(currency_code("U5D").is_err());
    }

    #[tokio::test]
    async fn same_currency_skips_the_backend() {
        // Nothing listens on port 9; the call must not be attempted.
        let converter = CurrencyConverter::new(
            Client::new(),
            BackendUrl::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_millis(100),
        );
        let conversion = converter.convert(55.0, "usd", "USD").await.unwrap();
        assert_eq!(conversion, Conversion { amount: 55.0, currency: "USD".into(), exchange_rate: 1.0 });
    }
}
