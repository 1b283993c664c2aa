//! SMS delivery via an HTTP gateway.
//!
//! [`HttpSmsSender`] POSTs a JSON body to a provider-agnostic gateway
//! URL. Configuration is loaded from environment variables; if
//! `SMS_GATEWAY_URL` is not set, [`SmsConfig::from_env`] returns `None`
//! and the daemon installs the disabled sender instead.

use std::time::Duration;

use super::{SmsSender, TransportError};

/// HTTP request timeout for a single send attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Configuration for the HTTP SMS gateway sender.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Gateway endpoint that accepts `{"to", "message"}` POSTs.
    pub gateway_url: String,
    /// Optional bearer token for the gateway.
    pub gateway_token: Option<String>,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMS_GATEWAY_URL` is not set.
    ///
    /// | Variable            | Required | Default |
    /// |---------------------|----------|---------|
    /// | `SMS_GATEWAY_URL`   | yes      | —       |
    /// | `SMS_GATEWAY_TOKEN` | no       | —       |
    pub fn from_env() -> Option<Self> {
        let gateway_url = std::env::var("SMS_GATEWAY_URL").ok()?;
        Some(Self {
            gateway_url,
            gateway_token: std::env::var("SMS_GATEWAY_TOKEN").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// HttpSmsSender
// ---------------------------------------------------------------------------

/// Sends rendered notification SMS messages through an HTTP gateway.
pub struct HttpSmsSender {
    config: SmsConfig,
    client: reqwest::Client,
}

impl HttpSmsSender {
    /// Create a new sender with a pre-configured HTTP client.
    pub fn new(config: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }
}

#[async_trait::async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError> {
        let payload = serde_json::json!({
            "to": to,
            "message": body,
        });

        let mut request = self.client.post(&self.config.gateway_url).json(&payload);
        if let Some(token) = &self.config.gateway_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TransportError::GatewayStatus(response.status().as_u16()));
        }

        tracing::info!(to, "Notification SMS sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
