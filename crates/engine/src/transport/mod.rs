//! Notification transports.
//!
//! The executor talks to channels through the [`EmailSender`] and
//! [`SmsSender`] traits so tests can substitute recorders and so an
//! unconfigured channel degrades to per-send failures instead of a
//! startup panic. The in-app channel deliberately has no transport:
//! the executor counts it as sent once reached.

pub mod email;
pub mod sms;

pub use email::{EmailConfig, SmtpEmailSender};
pub use sms::{HttpSmsSender, SmsConfig};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for channel send failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel has no configured transport.
    #[error("transport is not configured")]
    NotConfigured,

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The SMS gateway returned a non-2xx status code.
    #[error("SMS gateway returned HTTP {0}")]
    GatewayStatus(u16),
}

// ---------------------------------------------------------------------------
// Sender traits
// ---------------------------------------------------------------------------

/// Sends a rendered notification email.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}

/// Sends a rendered notification SMS.
#[async_trait::async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError>;
}

// ---------------------------------------------------------------------------
// Disabled senders
// ---------------------------------------------------------------------------

/// Email sender installed when SMTP is not configured; every send fails
/// with [`TransportError::NotConfigured`].
pub struct DisabledEmailSender;

#[async_trait::async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
}

/// SMS sender installed when no gateway is configured.
pub struct DisabledSmsSender;

#[async_trait::async_trait]
impl SmsSender for DisabledSmsSender {
    async fn send(&self, _to: &str, _body: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
