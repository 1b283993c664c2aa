//! Well-known notification channel name constants.
//!
//! These must match the channel values stored in the
//! `notification_templates.channels` column and referenced by the
//! trigger executor when fanning out a fired notification.

use serde::{Deserialize, Serialize};

/// Email notification delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// SMS notification delivered via the external gateway.
pub const CHANNEL_SMS: &str = "sms";

/// In-app notification. Has no external transport in this engine; the
/// executor counts it as sent once the dispatch phase is reached.
pub const CHANNEL_IN_APP: &str = "in_app";

/// A delivery channel a template can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Email,
    Sms,
    InApp,
}

impl NotificationChannel {
    /// Parse a persisted channel name. Unknown names yield `None` so
    /// callers can log and skip rather than fail the whole template.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            CHANNEL_EMAIL => Some(Self::Email),
            CHANNEL_SMS => Some(Self::Sms),
            CHANNEL_IN_APP => Some(Self::InApp),
            _ => None,
        }
    }

    /// The persisted name of this channel.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => CHANNEL_EMAIL,
            Self::Sms => CHANNEL_SMS,
            Self::InApp => CHANNEL_IN_APP,
        }
    }
}
