//! Shared seeding helpers and mock transports for engine tests.

use std::sync::{Arc, Mutex};

use mortar_engine::transport::{EmailSender, SmsSender, TransportError};
use mortar_engine::{EventDispatcher, EventProducers, TriggerExecutor};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Mock transports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email sender that records every send; sends to `fail_for` error out.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<SentEmail>>,
    fail_for: Option<String>,
}

impl RecordingEmailSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_for(address: &str) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_for: Some(address.to_string()),
        })
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        if self.fail_for.as_deref() == Some(to) {
            return Err(TransportError::Build("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

/// SMS sender that records every send.
#[derive(Default)]
pub struct RecordingSmsSender {
    sent: Mutex<Vec<SentSms>>,
}

impl RecordingSmsSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(SentSms {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine wiring
// ---------------------------------------------------------------------------

pub fn executor_with(
    pool: &PgPool,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
) -> TriggerExecutor {
    TriggerExecutor::new(pool.clone(), email, sms)
}

pub fn producers_with(
    pool: &PgPool,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
) -> EventProducers {
    let executor = executor_with(pool, email, sms);
    let dispatcher = EventDispatcher::new(pool.clone(), executor);
    EventProducers::new(pool.clone(), dispatcher)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn seed_user(
    pool: &PgPool,
    name: &str,
    role: &str,
    email: Option<&str>,
    phone: Option<&str>,
    sms_alerts_enabled: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, phone_number, role, sms_alerts_enabled)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(role)
    .bind(sms_alerts_enabled)
    .fetch_one(pool)
    .await
    .expect("seed user")
}

pub async fn seed_admin(pool: &PgPool, name: &str, email: &str) -> i64 {
    seed_user(pool, name, "admin", Some(email), None, false).await
}

pub async fn seed_material(
    pool: &PgPool,
    name: &str,
    unit: &str,
    current_stock: f64,
    min_stock: f64,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO materials (name, unit, current_stock, min_stock, critical_stock)
         VALUES ($1, $2, $3, $4, $4 / 5)
         RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .bind(current_stock)
    .bind(min_stock)
    .fetch_one(pool)
    .await
    .expect("seed material")
}

pub async fn seed_template(
    pool: &PgPool,
    subject: &str,
    body_text: &str,
    channels: serde_json::Value,
    is_active: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO notification_templates (name, subject, body_text, channels, is_active)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(subject)
    .bind(subject)
    .bind(body_text)
    .bind(channels)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .expect("seed template")
}

pub async fn seed_trigger(
    pool: &PgPool,
    event_type: &str,
    template_id: Option<i64>,
    condition: serde_json::Value,
    is_active: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO notification_triggers
             (name, event_type, template_id, trigger_condition, is_active)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(format!("trigger for {event_type}"))
    .bind(event_type)
    .bind(template_id)
    .bind(condition)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .expect("seed trigger")
}

/// All audit rows, oldest first.
pub async fn audit_rows(pool: &PgPool) -> Vec<(i64, String, bool, i32, Option<String>)> {
    sqlx::query_as(
        "SELECT trigger_id, entity_type, conditions_met, notifications_sent, error_message
         FROM trigger_execution_logs
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .expect("audit rows")
}
