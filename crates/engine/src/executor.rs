//! The trigger executor: runs one trigger against one event.
//!
//! The pipeline is strictly sequential: load trigger, check active,
//! evaluate conditions, load template, check template active, render,
//! resolve recipients, dispatch, write the audit log, bump trigger
//! metadata. Every early exit is a structured [`SkipReason`], every
//! storage failure is caught at [`TriggerExecutor::execute`]'s
//! boundary, and neither ever propagates to the caller.

use std::fmt;
use std::sync::Arc;

use mortar_core::channels::NotificationChannel;
use mortar_core::evaluator::evaluate_tree_value;
use mortar_core::template::render_str;
use mortar_core::types::DbId;
use mortar_db::models::execution_log::CreateExecutionLog;
use mortar_db::models::template::NotificationTemplate;
use mortar_db::repositories::{ExecutionLogRepo, TemplateRepo, TriggerRepo};
use mortar_db::DbPool;

use crate::event::DomainEvent;
use crate::recipients::{Recipient, RecipientResolver};
use crate::transport::{EmailSender, SmsSender};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Why an execution stopped before dispatch.
///
/// Skips are expected outcomes, not errors: they are reported to the
/// caller and the application log but never written to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TriggerNotFound,
    TriggerInactive,
    ConditionsNotMet,
    TemplateNotFound,
    TemplateInactive,
    NoRecipients,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::TriggerNotFound => "Trigger not found",
            SkipReason::TriggerInactive => "Trigger is not active",
            SkipReason::ConditionsNotMet => "Conditions not met",
            SkipReason::TemplateNotFound => "Template not found",
            SkipReason::TemplateInactive => "Template is not active",
            SkipReason::NoRecipients => "No recipients found",
        };
        f.write_str(text)
    }
}

/// Result of one trigger execution attempt.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// Conditions held and dispatch ran; the count covers successful
    /// sends across the recipient/channel matrix.
    Executed { notifications_sent: i32 },
    /// The pipeline stopped early at an expected gate.
    Skipped(SkipReason),
    /// A storage or render failure was caught at the executor boundary
    /// and recorded in the audit trail.
    Failed { error: String },
}

// ---------------------------------------------------------------------------
// TriggerExecutor
// ---------------------------------------------------------------------------

/// Executes triggers end to end against domain events.
pub struct TriggerExecutor {
    pool: DbPool,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl TriggerExecutor {
    /// Create an executor with the given channel transports.
    pub fn new(pool: DbPool, email: Arc<dyn EmailSender>, sms: Arc<dyn SmsSender>) -> Self {
        Self { pool, email, sms }
    }

    /// Run one trigger against one event.
    ///
    /// Never returns an error and never panics: failures become
    /// [`ExecutionOutcome::Failed`] plus a best-effort audit row with
    /// `conditions_met = false` and the error message populated.
    pub async fn execute(&self, trigger_id: DbId, event: &DomainEvent) -> ExecutionOutcome {
        match self.run_pipeline(trigger_id, event).await {
            Ok(outcome) => {
                if let ExecutionOutcome::Skipped(reason) = &outcome {
                    tracing::debug!(
                        trigger_id,
                        event_type = %event.event_type,
                        reason = %reason,
                        "Trigger execution skipped"
                    );
                }
                outcome
            }
            Err(e) => {
                let error = e.to_string();
                tracing::error!(
                    trigger_id,
                    event_type = %event.event_type,
                    error = %error,
                    "Trigger execution failed"
                );
                let failure = CreateExecutionLog {
                    trigger_id,
                    entity_type: event.entity_type.clone(),
                    entity_id: event.entity_id,
                    conditions_met: false,
                    notifications_sent: 0,
                    error_message: Some(error.clone()),
                };
                if let Err(log_err) = ExecutionLogRepo::create(&self.pool, &failure).await {
                    tracing::error!(
                        trigger_id,
                        error = %log_err,
                        "Failed to record execution failure in audit log"
                    );
                }
                ExecutionOutcome::Failed { error }
            }
        }
    }

    async fn run_pipeline(
        &self,
        trigger_id: DbId,
        event: &DomainEvent,
    ) -> Result<ExecutionOutcome, sqlx::Error> {
        let Some(trigger) = TriggerRepo::find_by_id(&self.pool, trigger_id).await? else {
            return Ok(ExecutionOutcome::Skipped(SkipReason::TriggerNotFound));
        };
        if !trigger.is_active {
            return Ok(ExecutionOutcome::Skipped(SkipReason::TriggerInactive));
        }

        if !evaluate_tree_value(&trigger.trigger_condition, &event.payload) {
            return Ok(ExecutionOutcome::Skipped(SkipReason::ConditionsNotMet));
        }

        let Some(template_id) = trigger.template_id else {
            return Ok(ExecutionOutcome::Skipped(SkipReason::TemplateNotFound));
        };
        let Some(template) = TemplateRepo::find_by_id(&self.pool, template_id).await? else {
            return Ok(ExecutionOutcome::Skipped(SkipReason::TemplateNotFound));
        };
        if !template.is_active {
            return Ok(ExecutionOutcome::Skipped(SkipReason::TemplateInactive));
        }

        let subject = render_str(&template.subject, &event.payload);
        let body_text = render_str(&template.body_text, &event.payload);
        let body_html = template
            .body_html
            .as_deref()
            .map(|t| render_str(t, &event.payload));

        let recipients = RecipientResolver::resolve(&self.pool, event).await?;
        if recipients.is_empty() {
            return Ok(ExecutionOutcome::Skipped(SkipReason::NoRecipients));
        }

        let channels = enabled_channels(&template);
        let notifications_sent = self
            .dispatch_all(
                &recipients,
                &channels,
                &subject,
                &body_text,
                body_html.as_deref(),
            )
            .await;

        ExecutionLogRepo::create(
            &self.pool,
            &CreateExecutionLog {
                trigger_id: trigger.id,
                entity_type: event.entity_type.clone(),
                entity_id: event.entity_id,
                conditions_met: true,
                notifications_sent,
                error_message: None,
            },
        )
        .await?;

        // The audit row is already durable at this point; a failed
        // metadata bump downgrades to an application-log error.
        if let Err(e) = TriggerRepo::record_execution(&self.pool, trigger.id).await {
            tracing::error!(
                trigger_id = trigger.id,
                error = %e,
                "Failed to bump trigger execution metadata"
            );
        }

        tracing::info!(
            trigger_id = trigger.id,
            trigger_name = %trigger.name,
            event_type = %event.event_type,
            notifications_sent,
            "Trigger fired"
        );
        Ok(ExecutionOutcome::Executed { notifications_sent })
    }

    /// Dispatch over the recipient x channel matrix, returning the
    /// number of successful sends.
    async fn dispatch_all(
        &self,
        recipients: &[Recipient],
        channels: &[NotificationChannel],
        subject: &str,
        body_text: &str,
        body_html: Option<&str>,
    ) -> i32 {
        let mut sent = 0;
        for recipient in recipients {
            for channel in channels {
                if self
                    .dispatch_one(recipient, *channel, subject, body_text, body_html)
                    .await
                {
                    sent += 1;
                }
            }
        }
        sent
    }

    /// Send to one recipient on one channel.
    ///
    /// A missing contact field skips the pair silently; a transport
    /// error is logged and excluded from the count. Neither aborts the
    /// remaining matrix.
    async fn dispatch_one(
        &self,
        recipient: &Recipient,
        channel: NotificationChannel,
        subject: &str,
        body_text: &str,
        body_html: Option<&str>,
    ) -> bool {
        match channel {
            NotificationChannel::Email => {
                let Some(to) = recipient.email.as_deref() else {
                    return false;
                };
                let body = body_html.unwrap_or(body_text);
                match self.email.send(to, subject, body).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            user_id = recipient.user_id,
                            channel = channel.as_str(),
                            error = %e,
                            "Notification send failed"
                        );
                        false
                    }
                }
            }
            NotificationChannel::Sms => {
                let Some(to) = recipient.phone_number.as_deref() else {
                    return false;
                };
                // SMS has no subject field; subject and body travel as
                // one message.
                let message = format!("{subject}: {body_text}");
                match self.sms.send(to, &message).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            user_id = recipient.user_id,
                            channel = channel.as_str(),
                            error = %e,
                            "Notification send failed"
                        );
                        false
                    }
                }
            }
            // No transport exists for in-app yet; reaching the channel
            // counts as sent.
            NotificationChannel::InApp => true,
        }
    }
}

/// Parse a template's channel list, dropping unknown names with a
/// warning and deduplicating while preserving order.
fn enabled_channels(template: &NotificationTemplate) -> Vec<NotificationChannel> {
    let Some(values) = template.channels.as_array() else {
        tracing::warn!(
            template_id = template.id,
            "Template channels is not a JSON array, nothing to dispatch"
        );
        return Vec::new();
    };

    let mut channels = Vec::new();
    for value in values {
        let name = value.as_str().unwrap_or_default();
        match NotificationChannel::parse(name) {
            Some(channel) if !channels.contains(&channel) => channels.push(channel),
            Some(_) => {}
            None => {
                tracing::warn!(
                    template_id = template.id,
                    channel = name,
                    "Unknown notification channel on template, skipping"
                );
            }
        }
    }
    channels
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn template_with_channels(channels: serde_json::Value) -> NotificationTemplate {
        NotificationTemplate {
            id: 1,
            name: "low stock".to_string(),
            subject: "s".to_string(),
            body_text: "b".to_string(),
            body_html: None,
            channels,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn skip_reasons_render_their_messages() {
        assert_eq!(SkipReason::TriggerNotFound.to_string(), "Trigger not found");
        assert_eq!(
            SkipReason::TriggerInactive.to_string(),
            "Trigger is not active"
        );
        assert_eq!(SkipReason::ConditionsNotMet.to_string(), "Conditions not met");
        assert_eq!(SkipReason::TemplateNotFound.to_string(), "Template not found");
        assert_eq!(
            SkipReason::TemplateInactive.to_string(),
            "Template is not active"
        );
        assert_eq!(SkipReason::NoRecipients.to_string(), "No recipients found");
    }

    #[test]
    fn enabled_channels_parses_known_names() {
        let template = template_with_channels(json!(["email", "sms", "in_app"]));
        assert_eq!(
            enabled_channels(&template),
            vec![
                NotificationChannel::Email,
                NotificationChannel::Sms,
                NotificationChannel::InApp
            ]
        );
    }

    #[test]
    fn enabled_channels_drops_unknown_and_duplicates() {
        let template = template_with_channels(json!(["email", "pager", "email"]));
        assert_eq!(enabled_channels(&template), vec![NotificationChannel::Email]);
    }

    #[test]
    fn enabled_channels_tolerates_malformed_documents() {
        assert!(enabled_channels(&template_with_channels(json!("email"))).is_empty());
        assert!(enabled_channels(&template_with_channels(json!([42]))).is_empty());
        assert!(enabled_channels(&template_with_channels(json!([]))).is_empty());
    }
}
