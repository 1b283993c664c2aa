//! Recipient resolution.
//!
//! Recipients are derived fresh per execution, never stored. Task
//! events go to the task's assignee when the payload names one that
//! still resolves to an active user; every other event type, and task
//! events without a resolvable assignee, go to the active admins.

use std::collections::HashSet;

use mortar_core::events::{EVENT_TASK_COMPLETED, EVENT_TASK_OVERDUE};
use mortar_core::types::DbId;
use mortar_core::value::resolve_path;
use mortar_db::models::user::User;
use mortar_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::event::DomainEvent;

/// A resolved notification recipient.
///
/// The phone number is already gated on the user's SMS opt-in, so a
/// `Some` here means SMS may actually be sent.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub user_id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl Recipient {
    fn from_user(user: User) -> Self {
        let phone_number = if user.sms_alerts_enabled {
            user.phone_number
        } else {
            None
        };
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            phone_number,
        }
    }
}

/// Maps an event to its concrete recipient list.
pub struct RecipientResolver;

impl RecipientResolver {
    /// Resolve the recipients for an event.
    ///
    /// The returned list is deduplicated by user id, preserving first
    /// occurrence. An empty list is a valid outcome that the executor
    /// reports as a skip.
    pub async fn resolve(
        pool: &PgPool,
        event: &DomainEvent,
    ) -> Result<Vec<Recipient>, sqlx::Error> {
        let users = match event.event_type.as_str() {
            EVENT_TASK_OVERDUE | EVENT_TASK_COMPLETED => {
                Self::resolve_assignee(pool, event).await?
            }
            _ => UserRepo::list_admin_recipients(pool).await?,
        };

        let mut seen = HashSet::with_capacity(users.len());
        Ok(users
            .into_iter()
            .filter(|u| seen.insert(u.id))
            .map(Recipient::from_user)
            .collect())
    }

    /// Task events target the payload's assignee; admins are the
    /// fallback when the payload names no user that is still active.
    async fn resolve_assignee(
        pool: &PgPool,
        event: &DomainEvent,
    ) -> Result<Vec<User>, sqlx::Error> {
        let assignee_id = resolve_path(&event.payload, "assigneeId").and_then(|v| v.as_i64());

        if let Some(user_id) = assignee_id {
            match UserRepo::find_by_id(pool, user_id).await? {
                Some(user) if user.is_active => return Ok(vec![user]),
                _ => {
                    tracing::warn!(
                        user_id,
                        event_type = %event.event_type,
                        "Task assignee missing or inactive, notifying admins instead"
                    );
                }
            }
        }

        UserRepo::list_admin_recipients(pool).await
    }
}
