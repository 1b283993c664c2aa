//! Event producers: load one entity and build its event payload.
//!
//! Payload field names are the public contract trigger and template
//! authors write against (documented on the constants in
//! [`mortar_core::events`]); changing them breaks persisted triggers.
//! A missing entity is not an error: the store returns `None`, the
//! producer warns and dispatches nothing.

use chrono::Utc;
use mortar_core::events::{
    ENTITY_DELIVERY, ENTITY_MATERIAL, ENTITY_QUALITY_TEST, ENTITY_TASK, EVENT_DELIVERY_DELAYED,
    EVENT_QUALITY_TEST_FAILED, EVENT_STOCK_LEVEL_CHANGE, EVENT_TASK_COMPLETED, EVENT_TASK_OVERDUE,
};
use mortar_core::types::{DbId, Timestamp};
use mortar_db::models::delivery::Delivery;
use mortar_db::models::material::Material;
use mortar_db::models::quality_test::QualityTest;
use mortar_db::models::task::Task;
use mortar_db::repositories::{DeliveryRepo, MaterialRepo, QualityTestRepo, TaskRepo, UserRepo};
use mortar_db::DbPool;
use serde_json::{json, Value};

use crate::dispatcher::{DispatchSummary, EventDispatcher};
use crate::event::DomainEvent;

/// Builds per-entity event payloads and feeds them into dispatch.
pub struct EventProducers {
    pool: DbPool,
    dispatcher: EventDispatcher,
}

impl EventProducers {
    /// Create the producer set around a dispatcher.
    pub fn new(pool: DbPool, dispatcher: EventDispatcher) -> Self {
        Self { pool, dispatcher }
    }

    /// Dispatch a `stock_level_change` event for one material.
    pub async fn stock_level_changed(
        &self,
        material_id: DbId,
    ) -> Result<DispatchSummary, sqlx::Error> {
        let Some(material) = MaterialRepo::find_by_id(&self.pool, material_id).await? else {
            tracing::warn!(material_id, "Material not found, skipping stock event");
            return Ok(DispatchSummary::empty(EVENT_STOCK_LEVEL_CHANGE));
        };

        let event = DomainEvent::new(EVENT_STOCK_LEVEL_CHANGE, ENTITY_MATERIAL, material.id)
            .with_payload(stock_payload(&material));
        self.dispatcher.dispatch(&event).await
    }

    /// Dispatch a `delivery_delayed` event for one delivery.
    pub async fn delivery_delayed(
        &self,
        delivery_id: DbId,
    ) -> Result<DispatchSummary, sqlx::Error> {
        let Some(delivery) = DeliveryRepo::find_by_id(&self.pool, delivery_id).await? else {
            tracing::warn!(delivery_id, "Delivery not found, skipping delay event");
            return Ok(DispatchSummary::empty(EVENT_DELIVERY_DELAYED));
        };
        let material_name = self.material_name(delivery.material_id).await?;

        let event = DomainEvent::new(EVENT_DELIVERY_DELAYED, ENTITY_DELIVERY, delivery.id)
            .with_payload(delivery_payload(&delivery, material_name, Utc::now()));
        self.dispatcher.dispatch(&event).await
    }

    /// Dispatch a `quality_test_failed` event for one test.
    pub async fn quality_test_failed(
        &self,
        test_id: DbId,
    ) -> Result<DispatchSummary, sqlx::Error> {
        let Some(test) = QualityTestRepo::find_by_id(&self.pool, test_id).await? else {
            tracing::warn!(test_id, "Quality test not found, skipping failure event");
            return Ok(DispatchSummary::empty(EVENT_QUALITY_TEST_FAILED));
        };
        let material_name = self.material_name(test.material_id).await?;

        let event = DomainEvent::new(EVENT_QUALITY_TEST_FAILED, ENTITY_QUALITY_TEST, test.id)
            .with_payload(quality_test_payload(&test, material_name));
        self.dispatcher.dispatch(&event).await
    }

    /// Dispatch one `task_overdue` event per overdue task assigned to
    /// the user. The fan-out is per task, not per user, so a trigger
    /// can reference the individual task's fields.
    pub async fn overdue_tasks_for_user(
        &self,
        user_id: DbId,
    ) -> Result<Vec<DispatchSummary>, sqlx::Error> {
        let Some(user) = UserRepo::find_by_id(&self.pool, user_id).await? else {
            tracing::warn!(user_id, "User not found, skipping overdue task scan");
            return Ok(Vec::new());
        };

        let tasks = TaskRepo::list_overdue_for_user(&self.pool, user.id).await?;
        let now = Utc::now();

        let mut summaries = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let event = DomainEvent::new(EVENT_TASK_OVERDUE, ENTITY_TASK, task.id)
                .with_payload(task_overdue_payload(task, &user.name, now));
            summaries.push(self.dispatcher.dispatch(&event).await?);
        }
        Ok(summaries)
    }

    /// Dispatch a `task_completed` event for one task.
    pub async fn task_completed(&self, task_id: DbId) -> Result<DispatchSummary, sqlx::Error> {
        let Some(task) = TaskRepo::find_by_id(&self.pool, task_id).await? else {
            tracing::warn!(task_id, "Task not found, skipping completion event");
            return Ok(DispatchSummary::empty(EVENT_TASK_COMPLETED));
        };

        let assignee_name = match task.assignee_id {
            Some(id) => UserRepo::find_by_id(&self.pool, id).await?.map(|u| u.name),
            None => None,
        };

        let event = DomainEvent::new(EVENT_TASK_COMPLETED, ENTITY_TASK, task.id)
            .with_payload(task_completed_payload(&task, assignee_name));
        self.dispatcher.dispatch(&event).await
    }

    async fn material_name(&self, material_id: Option<DbId>) -> Result<Option<String>, sqlx::Error> {
        match material_id {
            Some(id) => Ok(MaterialRepo::find_by_id(&self.pool, id).await?.map(|m| m.name)),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

fn stock_payload(material: &Material) -> Value {
    json!({
        "materialId": material.id,
        "materialName": material.name,
        "currentStock": material.current_stock,
        "minStock": material.min_stock,
        "criticalStock": material.critical_stock,
        "unit": material.unit,
    })
}

fn delivery_payload(delivery: &Delivery, material_name: Option<String>, now: Timestamp) -> Value {
    json!({
        "deliveryId": delivery.id,
        "supplier": delivery.supplier,
        "materialName": material_name,
        "quantity": delivery.quantity,
        "status": delivery.status,
        "scheduledDate": delivery.scheduled_at.to_rfc3339(),
        "daysOverdue": whole_days_since(delivery.scheduled_at, now),
    })
}

fn quality_test_payload(test: &QualityTest, material_name: Option<String>) -> Value {
    json!({
        "testId": test.id,
        "testType": test.test_type,
        "materialName": material_name,
        "result": test.result,
        "measuredValue": test.measured_value,
        "testedAt": test.tested_at.to_rfc3339(),
    })
}

fn task_overdue_payload(task: &Task, assignee_name: &str, now: Timestamp) -> Value {
    json!({
        "taskId": task.id,
        "title": task.title,
        "assigneeId": task.assignee_id,
        "assigneeName": assignee_name,
        "priority": task.priority,
        "status": task.status,
        "dueDate": task.due_date.map(|d| d.to_rfc3339()),
        "daysOverdue": task.due_date.map_or(0, |d| whole_days_since(d, now)),
    })
}

fn task_completed_payload(task: &Task, assignee_name: Option<String>) -> Value {
    json!({
        "taskId": task.id,
        "title": task.title,
        "assigneeId": task.assignee_id,
        "assigneeName": assignee_name,
        "priority": task.priority,
        "completedAt": task.completed_at.map(|t| t.to_rfc3339()),
    })
}

/// Whole days elapsed since `past`, clamped to zero for future times.
fn whole_days_since(past: Timestamp, now: Timestamp) -> i64 {
    (now - past).num_days().max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
