//! Dispatch fan-out, producer payload contracts, and one-shot scans.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::*;
use mortar_engine::{ExecutionOutcome, Scheduler, SchedulerConfig, SkipReason};
use serde_json::json;

fn always_fires() -> serde_json::Value {
    // A tree whose single condition holds for every payload that
    // carries the entity's id field.
    json!([{ "field": "materialId", "operator": "greater_than", "value": 0 }])
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_runs_every_matching_trigger_in_isolation(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let template_id = seed_template(&pool, "s", "b", json!(["email"]), true).await;

    let firing = seed_trigger(
        &pool,
        "stock_level_change",
        Some(template_id),
        always_fires(),
        true,
    )
    .await;
    let inactive = seed_trigger(
        &pool,
        "stock_level_change",
        Some(template_id),
        always_fires(),
        false,
    )
    .await;
    let orphan = seed_trigger(&pool, "stock_level_change", None, always_fires(), true).await;
    // Registered for a different event type, must not run.
    seed_trigger(&pool, "task_overdue", Some(template_id), always_fires(), true).await;

    let email = RecordingEmailSender::new();
    let producers = producers_with(&pool, email.clone(), RecordingSmsSender::new());
    let material_id = seed_material(&pool, "Cement", "kg", 30.0, 50.0).await;

    let summary = producers.stock_level_changed(material_id).await.unwrap();
    assert_eq!(summary.event_type, "stock_level_change");
    assert_eq!(summary.triggers_matched, 3);
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 0);

    let by_id = |id: i64| {
        summary
            .outcomes
            .iter()
            .find(|(t, _)| *t == id)
            .map(|(_, o)| o)
            .unwrap()
    };
    assert_matches!(by_id(firing), ExecutionOutcome::Executed { .. });
    assert_matches!(
        by_id(inactive),
        ExecutionOutcome::Skipped(SkipReason::TriggerInactive)
    );
    assert_matches!(
        by_id(orphan),
        ExecutionOutcome::Skipped(SkipReason::TemplateNotFound)
    );
    assert_eq!(email.sent().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stock_producer_payload_feeds_conditions_and_templates(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let template_id = seed_template(
        &pool,
        "Low stock: {{materialName}}",
        "Low stock: {{materialName}} at {{currentStock}}{{unit}} (min {{minStock}})",
        json!(["email"]),
        true,
    )
    .await;
    seed_trigger(
        &pool,
        "stock_level_change",
        Some(template_id),
        json!([{ "field": "currentStock", "operator": "less_than", "value": 50 }]),
        true,
    )
    .await;

    let email = RecordingEmailSender::new();
    let producers = producers_with(&pool, email.clone(), RecordingSmsSender::new());
    let material_id = seed_material(&pool, "Cement", "kg", 30.0, 50.0).await;

    let summary = producers.stock_level_changed(material_id).await.unwrap();
    assert_eq!(summary.executed, 1);

    let sent = email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Low stock: Cement");
    assert_eq!(sent[0].body, "Low stock: Cement at 30kg (min 50)");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_entity_dispatches_nothing(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let producers = producers_with(
        &pool,
        RecordingEmailSender::new(),
        RecordingSmsSender::new(),
    );

    let summary = producers.stock_level_changed(12345).await.unwrap();
    assert_eq!(summary.triggers_matched, 0);
    assert!(summary.outcomes.is_empty());

    let summary = producers.task_completed(12345).await.unwrap();
    assert!(summary.outcomes.is_empty());
    assert!(audit_rows(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overdue_scan_fans_out_once_per_task(pool: sqlx::PgPool) {
    let assignee = seed_user(
        &pool,
        "Site Lead",
        "operator",
        Some("lead@example.com"),
        None,
        false,
    )
    .await;
    let template_id = seed_template(
        &pool,
        "Overdue: {{title}}",
        "{{title}} is {{daysOverdue}} days overdue",
        json!(["email"]),
        true,
    )
    .await;
    seed_trigger(
        &pool,
        "task_overdue",
        Some(template_id),
        json!([{ "field": "daysOverdue", "operator": "greater_than_or_equal", "value": 0 }]),
        true,
    )
    .await;

    for title in ["Pour slab", "Order rebar"] {
        sqlx::query(
            "INSERT INTO tasks (title, assignee_id, priority, status, due_date)
             VALUES ($1, $2, 'high', 'open', NOW() - INTERVAL '3 days')",
        )
        .bind(title)
        .bind(assignee)
        .execute(&pool)
        .await
        .unwrap();
    }
    // Completed tasks are not overdue.
    sqlx::query(
        "INSERT INTO tasks (title, assignee_id, priority, status, due_date)
         VALUES ('Done already', $1, 'high', 'completed', NOW() - INTERVAL '3 days')",
    )
    .bind(assignee)
    .execute(&pool)
    .await
    .unwrap();

    let email = RecordingEmailSender::new();
    let producers = producers_with(&pool, email.clone(), RecordingSmsSender::new());

    let summaries = producers.overdue_tasks_for_user(assignee).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.executed == 1));

    // Task events target the assignee, not the (absent) admins.
    let sent = email.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.to == "lead@example.com"));
    assert!(sent.iter().any(|m| m.subject == "Overdue: Pour slab"));
    assert!(sent.iter().any(|m| m.body == "Order rebar is 3 days overdue"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_shot_scans_cover_each_entity_kind(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let template_id = seed_template(&pool, "s", "b", json!(["in_app"]), true).await;
    for event_type in [
        "stock_level_change",
        "delivery_delayed",
        "quality_test_failed",
        "task_overdue",
    ] {
        seed_trigger(&pool, event_type, Some(template_id), json!([]), true).await;
    }

    // Two materials below minimum, one healthy.
    let low_a = seed_material(&pool, "Cement", "kg", 30.0, 50.0).await;
    seed_material(&pool, "Sand", "t", 1.0, 5.0).await;
    seed_material(&pool, "Gravel", "t", 50.0, 5.0).await;

    sqlx::query(
        "INSERT INTO deliveries (supplier, material_id, quantity, status, scheduled_at)
         VALUES ('Gravel GmbH', $1, 10, 'pending', NOW() - INTERVAL '1 day')",
    )
    .bind(low_a)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO quality_tests (test_type, material_id, result, tested_at)
         VALUES ('slump', $1, 'failed', NOW())",
    )
    .bind(low_a)
    .execute(&pool)
    .await
    .unwrap();
    let assignee = seed_user(&pool, "Lead", "operator", None, None, false).await;
    sqlx::query(
        "INSERT INTO tasks (title, assignee_id, priority, status, due_date)
         VALUES ('Pour slab', $1, 'high', 'open', NOW() - INTERVAL '2 days')",
    )
    .bind(assignee)
    .execute(&pool)
    .await
    .unwrap();

    let producers = Arc::new(producers_with(
        &pool,
        RecordingEmailSender::new(),
        RecordingSmsSender::new(),
    ));
    let scheduler = Scheduler::new(pool.clone(), producers, SchedulerConfig::default());

    assert_eq!(scheduler.run_stock_scan().await.unwrap(), 2);
    assert_eq!(scheduler.run_delivery_scan().await.unwrap(), 1);
    assert_eq!(scheduler.run_quality_scan().await.unwrap(), 1);
    assert_eq!(scheduler.run_task_scan().await.unwrap(), 1);

    // An empty condition tree never fires (no vacuous truth), so the
    // scans above dispatched but wrote no audit rows.
    assert!(audit_rows(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scans_fire_triggers_whose_conditions_hold(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let template_id = seed_template(
        &pool,
        "Low stock: {{materialName}}",
        "down to {{currentStock}}{{unit}}",
        json!(["email"]),
        true,
    )
    .await;
    let trigger_id = seed_trigger(
        &pool,
        "stock_level_change",
        Some(template_id),
        json!([{ "field": "currentStock", "operator": "less_than", "value": 50 }]),
        true,
    )
    .await;

    seed_material(&pool, "Cement", "kg", 30.0, 50.0).await;
    seed_material(&pool, "Sand", "t", 1.0, 5.0).await;

    let email = RecordingEmailSender::new();
    let producers = Arc::new(producers_with(&pool, email.clone(), RecordingSmsSender::new()));
    let scheduler = Scheduler::new(pool.clone(), producers, SchedulerConfig::default());

    assert_eq!(scheduler.run_stock_scan().await.unwrap(), 2);
    assert_eq!(email.sent().len(), 2);

    let rows = audit_rows(&pool).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.0 == trigger_id && r.2 && r.3 == 1));

    // No dedup across scans: a second pass fires again (at-least-once).
    assert_eq!(scheduler.run_stock_scan().await.unwrap(), 2);
    assert_eq!(audit_rows(&pool).await.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_without_triggers_is_a_no_op(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let producers = producers_with(
        &pool,
        RecordingEmailSender::new(),
        RecordingSmsSender::new(),
    );
    let material_id = seed_material(&pool, "Cement", "kg", 30.0, 50.0).await;

    let summary = producers.stock_level_changed(material_id).await.unwrap();
    assert_eq!(summary.triggers_matched, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quality_producer_includes_material_name(pool: sqlx::PgPool) {
    seed_admin(&pool, "Ops", "ops@example.com").await;
    let template_id = seed_template(
        &pool,
        "{{testType}} failed",
        "{{materialName}}: {{measuredValue}}",
        json!(["email"]),
        true,
    )
    .await;
    seed_trigger(
        &pool,
        "quality_test_failed",
        Some(template_id),
        json!([{ "field": "result", "operator": "equals", "value": "failed" }]),
        true,
    )
    .await;

    let material_id = seed_material(&pool, "C25/30", "m3", 100.0, 10.0).await;
    let test_id: i64 = sqlx::query_scalar(
        "INSERT INTO quality_tests (test_type, material_id, result, measured_value, tested_at)
         VALUES ('slump', $1, 'failed', 12.5, NOW())
         RETURNING id",
    )
    .bind(material_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let email = RecordingEmailSender::new();
    let producers = producers_with(&pool, email.clone(), RecordingSmsSender::new());
    let summary = producers.quality_test_failed(test_id).await.unwrap();
    assert_eq!(summary.executed, 1);

    let sent = email.sent();
    assert_eq!(sent[0].subject, "slump failed");
    assert_eq!(sent[0].body, "C25/30: 12.5");
}
