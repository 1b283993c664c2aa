//! Periodic scans that feed the event producers.
//!
//! Four independent loops: an hourly stock scan, a 30-minute overdue
//! delivery scan, a 2-hour failed quality test scan, and a daily
//! overdue-task scan at a fixed local wall-clock hour. Interval scans
//! tick immediately on start (the warm-up pass), and every loop exits
//! when the shared [`CancellationToken`] fires.
//!
//! Scans are read-then-dispatch with no locking or deduplication, so
//! overlapping scans can fire the same trigger twice: delivery is
//! at-least-once, never exactly-once. The scan bodies are public
//! one-shot methods so tests drive ticks deterministically.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use mortar_db::repositories::{DeliveryRepo, MaterialRepo, QualityTestRepo, TaskRepo};
use mortar_db::DbPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::producers::EventProducers;

/// Default stock scan interval: hourly.
const DEFAULT_STOCK_SCAN_SECS: u64 = 3600;

/// Default overdue delivery scan interval: every 30 minutes.
const DEFAULT_DELIVERY_SCAN_SECS: u64 = 1800;

/// Default failed quality test scan interval: every 2 hours.
const DEFAULT_QUALITY_SCAN_SECS: u64 = 7200;

/// Default local hour for the daily overdue-task scan.
const DEFAULT_TASK_SCAN_HOUR: u32 = 9;

/// Scan timing configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Stock scan interval (default: hourly).
    pub stock_scan_interval: Duration,
    /// Overdue delivery scan interval (default: 30 minutes).
    pub delivery_scan_interval: Duration,
    /// Failed quality test scan interval (default: 2 hours).
    pub quality_scan_interval: Duration,
    /// Local wall-clock hour of the daily task scan (default: 9).
    pub task_scan_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            stock_scan_interval: Duration::from_secs(DEFAULT_STOCK_SCAN_SECS),
            delivery_scan_interval: Duration::from_secs(DEFAULT_DELIVERY_SCAN_SECS),
            quality_scan_interval: Duration::from_secs(DEFAULT_QUALITY_SCAN_SECS),
            task_scan_hour: DEFAULT_TASK_SCAN_HOUR,
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `STOCK_SCAN_INTERVAL_SECS`    | `3600`  |
    /// | `DELIVERY_SCAN_INTERVAL_SECS` | `1800`  |
    /// | `QUALITY_SCAN_INTERVAL_SECS`  | `7200`  |
    /// | `TASK_SCAN_HOUR`              | `9`     |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            stock_scan_interval: env_secs("STOCK_SCAN_INTERVAL_SECS", defaults.stock_scan_interval),
            delivery_scan_interval: env_secs(
                "DELIVERY_SCAN_INTERVAL_SECS",
                defaults.delivery_scan_interval,
            ),
            quality_scan_interval: env_secs(
                "QUALITY_SCAN_INTERVAL_SECS",
                defaults.quality_scan_interval,
            ),
            task_scan_hour: std::env::var("TASK_SCAN_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h| *h < 24)
                .unwrap_or(defaults.task_scan_hour),
        }
    }
}

fn env_secs(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Background service driving the periodic entity scans.
pub struct Scheduler {
    pool: DbPool,
    producers: Arc<EventProducers>,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler over the producer set.
    pub fn new(pool: DbPool, producers: Arc<EventProducers>, config: SchedulerConfig) -> Self {
        Self {
            pool,
            producers,
            config,
        }
    }

    /// Spawn the four scan loops, returning their join handles.
    ///
    /// Each loop runs until `cancel` fires; the caller awaits the
    /// handles to drain in-flight scans on shutdown.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        tracing::info!(
            stock_secs = self.config.stock_scan_interval.as_secs(),
            delivery_secs = self.config.delivery_scan_interval.as_secs(),
            quality_secs = self.config.quality_scan_interval.as_secs(),
            task_hour = self.config.task_scan_hour,
            "Scheduler starting"
        );

        let mut handles = Vec::with_capacity(4);
        {
            let scheduler = Arc::clone(&self);
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                scheduler.stock_loop(cancel).await;
            }));
        }
        {
            let scheduler = Arc::clone(&self);
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                scheduler.delivery_loop(cancel).await;
            }));
        }
        {
            let scheduler = Arc::clone(&self);
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                scheduler.quality_loop(cancel).await;
            }));
        }
        {
            let scheduler = Arc::clone(&self);
            handles.push(tokio::spawn(async move {
                scheduler.daily_task_loop(cancel).await;
            }));
        }
        handles
    }

    // The three interval loops share a shape: the first tick of
    // `tokio::time::interval` fires immediately, which is the warm-up
    // pass after process start.

    async fn stock_loop(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.stock_scan_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(scan = "stock", "Scan loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    report_scan("stock", self.run_stock_scan().await);
                }
            }
        }
    }

    async fn delivery_loop(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.delivery_scan_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(scan = "delivery", "Scan loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    report_scan("delivery", self.run_delivery_scan().await);
                }
            }
        }
    }

    async fn quality_loop(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.quality_scan_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(scan = "quality", "Scan loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    report_scan("quality", self.run_quality_scan().await);
                }
            }
        }
    }

    /// Daily loop: sleep until the configured local hour, scan, repeat.
    /// Recomputing the delay each iteration yields the every-24h cadence
    /// and absorbs clock adjustments.
    async fn daily_task_loop(&self, cancel: CancellationToken) {
        loop {
            let delay = until_next_hour(Local::now().naive_local(), self.config.task_scan_hour);
            tracing::debug!(
                delay_secs = delay.as_secs(),
                "Task scan sleeping until next run"
            );
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(scan = "task", "Scan loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(delay) => {
                    report_scan("task", self.run_task_scan().await);
                }
            }
        }
    }

    /// Scan active materials below their minimum stock and dispatch a
    /// stock event for each. Returns the number of materials scanned.
    pub async fn run_stock_scan(&self) -> Result<usize, sqlx::Error> {
        let materials = MaterialRepo::list_below_minimum(&self.pool).await?;
        for material in &materials {
            if let Err(e) = self.producers.stock_level_changed(material.id).await {
                tracing::error!(material_id = material.id, error = %e, "Stock event failed");
            }
        }
        Ok(materials.len())
    }

    /// Scan non-terminal deliveries past their scheduled time.
    pub async fn run_delivery_scan(&self) -> Result<usize, sqlx::Error> {
        let deliveries = DeliveryRepo::list_overdue(&self.pool).await?;
        for delivery in &deliveries {
            if let Err(e) = self.producers.delivery_delayed(delivery.id).await {
                tracing::error!(delivery_id = delivery.id, error = %e, "Delivery event failed");
            }
        }
        Ok(deliveries.len())
    }

    /// Scan quality tests with a failing result.
    pub async fn run_quality_scan(&self) -> Result<usize, sqlx::Error> {
        let tests = QualityTestRepo::list_failed(&self.pool).await?;
        for test in &tests {
            if let Err(e) = self.producers.quality_test_failed(test.id).await {
                tracing::error!(test_id = test.id, error = %e, "Quality event failed");
            }
        }
        Ok(tests.len())
    }

    /// Scan the active users holding overdue tasks; the producer fans
    /// out one event per overdue task. Returns the number of users.
    pub async fn run_task_scan(&self) -> Result<usize, sqlx::Error> {
        let user_ids = TaskRepo::list_assignees_with_overdue(&self.pool).await?;
        for &user_id in &user_ids {
            if let Err(e) = self.producers.overdue_tasks_for_user(user_id).await {
                tracing::error!(user_id, error = %e, "Overdue task events failed");
            }
        }
        Ok(user_ids.len())
    }
}

/// Log one scan's outcome at the appropriate level.
fn report_scan(name: &str, result: Result<usize, sqlx::Error>) {
    match result {
        Ok(dispatched) if dispatched > 0 => {
            tracing::info!(scan = name, dispatched, "Scan completed");
        }
        Ok(_) => {
            tracing::debug!(scan = name, "Scan completed, nothing to dispatch");
        }
        Err(e) => {
            tracing::error!(scan = name, error = %e, "Scan failed");
        }
    }
}

/// Time from `now` until the next occurrence of `hour:00:00`.
///
/// A `now` exactly on the hour waits a full day, so a scan that just
/// ran does not immediately run again.
fn until_next_hour(now: NaiveDateTime, hour: u32) -> Duration {
    let today_run = now
        .date()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| now.date().and_hms_opt(0, 0, 0).unwrap());

    let next = if today_run > now {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };

    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn next_run_later_today() {
        let delay = until_next_hour(at(7, 30, 0), 9);
        assert_eq!(delay, Duration::from_secs(90 * 60));
    }

    #[test]
    fn next_run_tomorrow_when_hour_has_passed() {
        let delay = until_next_hour(at(10, 0, 0), 9);
        assert_eq!(delay, Duration::from_secs(23 * 3600));
    }

    #[test]
    fn exactly_on_the_hour_waits_a_full_day() {
        let delay = until_next_hour(at(9, 0, 0), 9);
        assert_eq!(delay, Duration::from_secs(24 * 3600));
    }

    #[test]
    fn default_config_matches_documented_cadence() {
        let config = SchedulerConfig::default();
        assert_eq!(config.stock_scan_interval, Duration::from_secs(3600));
        assert_eq!(config.delivery_scan_interval, Duration::from_secs(1800));
        assert_eq!(config.quality_scan_interval, Duration::from_secs(7200));
        assert_eq!(config.task_scan_hour, 9);
    }
}
