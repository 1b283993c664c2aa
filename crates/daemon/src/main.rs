//! mortar-daemon: the trigger engine process.
//!
//! Wires configuration, the database pool, the notification transports,
//! and the scheduler, then waits for a termination signal and drains
//! the scan loops.

use std::sync::Arc;
use std::time::Duration;

use mortar_engine::transport::{
    DisabledEmailSender, DisabledSmsSender, EmailConfig, EmailSender, HttpSmsSender, SmsConfig,
    SmsSender, SmtpEmailSender,
};
use mortar_engine::{EventDispatcher, EventProducers, Scheduler, SchedulerConfig, TriggerExecutor};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for each scan loop to finish after cancellation.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mortar_daemon=debug,mortar_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Storage ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = mortar_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    mortar_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    mortar_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Transports ---
    // Unconfigured channels degrade to per-send failures instead of a
    // startup panic, so a template targeting them is visible in the
    // logs rather than silently undeliverable.
    let email: Arc<dyn EmailSender> = match EmailConfig::from_env() {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, "SMTP email transport configured");
            Arc::new(SmtpEmailSender::new(config))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email sends will fail as not configured");
            Arc::new(DisabledEmailSender)
        }
    };
    let sms: Arc<dyn SmsSender> = match SmsConfig::from_env() {
        Some(config) => {
            tracing::info!(gateway = %config.gateway_url, "SMS gateway transport configured");
            Arc::new(HttpSmsSender::new(config))
        }
        None => {
            tracing::warn!("SMS_GATEWAY_URL not set, SMS sends will fail as not configured");
            Arc::new(DisabledSmsSender)
        }
    };

    // --- Engine ---
    let executor = TriggerExecutor::new(pool.clone(), email, sms);
    let dispatcher = EventDispatcher::new(pool.clone(), executor);
    let producers = Arc::new(EventProducers::new(pool.clone(), dispatcher));
    let scheduler = Arc::new(Scheduler::new(
        pool.clone(),
        producers,
        SchedulerConfig::from_env(),
    ));

    let cancel = CancellationToken::new();
    let handles = scheduler.spawn(cancel.clone());
    tracing::info!("mortar daemon started");

    shutdown_signal().await;

    // --- Drain ---
    cancel.cancel();
    for handle in handles {
        if tokio::time::timeout(DRAIN_TIMEOUT, handle).await.is_err() {
            tracing::warn!("Scan loop did not stop within the drain timeout");
        }
    }
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the daemon
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
