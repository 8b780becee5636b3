//! ClaimReady - API Server Binary
//!
//! This binary starts the HTTP API server for the claim readiness system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claimready-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin claimready-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_PORTAL_BASE_URL` - Base URL for links in reminder emails
//! * `API_REMINDER_SCAN_INTERVAL_SECS` - Seconds between reminder scans (default: 3600)
//! * `SMTP_HOST` - SMTP relay hostname; reminders are disabled when unset
//! * `SMTP_PORT` - SMTP relay port (default: 587)
//! * `SMTP_USERNAME` / `SMTP_PASSWORD` - Relay credentials
//! * `SMTP_FROM` - From address for reminder emails

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_jumpstart::JumpstartService;
use domain_loss::adapters::{SmtpMailerConfig, SmtpReminderMailer};
use domain_loss::{LossEventService, LossEventStore, ReminderScanner};
use domain_proof::ProofOfLossService;
use infra_db::{
    PostgresAssetCatalog, PostgresJumpstartAdapter, PostgresLossEventAdapter,
    PostgresLossEventGateway, PostgresProofOfLossAdapter, PostgresRecipientDirectory,
};
use interface_api::{config::ApiConfig, create_router, scheduler, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes the database
/// connection, wires the domain services onto their Postgres adapters,
/// and starts the HTTP server plus the reminder scan loop.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - SMTP settings are present but malformed
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting ClaimReady API Server"
    );

    let pool = infra_db::create_pool_from_url(&config.database_url).await?;
    infra_db::run_migrations(&pool).await?;

    // Wire each domain service onto its Postgres adapters
    let loss_adapter = Arc::new(PostgresLossEventAdapter::new(pool.clone()));
    let loss_store: Arc<dyn LossEventStore> = loss_adapter.clone();
    let loss_events = Arc::new(LossEventService::new(loss_store.clone()));

    let proof_of_loss = Arc::new(ProofOfLossService::new(
        Arc::new(PostgresLossEventGateway::new(pool.clone())),
        Arc::new(PostgresAssetCatalog::new(pool.clone())),
        Arc::new(PostgresProofOfLossAdapter::new(pool.clone())),
    ));

    let jumpstart = Arc::new(JumpstartService::new(Arc::new(
        PostgresJumpstartAdapter::new(pool.clone()),
    )));

    let state = AppState {
        loss_events,
        proof_of_loss,
        jumpstart,
        health: loss_adapter,
        config: config.clone(),
    };

    // The reminder loop only runs when an SMTP relay is configured
    let shutdown = CancellationToken::new();
    let reminder_task = match load_smtp_config() {
        Some(smtp) => {
            let mailer = Arc::new(SmtpReminderMailer::new(&smtp)?);
            let scanner = Arc::new(ReminderScanner::new(
                loss_store,
                Arc::new(PostgresRecipientDirectory::new(pool)),
                mailer,
                config.portal_base_url.clone(),
            ));
            let interval = Duration::from_secs(config.reminder_scan_interval_secs);
            Some(tokio::spawn(scheduler::run_reminder_loop(
                scanner,
                interval,
                shutdown.clone(),
            )))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; deadline reminder emails are disabled");
            None
        }
    };

    let app = create_router(state);
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the reminder loop before reporting shutdown
    shutdown.cancel();
    if let Some(task) = reminder_task {
        let _ = task.await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to default values if environment variables are not set.
fn load_config() -> ApiConfig {
    // Try to load from environment with API_ prefix
    ApiConfig::from_env().unwrap_or_else(|_| {
        // Fall back to individual env vars or defaults
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            jwt_secret: std::env::var("API_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expiration_secs: std::env::var("API_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jwt_expiration_secs),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("API_DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            portal_base_url: std::env::var("API_PORTAL_BASE_URL")
                .unwrap_or(defaults.portal_base_url),
            reminder_scan_interval_secs: std::env::var("API_REMINDER_SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reminder_scan_interval_secs),
        }
    })
}

/// Loads SMTP relay settings when a relay is configured.
///
/// Returns `None` when `SMTP_HOST` is unset, which disables the
/// reminder loop entirely rather than erroring at startup.
fn load_smtp_config() -> Option<SmtpMailerConfig> {
    let host = std::env::var("SMTP_HOST").ok()?;
    Some(SmtpMailerConfig {
        host,
        port: std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587),
        username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
        password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
        from_address: std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| "ClaimReady <no-reply@claimready.io>".to_string()),
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
