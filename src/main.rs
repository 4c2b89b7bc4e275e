//! ClassHub notification server.
//!
//! Entry point that wires the notification pipeline together and starts
//! the server. Every component is constructed here and injected
//! explicitly; nothing reaches for globals.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use classhub_core::config::AppConfig;
use classhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("CLASSHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ClassHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = classhub_database::DatabasePool::connect(&config.database).await?;
    classhub_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let event_repo = classhub_database::repositories::EventRepository::new(db.pool().clone());
    let notification_repo =
        classhub_database::repositories::NotificationRepository::new(db.pool().clone());
    let job_repo = classhub_database::repositories::JobRepository::new(db.pool().clone());
    let roster_provider = Arc::new(classhub_database::repositories::SqlRosterProvider::new(
        db.pool().clone(),
    ));

    // ── Step 3: Auth ─────────────────────────────────────────────
    let jwt_decoder = classhub_auth::JwtDecoder::new(&config.auth);

    // ── Step 4: Services ─────────────────────────────────────────
    let event_log = classhub_service::EventLog::new(event_repo);
    let resolver = classhub_service::RecipientResolver::new(roster_provider);
    let store = classhub_service::NotificationStore::new(notification_repo, resolver.clone());
    let queue = classhub_worker::NotificationQueue::new(job_repo, config.queue.clone());
    let fanout = classhub_service::FanoutService::new(resolver, store.clone(), queue.clone());

    // ── Step 5: Realtime registry ────────────────────────────────
    let registry = Arc::new(classhub_realtime::LiveConnectionRegistry::new(
        &config.realtime,
    ));
    let ws_auth = classhub_realtime::WsAuthenticator::new(jwt_decoder.clone());

    // ── Step 6: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 7: Delivery worker pool ─────────────────────────────
    let worker_handle = if config.worker.enabled {
        let executor = Arc::new(classhub_worker::JobExecutor::new().register(Arc::new(
            classhub_worker::DeliveryJobHandler::new(
                Arc::clone(&registry),
                config.worker.chunk_size,
            ),
        )));
        let runner =
            classhub_worker::WorkerRunner::new(queue.clone(), executor, config.worker.clone());
        let worker_cancel = shutdown_rx.clone();
        tracing::info!("Starting delivery worker...");
        Some(tokio::spawn(async move {
            runner.run(worker_cancel).await;
        }))
    } else {
        tracing::info!("Delivery worker disabled");
        None
    };

    // ── Step 8: Queue maintenance scheduler ──────────────────────
    let mut scheduler = classhub_worker::MaintenanceScheduler::new(queue.clone()).await?;
    scheduler.start().await?;

    // ── Step 9: Build and start HTTP server ──────────────────────
    let app_state = classhub_api::AppState {
        db: db.clone(),
        event_log,
        notifications: store,
        fanout,
        queue,
        registry: Arc::clone(&registry),
        ws_auth,
        jwt: jwt_decoder,
    };
    let app = classhub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ClassHub server listening on {}", addr);

    // ── Step 10: Graceful shutdown ───────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 11: Wait for background tasks ───────────────────────
    if let Some(handle) = worker_handle {
        let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
        let _ = tokio::time::timeout(grace, handle).await;
    }
    scheduler.shutdown().await?;
    registry.close_all();
    db.close().await;

    tracing::info!("ClassHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
