use ansible_webui::api::{AppState, create_router};
use ansible_webui::config::Config;
use ansible_webui::config::hardcoded::{LOG_TIME_FORMAT, RELOAD_INTERVAL, THREAD_JOIN_TIMEOUT};
use ansible_webui::repository::{JobRepository, establish_connection};
use ansible_webui::services::Scheduler;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.deployment.default_log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string())),
        )
        .init();

    tracing::info!("Starting ansible-webui with config: {:?}", config);

    if let Some(path) = config.database_url.strip_prefix("sqlite:") {
        let path = std::path::Path::new(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    for dir in [&config.path_play, &config.path_run, &config.path_repo] {
        std::fs::create_dir_all(dir)?;
    }

    // Establish database connection
    let db_pool = establish_connection(&config.database_url).await?;
    tracing::info!("Database connected: {}", config.database_url);

    let addr = format!("{}:{}", config.host, config.port);
    let addr = addr.parse::<SocketAddr>()?;

    let state = AppState::new(config, db_pool.clone())?;
    state.auth_service.ensure_admin(&state.config).await?;
    state.auth_service.purge_expired_sessions().await?;

    // Background scheduler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Scheduler::new(
        JobRepository::new(db_pool),
        state.execution_service.clone(),
        Duration::from_secs(RELOAD_INTERVAL),
    );
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    let app = create_router(state);

    // Start server
    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send(true).ok();
    if tokio::time::timeout(Duration::from_secs(THREAD_JOIN_TIMEOUT), scheduler_handle)
        .await
        .is_err()
    {
        tracing::warn!(
            "Scheduler did not stop within {} seconds",
            THREAD_JOIN_TIMEOUT
        );
    }

    Ok(())
}
