use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use anyhow::Context;
use axum::extract::Request;
use axum::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes_api::config::ServerConfig;
use notes_api::router::build_app_router;
use notes_api::state::AppState;
use notes_db::DbConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notes_api=debug,notes_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Invalid server configuration");
            return ExitCode::FAILURE;
        }
    };
    let db_config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Invalid database configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    match run(config, &db_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "Failed to start");
            let hint = err
                .downcast_ref::<sqlx::Error>()
                .is_some_and(|db_err| notes_db::should_hint_password(&db_config, db_err));
            if hint {
                tracing::error!("Tip: set DB_PASSWORD in .env to your PostgreSQL password");
            }
            ExitCode::FAILURE
        }
    }
}

/// Bring up the database, then serve until a shutdown signal arrives.
async fn run(config: ServerConfig, db_config: &DbConfig) -> anyhow::Result<()> {
    // --- Database ---
    tracing::info!(db = %db_config.describe(), "Connecting to database");

    notes_db::ensure_database(db_config)
        .await
        .context("Failed to ensure database exists")?;

    let pool = notes_db::create_pool(db_config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    notes_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    notes_db::ensure_schema(&pool)
        .await
        .context("Failed to create notes table")?;
    tracing::info!("Database ready");

    // --- Router ---
    let app = build_app_router(AppState { pool }, &config);

    // --- Start server ---
    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(ip, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, static_dir = %config.static_dir.display(), "Server listening");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
