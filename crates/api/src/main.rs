use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workdesk_api::app::build_router;
use workdesk_api::config::ServerConfig;
use workdesk_api::state::AppState;
use workdesk_db::DbPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    tracing::info!(
        host = %config.host,
        port = config.port,
        timeout_secs = config.request_timeout_secs,
        "Loaded server configuration"
    );

    let pool = prepare_database(&config).await;

    let ip: IpAddr = config
        .host
        .parse()
        .unwrap_or_else(|e| panic!("Invalid HOST '{}': {e}", config.host));
    let addr = SocketAddr::new(ip, config.port);

    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    let app = build_router(state).unwrap_or_else(|e| panic!("Invalid CORS origin: {e}"));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Board API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// `RUST_LOG` wins; otherwise debug output for this crate and `tower_http`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "workdesk_api=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify connectivity, and bring the schema up to date.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let pool = workdesk_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");

    workdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    workdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready and migrated"
    );
    pool
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
