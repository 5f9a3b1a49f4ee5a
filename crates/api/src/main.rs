use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pawres_api::config::ServerConfig;
use pawres_api::router::build_app_router;
use pawres_api::state::AppState;
use pawres_core::classify::NoopClassifier;
use pawres_db::Store;
use pawres_engine::{QueryCache, TransitionEngine};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawres_api=debug,pawres_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store = Store::connect(&config.database_url)
        .await
        .expect("Failed to open the database");
    tracing::info!(url = %config.database_url, "Store opened");

    store
        .run_migrations()
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    store
        .health_check()
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- Engine + cache ---
    let cache = QueryCache::new(config.cache_ttl());
    let engine = TransitionEngine::new(store.clone(), cache);

    // --- App state ---
    // No classifier model is wired by default; the endpoint reports 503
    // until a backing implementation is injected.
    let state = AppState {
        store,
        engine,
        classifier: Arc::new(NoopClassifier),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
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
