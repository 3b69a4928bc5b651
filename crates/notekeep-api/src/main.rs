//! notekeep API server.

use std::net::SocketAddr;
use std::sync::Arc;

use notekeep_api::middleware::build_rate_limiter;
use notekeep_api::{build_router, AppState, NotesService, RouterConfig, ServerConfig, StoreBackend};
use notekeep_core::logging::SUBSYSTEM;
use notekeep_core::NoteStore;
use notekeep_db::{Database, MemoryNoteStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = notekeep_api::logging::init_tracing();

    let config = ServerConfig::from_env()?;
    info!(
        { SUBSYSTEM } = "api",
        backend = ?config.backend,
        identity_header = %config.identity_header,
        rate_limit_enabled = config.rate_limit_enabled,
        "Configuration loaded"
    );

    let (store, db): (Arc<dyn NoteStore>, Option<Database>) = match config.backend {
        StoreBackend::Postgres => {
            let db = Database::connect(&config.database_url, &config.pool_config()).await?;
            db.migrate().await?;
            info!({ SUBSYSTEM } = "database", "Migrations applied");
            let store: Arc<dyn NoteStore> = Arc::new(db.notes.clone());
            (store, Some(db))
        }
        StoreBackend::Memory => {
            warn!({ SUBSYSTEM } = "api", "Using in-memory note store; notes are lost on exit");
            let store: Arc<dyn NoteStore> = Arc::new(MemoryNoteStore::new());
            (store, None)
        }
    };

    let rate_limiter = if config.rate_limit_enabled {
        let limiter =
            build_rate_limiter(config.rate_limit_requests, config.rate_limit_period_secs);
        if limiter.is_none() {
            warn!("Rate limit requests and period must be non-zero; rate limiting disabled");
        }
        limiter
    } else {
        None
    };

    let mut state = AppState::new(NotesService::new(store))
        .with_identity_header(config.identity_header.clone())
        .with_rate_limiter(rate_limiter);
    if let Some(db) = db {
        state = state.with_database(db);
    }

    let app = build_router(
        state,
        RouterConfig {
            allowed_origins: config.allowed_origins.clone(),
            max_body_bytes: config.max_body_bytes,
        },
    );

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
