mod api;
mod config;
mod fuzzy;
mod notify;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::storage::Database;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Home Kitchen server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Site: {}", config.site.name);
    info!("   - Database: {}", config.storage.database_path.display());
    info!("   - Server: {}", config.bind_address());

    // Initialize database
    info!("💾 Initializing database...");
    let db = Database::open(&config.storage.database_path)?;
    db.create_schema().await?;
    let seeded = db.seed_catalog().await?;
    let food_count = db.count_foods().await?;
    info!("✅ Database ready ({} foods, {} newly seeded)", food_count, seeded);

    // Initialize notifier
    let (notifier, worker) = Notifier::from_config(&config.mail);
    if notifier.is_enabled() {
        info!(
            "📧 Owner notifications via {}:{}",
            config.mail.smtp_host, config.mail.smtp_port
        );
    }

    let addr = config.bind_address();
    let drain_grace = Duration::from_secs(config.mail.shutdown_grace_secs);

    // Create application state
    let state = AppState {
        db,
        notifier,
        config: Arc::new(config),
    };

    let app = api::router(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                   - Menu page");
    info!("   GET  /health             - Health check");
    info!("   GET  /api/foods          - List foods");
    info!("   GET  /api/search?q=      - Fuzzy name search");
    info!("   GET  /api/reviews        - List reviews");
    info!("   POST /api/submit_review  - Add review");
    info!("   POST /api/contact        - Contact message");
    info!("   POST /api/bulk           - Bulk order inquiry");
    info!("   POST /submit_order       - Place order");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and every Notifier clone are gone now, so the worker can finish
    if let Some(worker) = worker {
        info!("📨 Draining notification queue...");
        let abandoned = worker.drain(drain_grace).await;
        if abandoned > 0 {
            warn!("⚠️  {} notifications abandoned", abandoned);
        }
    }

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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

    info!("🛑 Shutdown signal received");
}
