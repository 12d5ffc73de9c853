use std::sync::Arc;

use kibble_wizard::config::ServerConfig;
use kibble_wizard::routes::{AppState, app_routes};
use kibble_wizard::store::{FlagStore, Flags, LibSqlFlagStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    eprintln!("🐾 Kibble Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Wizard API: http://0.0.0.0:{}/api/wizard", config.port);
    eprintln!("   Database: {}", config.db_path);
    eprintln!(
        "   Draft persistence: {:?}, re-entry: {:?}\n",
        config.wizard.draft_persistence, config.wizard.reentry
    );

    let store: Arc<dyn FlagStore> =
        Arc::new(LibSqlFlagStore::new_local(std::path::Path::new(&config.db_path)).await?);
    let state = AppState::new(Flags::new(store), config.wizard.clone()).await;
    let app = app_routes(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
