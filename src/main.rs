use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newcool_search::catalog::Catalog;
use newcool_search::config::AppConfig;
use newcool_search::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newcool_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 NewCool Search");

    let config = AppConfig::load()?;
    let addr = config.socket_addr()?;

    // Step 1: Load catalog
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path).await?,
        None => {
            tracing::info!("📦 Using built-in catalog");
            Catalog::builtin()?
        }
    };

    // Step 2: Build search index
    tracing::info!("📚 Building search index...");
    let state = AppState::new(catalog, config.environment.clone());
    let stats = state.search_engine().stats();
    tracing::info!(
        "✅ Indexed {} tracks, {} courses, {} modules",
        stats.music.indexed,
        stats.courses.indexed,
        stats.modules.indexed
    );

    // Step 3: Start server
    tracing::info!("🌐 Starting web server on http://{}", addr);
    tracing::info!("Press Ctrl+C to stop");

    server::serve(addr, state).await?;

    Ok(())
}
