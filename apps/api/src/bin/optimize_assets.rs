use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio_api::assets::optimize::optimize_all;
use portfolio_api::config::Config;

/// Pre-generates resized and WebP variants for every project asset folder.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("portfolio_api={0},optimize_assets={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Optimizing {} into {}",
        config.project_assets_dir.display(),
        config.optimized_assets_dir.display()
    );

    let report = optimize_all(&config.project_assets_dir, &config.optimized_assets_dir).await?;

    for folder in &report.folders {
        info!(
            "{}: {} optimized ({} variants), {} copied, {} fell back, {} failed",
            folder.folder,
            folder.optimized,
            folder.variants,
            folder.copied,
            folder.fell_back,
            folder.failed
        );
    }

    if report.failed() > 0 {
        warn!(
            "{} files could not be written to {}",
            report.failed(),
            config.optimized_assets_dir.display()
        );
    }

    Ok(())
}
