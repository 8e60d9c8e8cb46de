use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio_api::config::Config;
use portfolio_api::contact::mailer::SendGridMailer;
use portfolio_api::contact::relay::ContactRelay;
use portfolio_api::portfolio::store::PortfolioStore;
use portfolio_api::routes::{build_router, static_files};
use portfolio_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("portfolio_api={0},tower_http={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio API v{}", env!("CARGO_PKG_VERSION"));
    config.warn_on_missing_email();

    let store = Arc::new(PortfolioStore::new(&config.data_file));
    info!("Portfolio data file: {}", store.path().display());
    info!(
        "Serving project assets from {}",
        config.serving_assets_dir().display()
    );

    let mailer = Arc::new(SendGridMailer::new(config.email.sendgrid_api_key.clone())?);
    let contact = ContactRelay::new(mailer, config.email.clone());

    let state = AppState {
        config: config.clone(),
        store,
        contact,
    };

    let app = static_files::mount_client(build_router(state), &config)?
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
