use anyhow::{bail, Result};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::config::Config;

/// Serves the built client bundle as the router's fallback. Unknown paths get
/// `index.html` so client-side routes resolve.
///
/// Fails when the bundle directory does not exist; the client must be built
/// before the server is started with `SERVE_CLIENT` on.
pub fn mount_client(router: Router, config: &Config) -> Result<Router> {
    if !config.serve_client {
        return Ok(router);
    }

    let dist = &config.client_dist_dir;
    if !dist.is_dir() {
        bail!(
            "Could not find the client build directory {}, build the client first or set SERVE_CLIENT=false",
            dist.display()
        );
    }

    info!("Serving client bundle from {}", dist.display());
    let index = ServeFile::new(dist.join("index.html"));
    Ok(router.fallback_service(ServeDir::new(dist).fallback(index)))
}
