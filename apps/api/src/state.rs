use std::sync::Arc;

use crate::config::Config;
use crate::contact::relay::ContactRelay;
use crate::portfolio::store::PortfolioStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Single in-memory slot for the portfolio document.
    pub store: Arc<PortfolioStore>,
    pub contact: ContactRelay,
}
