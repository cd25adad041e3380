use config::Config;
use oauth::IdentityProvider;
use session::SessionManager;
use std::sync::Arc;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod session;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
    pub provider: Arc<dyn IdentityProvider>,
}
