use axum::{Router, routing::get};

use crate::{AppState, middleware::log_errors};

pub mod auth;

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::home))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
