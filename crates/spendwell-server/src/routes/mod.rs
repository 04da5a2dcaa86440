mod auth;
mod expenses;
mod pages;
mod settings;

use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    // Rate limit: login handshake — 10 requests per 60 seconds per IP
    let login_governor = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .finish()
        .unwrap();

    let login_routes = Router::new()
        .route("/login/google", get(auth::login_start))
        .route("/login/google_login", get(auth::google_callback))
        .layer(GovernorLayer::new(Arc::new(login_governor)));

    Router::new()
        .route("/health", get(health))
        .route("/", get(pages::index))
        .route("/logout", get(auth::logout))
        .route("/api/v1/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/v1/expenses/{id}",
            put(expenses::update).delete(expenses::delete),
        )
        .route(
            "/api/v1/settings/cards",
            get(settings::get_cards).put(settings::put_cards),
        )
        .merge(login_routes)
        .nest_service("/assets", ServeDir::new(&state.config.static_dir))
        .with_state(state)
}
