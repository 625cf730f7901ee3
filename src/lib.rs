pub mod admin;
pub mod appresult;
pub mod chats;
pub mod config;
pub mod context;
pub mod db;
pub mod dto;
pub mod models;
pub mod users;

use axum::{debug_handler, extract::FromRef, routing::get, Router};
use tower_http::cors::CorsLayer;

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use context::RequestContext;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Config,
}

pub fn app(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(users::router())
        .merge(chats::router())
        .merge(admin::router());

    Router::new()
        .route("/build", get(build))
        .nest("/v1", v1)
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[debug_handler]
async fn build() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
