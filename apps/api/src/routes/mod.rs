pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendations::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations",
            post(handlers::handle_recommendations),
        )
        .with_state(state)
}
