pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::search::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs/search", post(handlers::handle_search))
        .route("/api/v1/jobs/trending", get(handlers::handle_trending))
        .route("/api/v1/jobs/suggestions", post(handlers::handle_suggestions))
        .route(
            "/api/v1/jobs/details/:job_id",
            get(handlers::handle_job_details),
        )
        .with_state(state)
}
