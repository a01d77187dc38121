use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
///
/// Every request gets an `x-request-id` and a timing log line.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health/ping", get(handlers::ping))
        .route("/health/info", get(handlers::info))
        // Spendings
        .route("/spendings", post(handlers::create_spending))
        .route(
            "/spendings/:user_id",
            get(handlers::get_spendings).delete(handlers::delete_spendings),
        )
        // Derived queries
        .route("/matrix_properties", get(handlers::matrix_properties))
        .route("/recommendations/:user_id", get(handlers::get_recommendation))
        // Users
        .route("/user", post(handlers::create_user))
        .route("/check_name", post(handlers::check_name))
        .route("/divide", get(handlers::divide))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_span_with_request_id)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                ),
        )
        .with_state(state)
}
