pub mod bookings;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/bookings/municipalities",
            get(bookings::list_municipalities),
        )
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/token/:token", get(bookings::get_by_token))
        // Both staff routes share the parameter name at this position: the
        // list takes a municipality, the status update a booking id.
        .route(
            "/api/bookings/staff/:key",
            get(bookings::list_for_municipality),
        )
        .route(
            "/api/bookings/staff/:key/status",
            patch(bookings::update_status),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
