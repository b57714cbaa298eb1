use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::booking_rules::{self, CreateBookingRequest, UpdateStatusRequest};
use crate::state::AppState;

// GET /api/bookings/municipalities
pub async fn list_municipalities(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.municipalities.municipalities().await)
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let municipalities = state.municipalities.municipalities().await;
    let today = chrono::Local::now().date_naive();
    let new = booking_rules::validate_new_booking(&req, &municipalities, today)?;

    let token = uuid::Uuid::new_v4().to_string();
    let now = chrono::Local::now().naive_local();
    let booking = {
        let db = state.db();
        queries::insert_booking(&db, &new, &token, now)?
    };

    tracing::info!(municipality = %new.municipality, "new booking created with token {token}");
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/token/:token
pub async fn get_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = {
        let db = state.db();
        queries::get_booking_by_token(&db, &token)?
    };

    booking
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

// GET /api/bookings/staff/:key
pub async fn list_for_municipality(
    State(state): State<Arc<AppState>>,
    Path(municipality): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = {
        let db = state.db();
        queries::get_bookings_for_municipality(&db, &municipality)?
    };
    Ok(Json(bookings))
}

// PATCH /api/bookings/staff/:key/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let status = booking_rules::parse_status(req.status.as_deref())?;
    let now = chrono::Local::now().naive_local();

    let updated = {
        let db = state.db();
        queries::update_booking_status(&db, id, status, now)?
    };

    match updated {
        Some(booking) => {
            tracing::info!(
                "booking {} status updated to {}",
                booking.booking_token.as_deref().unwrap_or("?"),
                status.as_str()
            );
            Ok(Json(booking))
        }
        None => Err(AppError::NotFound(format!("Booking with id {id} not found"))),
    }
}
