use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{BookingStatus, TimeSlot};

/// Body of `POST /api/bookings`. Fields are optional so that missing values
/// are reported as validation failures rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    pub item_description: Option<String>,
    pub municipality: Option<String>,
    pub full_address: Option<String>,
    pub booking_date: Option<String>,
    pub time_slot: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_description: String,
    pub municipality: String,
    pub full_address: Option<String>,
    pub booking_date: NaiveDate,
    pub time_slot: TimeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingRuleError {
    #[error("Municipality not available for service or is null: {0}")]
    UnknownMunicipality(String),

    #[error("Booking date must be today or in the future.")]
    DateNotUpcoming,

    #[error("Booking date is not a valid date (YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Item description is required.")]
    MissingDescription,

    #[error("Time slot must be one of MORNING, AFTERNOON: {0}")]
    InvalidTimeSlot(String),

    #[error("Booking status cannot be null")]
    MissingStatus,

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
}

pub fn validate_new_booking(
    req: &CreateBookingRequest,
    municipalities: &[String],
    today: NaiveDate,
) -> Result<NewBooking, BookingRuleError> {
    let municipality = match req.municipality.as_deref() {
        Some(m) if municipalities.iter().any(|known| known == m) => m.to_string(),
        other => {
            let shown = other.unwrap_or("null").to_string();
            tracing::warn!(municipality = %shown, "booking rejected: municipality not served");
            return Err(BookingRuleError::UnknownMunicipality(shown));
        }
    };

    let raw_date = req
        .booking_date
        .as_deref()
        .ok_or(BookingRuleError::DateNotUpcoming)?;
    let booking_date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| BookingRuleError::InvalidDate(raw_date.to_string()))?;
    if booking_date < today {
        return Err(BookingRuleError::DateNotUpcoming);
    }

    let item_description = req
        .item_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(BookingRuleError::MissingDescription)?
        .to_string();

    let raw_slot = req.time_slot.as_deref().unwrap_or("null");
    let time_slot = TimeSlot::parse(raw_slot)
        .ok_or_else(|| BookingRuleError::InvalidTimeSlot(raw_slot.to_string()))?;

    let full_address = req
        .full_address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Ok(NewBooking {
        item_description,
        municipality,
        full_address,
        booking_date,
        time_slot,
    })
}

pub fn parse_status(raw: Option<&str>) -> Result<BookingStatus, BookingRuleError> {
    let raw = raw.ok_or(BookingRuleError::MissingStatus)?;
    BookingStatus::parse(raw).ok_or_else(|| BookingRuleError::UnknownStatus(raw.to_string()))
}
