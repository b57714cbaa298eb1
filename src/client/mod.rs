pub mod http;
pub mod message;

use async_trait::async_trait;

use crate::errors::BookingError;
use crate::models::{Booking, BookingDraft, BookingId};

pub use http::HttpBookingClient;

/// Operations against the booking service. Each call is one round trip with
/// no retry; failures come back already converted to a user-facing message.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_municipalities(&self) -> Result<Vec<String>, BookingError>;

    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking, BookingError>;

    async fn lookup_by_token(&self, token: &str) -> Result<Booking, BookingError>;

    /// An empty list is a successful answer, distinct from a failure.
    async fn list_for_municipality(&self, municipality: &str) -> Result<Vec<Booking>, BookingError>;

    /// The returned booking's status is the one the backend persisted.
    async fn update_status(&self, booking_id: &BookingId, status: &str) -> Result<Booking, BookingError>;
}
