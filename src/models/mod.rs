pub mod booking;

pub use booking::{or_placeholder, Booking, BookingDraft, BookingId, BookingStatus, TimeSlot, PLACEHOLDER};
