use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Shown in place of any field the backend left out.
pub const PLACEHOLDER: &str = "—";

/// Opaque backend identifier. The reference service issues integers, but the
/// client never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<i64> for BookingId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BookingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for BookingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Option::<RawId>::deserialize(deserializer)? {
            Some(RawId::Integer(n)) => Self(n.to_string()),
            Some(RawId::Float(n)) => Self(n.to_string()),
            Some(RawId::Text(s)) => Self(s),
            None => Self::default(),
        })
    }
}

/// A booking as returned by the backend. Every field is optional on the wire:
/// a missing value renders as a placeholder instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    pub id: BookingId,
    pub booking_token: Option<String>,
    pub item_description: Option<String>,
    pub municipality: Option<String>,
    pub full_address: Option<String>,
    pub booking_date: Option<String>,
    pub time_slot: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub last_updated_at: Option<String>,
}

pub fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Citizen-supplied content for a new booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub item_description: String,
    pub municipality: String,
    pub full_address: String,
    pub booking_date: NaiveDate,
    pub time_slot: TimeSlot,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Received,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Lifecycle order, earliest first.
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Received,
        BookingStatus::Scheduled,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Received => "RECEIVED",
            BookingStatus::Scheduled => "SCHEDULED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeSlot {
    Morning,
    Afternoon,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "MORNING",
            TimeSlot::Afternoon => "AFTERNOON",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MORNING" => Some(TimeSlot::Morning),
            "AFTERNOON" => Some(TimeSlot::Afternoon),
            _ => None,
        }
    }
}
