use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Booking, BookingId, BookingStatus};
use crate::services::booking_rules::NewBooking;

const BOOKING_COLUMNS: &str = "id, booking_token, item_description, municipality, full_address, \
     booking_date, time_slot, status, created_at, last_updated_at";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn insert_booking(
    conn: &Connection,
    new: &NewBooking,
    token: &str,
    now: NaiveDateTime,
) -> anyhow::Result<Booking> {
    let created_at = now.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO bookings (booking_token, item_description, municipality, full_address, booking_date, time_slot, status, created_at, last_updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            token,
            new.item_description,
            new.municipality,
            new.full_address,
            new.booking_date.format("%Y-%m-%d").to_string(),
            new.time_slot.as_str(),
            BookingStatus::Received.as_str(),
            created_at,
        ],
    )?;

    let id = conn.last_insert_rowid();
    get_booking_by_id(conn, id)?
        .ok_or_else(|| anyhow::anyhow!("booking {id} vanished after insert"))
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            parse_booking_row,
        )
        .optional()?;
    Ok(booking)
}

pub fn get_booking_by_token(conn: &Connection, token: &str) -> anyhow::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_token = ?1"),
            params![token],
            parse_booking_row,
        )
        .optional()?;
    Ok(booking)
}

pub fn get_bookings_for_municipality(
    conn: &Connection,
    municipality: &str,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE municipality = ?1 ORDER BY id ASC"
    ))?;

    let rows = stmt.query_map(params![municipality], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

/// Returns the updated booking, or `None` when no booking has this id.
pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
    now: NaiveDateTime,
) -> anyhow::Result<Option<Booking>> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, last_updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now.format(TIMESTAMP_FORMAT).to_string(), id],
    )?;

    if count == 0 {
        return Ok(None);
    }
    get_booking_by_id(conn, id)
}

fn parse_booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: BookingId::from(row.get::<_, i64>(0)?),
        booking_token: row.get(1)?,
        item_description: row.get(2)?,
        municipality: row.get(3)?,
        full_address: row.get(4)?,
        booking_date: row.get(5)?,
        time_slot: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
        last_updated_at: row.get(9)?,
    })
}
