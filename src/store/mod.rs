//! Persistent booking records.
//!
//! The store is the single source of truth for lifecycle status. Both
//! transitions are single-statement conditional updates: the guard rides in
//! the `WHERE` clause so two concurrent operator clicks cannot both claim
//! the same record, and a stale guard maps to a precise lifecycle error
//! instead of a duplicate side effect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::database::Database;
use crate::models::{Booking, BookingStatus, RoomSelection};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("booking not found")]
    NotFound,
    /// The conditional update matched nothing because the record is not in
    /// the state the transition requires.
    #[error("booking is {current}")]
    StaleState { current: BookingStatus },
    #[error("store failure: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("corrupt booking record: {0}")]
    Corrupt(String),
}

/// New record data; status and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub rooms: RoomSelection,
    pub guests: u32,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub special_request: String,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a new record with status `pending`.
    async fn insert(&self, booking: &NewBooking) -> Result<Booking, StoreError>;

    async fn fetch(&self, id: i64) -> Result<Option<Booking>, StoreError>;

    /// pending -> awaiting_payment, guarded on the record still being
    /// `pending`.
    async fn claim_for_payment(&self, id: i64) -> Result<Booking, StoreError>;

    /// any-but-confirmed -> confirmed, guarded on the record not already
    /// being `confirmed`.
    async fn claim_for_confirmation(&self, id: i64) -> Result<Booking, StoreError>;
}

#[derive(Clone)]
pub struct PgBookingStore {
    db: Database,
}

impl PgBookingStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// A conditional update matched no row: either the record is gone or its
    /// status no longer satisfies the guard. Re-read to tell the two apart.
    async fn explain_missed_update(&self, id: i64) -> StoreError {
        match self.fetch(id).await {
            Ok(Some(current)) => StoreError::StaleState {
                current: current.status,
            },
            Ok(None) => StoreError::NotFound,
            Err(e) => e,
        }
    }
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: i64,
    guest_name: String,
    guest_email: String,
    guest_phone: String,
    rooms: String,
    guests: i32,
    check_in: chrono::NaiveDate,
    check_out: chrono::NaiveDate,
    special_request: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let rooms = RoomSelection::parse(&row.rooms)
            .ok_or_else(|| StoreError::Corrupt(format!("rooms = '{}'", row.rooms)))?;
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Corrupt(format!("status = '{}'", row.status)))?;
        Ok(Booking {
            id: row.id,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            guest_phone: row.guest_phone,
            rooms,
            guests: row.guests.max(0) as u32,
            check_in: row.check_in,
            check_out: row.check_out,
            special_request: row.special_request,
            status,
            created_at: row.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, guest_name, guest_email, guest_phone, rooms, guests, \
                               check_in, check_out, special_request, status, created_at";

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert(&self, booking: &NewBooking) -> Result<Booking, StoreError> {
        let row: BookingRow = sqlx::query_as(&format!(
            "INSERT INTO bookings \
               (guest_name, guest_email, guest_phone, rooms, guests, \
                check_in, check_out, special_request, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending') \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(&booking.guest_name)
        .bind(&booking.guest_email)
        .bind(&booking.guest_phone)
        .bind(booking.rooms.as_str())
        .bind(booking.guests as i32)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(&booking.special_request)
        .fetch_one(&self.db.pool)
        .await?;
        row.try_into()
    }

    async fn fetch(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.db.pool)
                .await?;
        row.map(Booking::try_from).transpose()
    }

    async fn claim_for_payment(&self, id: i64) -> Result<Booking, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "UPDATE bookings SET status = 'awaiting_payment' \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(self.explain_missed_update(id).await),
        }
    }

    async fn claim_for_confirmation(&self, id: i64) -> Result<Booking, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "UPDATE bookings SET status = 'confirmed' \
             WHERE id = $1 AND status <> 'confirmed' \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(self.explain_missed_update(id).await),
        }
    }
}
