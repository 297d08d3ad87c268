use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::RoomSelection;

/// Lifecycle status of a booking record. Transitions are one-way and
/// admin-triggered only: pending -> awaiting_payment -> confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    AwaitingPayment,
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::AwaitingPayment => "awaiting_payment",
            BookingStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "awaiting_payment" => Some(BookingStatus::AwaitingPayment),
            "confirmed" => Some(BookingStatus::Confirmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored booking record. Dates are a half-open interval: the guest
/// occupies the nights [check_in, check_out), departing on check_out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub rooms: RoomSelection,
    pub guests: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub special_request: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Guest submission form. Field-shape checks live on the derive; the
/// cross-field rules (date ordering, guest count vs. capacity, room ids)
/// are in [`BookingForm::validate_stay`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[validate(length(min = 1, max = 100, message = "guest name is required"))]
    pub guest_name: String,
    #[validate(email(message = "guest email is not a valid address"))]
    pub guest_email: String,
    #[validate(length(min = 5, max = 32, message = "guest phone is required"))]
    pub guest_phone: String,
    /// Requested room ids: `[1]`, `[2]` or `[1,2]`.
    pub rooms: Vec<u8>,
    #[validate(range(min = 1, message = "at least one guest"))]
    pub guests: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub special_request: String,
}

impl BookingForm {
    /// Cross-field validation. Returns the resolved room selection so the
    /// caller does not re-parse the id list.
    pub fn validate_stay(&self) -> Result<RoomSelection, String> {
        let selection = RoomSelection::from_ids(&self.rooms)
            .ok_or_else(|| "rooms must be [1], [2] or [1,2]".to_string())?;
        if self.check_out <= self.check_in {
            return Err("checkOut must be after checkIn (minimum one night)".to_string());
        }
        if self.guests > selection.capacity() {
            return Err(format!(
                "{} sleeps at most {} guests",
                selection.display_names(),
                selection.capacity()
            ));
        }
        if !self
            .guest_phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        {
            return Err("guest phone contains invalid characters".to_string());
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn form() -> BookingForm {
        BookingForm {
            guest_name: "Mina Park".into(),
            guest_email: "mina@example.com".into(),
            guest_phone: "+82 10-1234-5678".into(),
            rooms: vec![1],
            guests: 2,
            check_in: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
            special_request: String::new(),
        }
    }

    #[test]
    fn valid_form_passes() {
        let f = form();
        assert!(f.validate().is_ok());
        assert_eq!(f.validate_stay().unwrap(), RoomSelection::West);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut f = form();
        f.guest_email = "not-an-email".into();
        assert!(f.validate().is_err());
    }

    #[test]
    fn non_positive_stay_is_rejected() {
        let mut f = form();
        f.check_out = f.check_in;
        assert!(f.validate_stay().is_err());
    }

    #[test]
    fn guest_count_is_capped_by_selection_capacity() {
        let mut f = form();
        f.guests = 3;
        assert!(f.validate_stay().is_err());
        f.rooms = vec![1, 2];
        assert_eq!(f.validate_stay().unwrap(), RoomSelection::Both);
        f.guests = 5;
        assert!(f.validate_stay().is_err());
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for s in [
            BookingStatus::Pending,
            BookingStatus::AwaitingPayment,
            BookingStatus::Confirmed,
        ] {
            assert_eq!(BookingStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(BookingStatus::parse("cancelled"), None);
    }
}
