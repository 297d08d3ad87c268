//! Turns calendar intervals into per-date room occupancy and classifies a
//! requested stay against it.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::warn;

use crate::calendar::{CalendarApi, FeedEvent};
use crate::models::{Room, RoomSelection};

/// Days of padding applied around a queried month so stays crossing the
/// month boundary still show up.
pub const WINDOW_PADDING_DAYS: i64 = 7;

/// date -> rooms occupied that night. Dates with no entry are fully free.
pub type OccupancyMap = BTreeMap<NaiveDate, BTreeSet<Room>>;

/// Per-date verdicts for one requested room selection. Dates in none of the
/// three sets are available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// A requested room is taken (or, for a both-rooms request, either is).
    pub blocked_dates: Vec<NaiveDate>,
    /// The other room is taken; still bookable, one room left that night.
    pub limited_dates: Vec<NaiveDate>,
    /// Both rooms taken, whatever was requested.
    pub fully_booked_dates: Vec<NaiveDate>,
}

/// Expands attributable intervals into per-date occupancy over the half-open
/// window `[start, end)`. Intervals whose label carries neither room keyword
/// are skipped outright; that is policy, not an error, but it is logged so
/// the data loss stays observable.
pub fn build_occupancy(intervals: &[FeedEvent], start: NaiveDate, end: NaiveDate) -> OccupancyMap {
    let mut map = OccupancyMap::new();
    for interval in intervals {
        let Some(attribution) = RoomSelection::from_label(&interval.label) else {
            warn!(
                "calendar interval '{}' ({}..{}) has no room keyword, ignoring",
                interval.label, interval.start, interval.end
            );
            continue;
        };
        let from = interval.start.max(start);
        let to = interval.end.min(end);
        let mut date = from;
        while date < to {
            let rooms = map.entry(date).or_default();
            for room in attribution.rooms() {
                rooms.insert(*room);
            }
            date = date.succ_opt().expect("date overflow");
        }
    }
    map
}

/// Classifies every occupied date in the map against a requested selection.
/// Evaluated per date; fully booked beats everything, then blocked, then
/// limited.
pub fn classify(occupancy: &OccupancyMap, requested: RoomSelection) -> Classification {
    let mut result = Classification::default();
    for (date, occupied) in occupancy {
        let both_taken = occupied.contains(&Room::West) && occupied.contains(&Room::East);
        if both_taken {
            result.fully_booked_dates.push(*date);
        } else if requested == RoomSelection::Both && !occupied.is_empty() {
            // Cannot satisfy "both rooms" if either one is taken.
            result.blocked_dates.push(*date);
        } else if requested != RoomSelection::Both {
            let room = requested.rooms()[0];
            if occupied.contains(&room) {
                result.blocked_dates.push(*date);
            } else if occupied.contains(&room.other()) {
                result.limited_dates.push(*date);
            }
        }
    }
    result
}

impl Classification {
    /// True when no requested date is blocked or fully booked.
    pub fn is_bookable(&self) -> bool {
        self.blocked_dates.is_empty() && self.fully_booked_dates.is_empty()
    }
}

/// Aggregator over the authoritative calendar.
#[derive(Clone)]
pub struct AvailabilityService {
    calendar: Arc<dyn CalendarApi>,
}

impl AvailabilityService {
    pub fn new(calendar: Arc<dyn CalendarApi>) -> Self {
        Self { calendar }
    }

    /// Occupancy for the half-open window `[start, end)`.
    ///
    /// When the calendar is unreachable this returns an empty map instead of
    /// an error: the booking surface stays usable and the manual confirmation
    /// step remains the double-booking backstop. Availability over
    /// consistency, accepted and logged.
    pub async fn occupancy(&self, start: NaiveDate, end: NaiveDate) -> OccupancyMap {
        match self.calendar.fetch_intervals(start, end).await {
            Ok(intervals) => build_occupancy(&intervals, start, end),
            Err(e) => {
                warn!("calendar unavailable, reporting empty occupancy: {e}");
                OccupancyMap::new()
            }
        }
    }

    /// Occupancy for a calendar month padded by [`WINDOW_PADDING_DAYS`] on
    /// each side.
    pub async fn month_occupancy(&self, first_of_month: NaiveDate) -> OccupancyMap {
        let (start, end) = padded_month_window(first_of_month);
        self.occupancy(start, end).await
    }
}

/// `[first - padding, first_of_next_month + padding)`.
pub fn padded_month_window(first_of_month: NaiveDate) -> (NaiveDate, NaiveDate) {
    let next_month = first_of_month
        .checked_add_months(chrono::Months::new(1))
        .expect("date overflow");
    (
        first_of_month - chrono::Duration::days(WINDOW_PADDING_DAYS),
        next_month + chrono::Duration::days(WINDOW_PADDING_DAYS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(label: &str, start: NaiveDate, end: NaiveDate) -> FeedEvent {
        FeedEvent {
            label: label.into(),
            start,
            end,
        }
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (date(2025, 8, 1), date(2025, 9, 1))
    }

    #[test]
    fn expansion_is_half_open() {
        let (start, end) = window();
        let map = build_occupancy(
            &[interval("West Room - Kim", date(2025, 8, 10), date(2025, 8, 12))],
            start,
            end,
        );
        assert!(map.contains_key(&date(2025, 8, 10)));
        assert!(map.contains_key(&date(2025, 8, 11)));
        // Checkout day is not occupied.
        assert!(!map.contains_key(&date(2025, 8, 12)));
    }

    #[test]
    fn zero_night_interval_contributes_nothing() {
        let (start, end) = window();
        let map = build_occupancy(
            &[interval("East Room", date(2025, 8, 10), date(2025, 8, 10))],
            start,
            end,
        );
        assert!(map.is_empty());
    }

    #[test]
    fn unattributable_labels_are_skipped() {
        let (start, end) = window();
        let map = build_occupancy(
            &[interval("chimney sweep visit", date(2025, 8, 10), date(2025, 8, 15))],
            start,
            end,
        );
        assert!(map.is_empty());
    }

    #[test]
    fn expansion_clamps_to_the_window() {
        let (start, end) = window();
        let map = build_occupancy(
            &[interval("East Room", date(2025, 7, 30), date(2025, 8, 3))],
            start,
            end,
        );
        assert_eq!(
            map.keys().copied().collect::<Vec<_>>(),
            vec![date(2025, 8, 1), date(2025, 8, 2)]
        );
    }

    #[test]
    fn both_keywords_occupy_both_rooms() {
        let (start, end) = window();
        let map = build_occupancy(
            &[interval(
                "[Booked] West Room, East Room - Park",
                date(2025, 8, 10),
                date(2025, 8, 11),
            )],
            start,
            end,
        );
        assert_eq!(map[&date(2025, 8, 10)].len(), 2);
    }

    fn occupancy_with(d: NaiveDate, rooms: &[Room]) -> OccupancyMap {
        let mut map = OccupancyMap::new();
        map.insert(d, rooms.iter().copied().collect());
        map
    }

    #[test]
    fn one_room_taken_blocks_it_and_limits_the_other() {
        let d = date(2025, 8, 10);
        let map = occupancy_with(d, &[Room::West]);

        let c = classify(&map, RoomSelection::West);
        assert_eq!(c.blocked_dates, vec![d]);
        assert!(c.limited_dates.is_empty() && c.fully_booked_dates.is_empty());

        let c = classify(&map, RoomSelection::East);
        assert_eq!(c.limited_dates, vec![d]);
        assert!(c.blocked_dates.is_empty() && c.fully_booked_dates.is_empty());

        let c = classify(&map, RoomSelection::Both);
        assert_eq!(c.blocked_dates, vec![d]);
    }

    #[test]
    fn both_rooms_taken_is_fully_booked_for_everyone() {
        let d = date(2025, 8, 10);
        let map = occupancy_with(d, &[Room::West, Room::East]);
        for sel in [RoomSelection::West, RoomSelection::East, RoomSelection::Both] {
            let c = classify(&map, sel);
            assert_eq!(c.fully_booked_dates, vec![d], "selection {sel:?}");
            assert!(c.blocked_dates.is_empty(), "selection {sel:?}");
            assert!(c.limited_dates.is_empty(), "selection {sel:?}");
        }
    }

    #[test]
    fn free_dates_appear_in_no_set() {
        let map = OccupancyMap::new();
        let c = classify(&map, RoomSelection::West);
        assert!(c.is_bookable());
        assert!(c.limited_dates.is_empty());
    }

    #[test]
    fn month_window_is_padded_on_both_sides() {
        let (start, end) = padded_month_window(date(2025, 8, 1));
        assert_eq!(start, date(2025, 7, 25));
        assert_eq!(end, date(2025, 9, 8));
    }

    struct DownCalendar;

    #[async_trait::async_trait]
    impl CalendarApi for DownCalendar {
        async fn fetch_intervals(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<FeedEvent>, crate::calendar::CalendarError> {
            Err(crate::calendar::CalendarError::Rejected("down".into()))
        }

        async fn insert_block(
            &self,
            _block: &crate::calendar::BlockEvent,
        ) -> Result<(), crate::calendar::CalendarError> {
            Err(crate::calendar::CalendarError::Rejected("down".into()))
        }
    }

    #[tokio::test]
    async fn unreachable_calendar_degrades_to_empty_occupancy() {
        let service = AvailabilityService::new(Arc::new(DownCalendar));
        let map = service.occupancy(date(2025, 8, 1), date(2025, 9, 1)).await;
        assert!(map.is_empty());
    }
}
