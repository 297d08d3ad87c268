pub mod client;
pub mod feed;

pub use client::{BlockEvent, CalendarApi, CalendarError, HttpCalendarClient};
pub use feed::{parse_feed, FeedEvent};
