//! Tolerant parser for ICS-style calendar feeds.
//!
//! Real-world feeds (the authoritative room calendar and channel exports
//! alike) carry plenty of entries we do not care about: VTODOs, timezone
//! definitions, events without dates. The contract here is deliberately
//! loose: pull every `BEGIN:VEVENT`..`END:VEVENT` block that has a parseable
//! `DTSTART` and `DTEND`, keep its `SUMMARY` as a free-text label, and drop
//! everything else without error. Dates are civil dates; any time-of-day or
//! timezone suffix is ignored.

use chrono::NaiveDate;

const EVENT_BEGIN: &str = "BEGIN:VEVENT";
const EVENT_END: &str = "END:VEVENT";

/// One date-bounded interval extracted from a feed. The end date is
/// exclusive, per the usual all-day-event convention: an event spanning
/// `[start, end)` occupies the nights start..end-1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FeedEvent {
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }
}

/// Parses raw feed text into intervals, preserving input order.
///
/// Events missing either date are dropped; a block with equal start and end
/// is kept as a zero-night interval (its expansion is empty). The parser is
/// pure and keeps no state between calls.
pub fn parse_feed(raw: &str) -> Vec<FeedEvent> {
    let lines = unfold_lines(raw);

    let mut events = Vec::new();
    let mut current: Option<EventBuilder> = None;

    for line in lines {
        let trimmed = line.trim_end();
        if trimmed.eq_ignore_ascii_case(EVENT_BEGIN) {
            current = Some(EventBuilder::default());
        } else if trimmed.eq_ignore_ascii_case(EVENT_END) {
            if let Some(builder) = current.take() {
                if let Some(event) = builder.finish() {
                    events.push(event);
                }
            }
        } else if let Some(builder) = current.as_mut() {
            builder.consume(trimmed);
        }
    }

    events
}

/// ICS folds long lines by continuing them with a leading space or tab.
/// Re-joins continuations so field scanning sees whole logical lines.
fn unfold_lines(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t')) {
            if let Some(last) = out.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        out.push(line.to_string());
    }
    out
}

#[derive(Default)]
struct EventBuilder {
    label: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl EventBuilder {
    fn consume(&mut self, line: &str) {
        if let Some(value) = field_value(line, "SUMMARY") {
            self.label.get_or_insert_with(|| value.trim().to_string());
        } else if let Some(value) = field_value(line, "DTSTART") {
            self.start = self.start.or_else(|| parse_date_token(value));
        } else if let Some(value) = field_value(line, "DTEND") {
            self.end = self.end.or_else(|| parse_date_token(value));
        }
    }

    fn finish(self) -> Option<FeedEvent> {
        // Either date missing means the block is not a bookable interval.
        let (start, end) = (self.start?, self.end?);
        Some(FeedEvent {
            label: self.label.unwrap_or_default(),
            start,
            end,
        })
    }
}

/// Matches `NAME:value` or `NAME;PARAM=...:value` (e.g.
/// `DTSTART;VALUE=DATE:20260310` or `DTSTART;TZID=Asia/Seoul:20260310T150000`)
/// and returns the value part. Field names are case-insensitive.
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let bytes = line.as_bytes();
    if bytes.len() < name.len() || !bytes[..name.len()].eq_ignore_ascii_case(name.as_bytes()) {
        return None;
    }
    let rest = &line[name.len()..];
    match rest.bytes().next() {
        Some(b':') => Some(&rest[1..]),
        // Parameter suffix before the colon; the parameters themselves are
        // irrelevant, only the value matters.
        Some(b';') => rest.split_once(':').map(|(_, value)| value),
        _ => None,
    }
}

/// The only fixed-format requirement: the value must lead with an 8-digit
/// `YYYYMMDD` token. Whatever follows (a `T150000Z` time, stray text) is
/// ignored.
fn parse_date_token(value: &str) -> Option<NaiveDate> {
    let digits = value.trim().get(..8)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}
