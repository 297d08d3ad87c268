//! Seasonal nightly rates and stay quotes.
//!
//! Every month resolves to some rate: operator overrides from the
//! `seasonal_rates` table win, the built-in default table covers the rest,
//! and a final fallback constant guards the (unreachable by construction)
//! case of a month missing from both.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::database::Database;

/// Default nightly rate per calendar month (index 0 = January), in whole
/// currency units.
pub const DEFAULT_RATES: [i64; 12] = [85, 85, 90, 95, 105, 115, 125, 125, 105, 95, 90, 100];

/// Used only if a month somehow resolves through neither table.
pub const FALLBACK_RATE: i64 = 100;

/// Share of the total requested up front, as a deposit.
pub const DEPOSIT_NUMERATOR: i64 = 1;
pub const DEPOSIT_DENOMINATOR: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NightRate {
    pub date: NaiveDate,
    pub rate: i64,
}

/// Quote for a single room-stay over `[check_in, check_out)`. For a
/// both-rooms booking the caller multiplies by the room count; the engine
/// itself is room-count-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub nights: usize,
    pub total_amount: i64,
    pub deposit_amount: i64,
    pub breakdown: Vec<NightRate>,
}

/// Effective rate table: overrides merged over [`DEFAULT_RATES`].
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    overrides: HashMap<u32, i64>,
}

impl RateTable {
    pub fn new(overrides: HashMap<u32, i64>) -> Self {
        Self { overrides }
    }

    /// The nightly rate for a date, resolved by calendar month.
    pub fn nightly_rate(&self, date: NaiveDate) -> i64 {
        let month = date.month();
        if let Some(rate) = self.overrides.get(&month) {
            return *rate;
        }
        DEFAULT_RATES
            .get(month as usize - 1)
            .copied()
            .unwrap_or(FALLBACK_RATE)
    }

    /// Iterates the nights of `[check_in, check_out)` in date order. A
    /// non-positive stay yields a zero-night, zero-total quote; rejecting
    /// such input is the caller's job where it is a hard requirement.
    pub fn quote(&self, check_in: NaiveDate, check_out: NaiveDate) -> PriceQuote {
        let mut breakdown = Vec::new();
        let mut total = 0i64;
        let mut date = check_in;
        while date < check_out {
            let rate = self.nightly_rate(date);
            breakdown.push(NightRate { date, rate });
            total += rate;
            date = date.succ_opt().expect("date overflow");
        }
        PriceQuote {
            nights: breakdown.len(),
            total_amount: total,
            deposit_amount: deposit_for(total),
            breakdown,
        }
    }

    /// The full month -> rate mapping after merging, months 1 through 12.
    pub fn effective_months(&self) -> [(u32, i64); 12] {
        std::array::from_fn(|i| {
            let month = i as u32 + 1;
            let rate = self
                .overrides
                .get(&month)
                .copied()
                .unwrap_or(DEFAULT_RATES[i]);
            (month, rate)
        })
    }
}

/// Deposit: half the total, rounded up to a whole currency unit.
pub fn deposit_for(total: i64) -> i64 {
    (total * DEPOSIT_NUMERATOR + DEPOSIT_DENOMINATOR - 1) / DEPOSIT_DENOMINATOR
}

/// Loads operator overrides from Postgres; the table may be partial, empty
/// or unreachable, all of which degrade to the default table.
#[derive(Clone)]
pub struct PricingEngine {
    db: Database,
}

impl PricingEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn rate_table(&self) -> RateTable {
        let rows: Vec<(i16, i64)> =
            match sqlx::query_as("SELECT month, rate FROM seasonal_rates")
                .fetch_all(&self.db.pool)
                .await
            {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("seasonal_rates unavailable, using default table: {e}");
                    Vec::new()
                }
            };

        let overrides = rows
            .into_iter()
            .filter(|(month, _)| (1..=12).contains(month))
            .map(|(month, rate)| (month as u32, rate))
            .collect();
        RateTable::new(overrides)
    }

    pub async fn quote(&self, check_in: NaiveDate, check_out: NaiveDate) -> PriceQuote {
        self.rate_table().await.quote(check_in, check_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_table_covers_every_month() {
        let table = RateTable::default();
        for month in 1..=12u32 {
            let d = NaiveDate::from_ymd_opt(2025, month, 15).unwrap();
            assert_eq!(table.nightly_rate(d), DEFAULT_RATES[month as usize - 1]);
        }
    }

    #[test]
    fn overrides_win_over_the_default_table() {
        let table = RateTable::new(HashMap::from([(6, 200i64)]));
        assert_eq!(table.nightly_rate(date(2025, 6, 1)), 200);
        // Months without an override fall back to the default.
        assert_eq!(table.nightly_rate(date(2025, 7, 1)), DEFAULT_RATES[6]);
    }

    #[test]
    fn quote_crossing_a_month_boundary() {
        // Default rates: June 115, July 125.
        let table = RateTable::default();
        let quote = table.quote(date(2025, 6, 29), date(2025, 7, 2));
        let rates: Vec<i64> = quote.breakdown.iter().map(|n| n.rate).collect();
        assert_eq!(rates, vec![115, 115, 125]);
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total_amount, 355);
        assert_eq!(quote.deposit_amount, 178);
    }

    #[test]
    fn breakdown_is_in_date_order_and_sums_to_total() {
        let table = RateTable::new(HashMap::from([(8, 150i64)]));
        let quote = table.quote(date(2025, 8, 1), date(2025, 8, 6));
        assert_eq!(quote.nights, quote.breakdown.len());
        assert_eq!(
            quote.total_amount,
            quote.breakdown.iter().map(|n| n.rate).sum::<i64>()
        );
        let mut dates: Vec<NaiveDate> = quote.breakdown.iter().map(|n| n.date).collect();
        let sorted = dates.clone();
        dates.sort();
        assert_eq!(dates, sorted);
        // Checkout night is not charged.
        assert!(!sorted.contains(&date(2025, 8, 6)));
    }

    #[test]
    fn non_positive_stay_quotes_zero_nights() {
        let table = RateTable::default();
        let quote = table.quote(date(2025, 8, 5), date(2025, 8, 5));
        assert_eq!(quote.nights, 0);
        assert_eq!(quote.total_amount, 0);
        assert_eq!(quote.deposit_amount, 0);
        assert!(quote.breakdown.is_empty());

        let inverted = table.quote(date(2025, 8, 5), date(2025, 8, 1));
        assert_eq!(inverted.nights, 0);
    }

    #[test]
    fn deposit_is_half_rounded_up_and_bounded() {
        assert_eq!(deposit_for(355), 178);
        assert_eq!(deposit_for(100), 50);
        assert_eq!(deposit_for(1), 1);
        assert_eq!(deposit_for(0), 0);
        for total in 1..500i64 {
            let d = deposit_for(total);
            assert!(d > 0 && d <= total, "total={total} deposit={d}");
            assert_eq!(d, (total as f64 / 2.0).ceil() as i64);
        }
    }

    #[test]
    fn effective_months_merges_overrides() {
        let table = RateTable::new(HashMap::from([(1, 70i64), (12, 140i64)]));
        let months = table.effective_months();
        assert_eq!(months[0], (1, 70));
        assert_eq!(months[11], (12, 140));
        assert_eq!(months[5], (6, DEFAULT_RATES[5]));
    }
}
