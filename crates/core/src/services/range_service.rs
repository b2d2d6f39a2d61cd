use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};

use crate::models::asset::Asset;
use crate::models::range::{to_millis, TimeRange, TimeWindow, DAY_MS};

/// Relative padding subtracted from the start of an `ALL` window so the first
/// sample does not sit on the axis edge.
const ALL_RANGE_PADDING: f64 = 1e-5;

/// Minimum absolute padding for `ALL`, for windows starting at or near the epoch.
const MIN_ALL_RANGE_PADDING_MS: f64 = 1.0;

/// Maps a range selector to a concrete time window.
pub struct RangeService;

impl RangeService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `range` against `assets` and the caller's `now`.
    ///
    /// The returned window always satisfies `min_ms < max_ms`: any degenerate
    /// result is widened to the day ending at `max_ms`.
    pub fn resolve(&self, range: &TimeRange, assets: &[Asset], now: DateTime<Utc>) -> TimeWindow {
        let now_ms = to_millis(&now);
        let mut min_ms = now_ms;
        let mut max_ms = now_ms;

        match range {
            TimeRange::Day | TimeRange::Week | TimeRange::Month => {
                if let Some(lookback) = range.lookback_ms() {
                    min_ms = now_ms - lookback;
                }
            }
            TimeRange::All => {
                let earliest = assets
                    .iter()
                    .filter_map(|a| a.first_transaction_date())
                    .min()
                    .map(|d| to_millis(&d))
                    .unwrap_or(now_ms - DAY_MS);
                let padding = (earliest.abs() * ALL_RANGE_PADDING).max(MIN_ALL_RANGE_PADDING_MS);
                min_ms = earliest - padding;
            }
            TimeRange::Custom { start, end } => {
                match start.as_deref().and_then(|s| self.parse_logged(s, "start")) {
                    Some(start_ms) => {
                        min_ms = start_ms;
                        max_ms = end
                            .as_deref()
                            .and_then(|s| self.parse_logged(s, "end"))
                            .unwrap_or(now_ms);
                    }
                    None => debug!("Custom range without a usable start, using the default window"),
                }
            }
        }

        if min_ms >= max_ms {
            debug!("Degenerate {range} window [{min_ms}, {max_ms}], widening to one day");
            min_ms = max_ms - DAY_MS;
        }

        TimeWindow::new(min_ms, max_ms)
    }

    /// Parse a user-entered range bound into epoch milliseconds.
    ///
    /// Accepted: RFC 3339 (`2024-03-01T12:00:00Z`), a bare date (`2024-03-01`,
    /// midnight UTC), a date with time and no zone (`2024-03-01T12:00[:00]`, UTC),
    /// or an integer number of milliseconds.
    pub fn parse_bound(&self, input: &str) -> Option<f64> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.timestamp_millis() as f64);
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.and_utc().timestamp_millis() as f64);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis() as f64);
        }
        s.parse::<i64>().ok().map(|ms| ms as f64)
    }

    fn parse_logged(&self, input: &str, which: &str) -> Option<f64> {
        let parsed = self.parse_bound(input);
        if parsed.is_none() && !input.trim().is_empty() {
            warn!("Ignoring unparseable custom range {which}: {input:?}");
        }
        parsed
    }
}

impl Default for RangeService {
    fn default() -> Self {
        Self::new()
    }
}
