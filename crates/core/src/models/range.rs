use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One day in milliseconds.
pub const DAY_MS: f64 = 86_400_000.0;

/// Milliseconds since the Unix epoch, as the engine does all time arithmetic.
pub fn to_millis(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64
}

/// Chart range selector picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Last 24 hours
    Day,
    /// Last 7 days
    Week,
    /// Last 30 days
    #[default]
    Month,
    /// From the first transaction until now
    All,
    /// Explicit bounds as entered by the user. Both are optional free-form
    /// strings; see `RangeService::parse_bound` for accepted formats.
    Custom {
        start: Option<String>,
        end: Option<String>,
    },
}

impl TimeRange {
    /// Fixed lookback length, for the selectors that have one.
    pub fn lookback_ms(&self) -> Option<f64> {
        match self {
            TimeRange::Day => Some(DAY_MS),
            TimeRange::Week => Some(7.0 * DAY_MS),
            TimeRange::Month => Some(30.0 * DAY_MS),
            TimeRange::All | TimeRange::Custom { .. } => None,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Day => write!(f, "24H"),
            TimeRange::Week => write!(f, "1W"),
            TimeRange::Month => write!(f, "1M"),
            TimeRange::All => write!(f, "ALL"),
            TimeRange::Custom { .. } => write!(f, "CUSTOM"),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = crate::errors::CoreError;

    /// Parses the fixed selector labels. `CUSTOM` parses to a custom range
    /// without bounds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "24H" => Ok(TimeRange::Day),
            "1W" => Ok(TimeRange::Week),
            "1M" => Ok(TimeRange::Month),
            "ALL" => Ok(TimeRange::All),
            "CUSTOM" => Ok(TimeRange::Custom {
                start: None,
                end: None,
            }),
            other => Err(crate::errors::CoreError::ValidationError(format!(
                "Unknown time range: {other}"
            ))),
        }
    }
}

/// A resolved `[min_ms, max_ms]` window. Always `min_ms < max_ms` when
/// produced by `RangeService::resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TimeWindow {
    pub fn new(min_ms: f64, max_ms: f64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn span_ms(&self) -> f64 {
        self.max_ms - self.min_ms
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.min_ms && t <= self.max_ms
    }
}
