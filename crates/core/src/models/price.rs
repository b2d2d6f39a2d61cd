use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single historical price sample (timestamp → price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// A current price as reported by one or more providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Averaged price across all sources that answered
    pub price: f64,

    /// Names of the providers that contributed, in registry order
    pub sources: Vec<String>,
}
