use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::price::PricePoint;
use super::transaction::Transaction;

/// A tracked coin together with its ledger and price data.
///
/// The charting engine only ever reads assets. `quantity` is a cache of the
/// signed ledger sum, maintained by `PortfolioService` on every ledger change.
///
/// An empty `price_history` means "no history fetched": the estimator then
/// falls back to anchors built from the transactions and `current_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable opaque identifier
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "BTC", "ETH")
    pub ticker: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Cached sum of the ledger quantities
    pub quantity: f64,

    /// Latest known market price per coin
    pub current_price: f64,

    /// Append-only ledger, in insertion order
    pub transactions: Vec<Transaction>,

    /// Fetched price history, sorted ascending by timestamp
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
}

impl Asset {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into().trim().to_uppercase(),
            name: name.into(),
            quantity: 0.0,
            current_price: 0.0,
            transactions: Vec::new(),
            price_history: Vec::new(),
        }
    }

    /// Builder-style helper used when the current price is already known.
    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = price;
        self
    }

    /// Whether a real price history is available for this asset.
    pub fn has_history(&self) -> bool {
        !self.price_history.is_empty()
    }

    /// Signed sum of every ledger entry, regardless of date.
    pub fn ledger_quantity(&self) -> f64 {
        self.transactions.iter().map(|t| t.signed_quantity()).sum()
    }

    /// Earliest transaction in the ledger, if any.
    pub fn first_transaction_date(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.transactions.iter().map(|t| t.date).min()
    }
}
