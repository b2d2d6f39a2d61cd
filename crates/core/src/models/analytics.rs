use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of the entire portfolio at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Instant this summary was computed for
    pub as_of: DateTime<Utc>,

    /// Number of assets with a positive holding
    pub asset_count: usize,

    /// Total market value at current prices
    pub total_value: f64,

    /// Total cost basis of the current holdings
    pub total_cost_basis: f64,

    /// total_value - total_cost_basis
    pub total_profit_loss: f64,

    /// (total_profit_loss / total_cost_basis) * 100, or 0 without a cost basis
    pub total_return_pct: f64,

    /// Per-asset breakdown, largest allocation first
    pub holdings: Vec<HoldingSummary>,
}

/// Summary of a single held asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingSummary {
    pub asset_id: Uuid,

    pub ticker: String,

    /// Coins held
    pub quantity: f64,

    /// Cumulative amount paid for the coins held
    pub cost_basis: f64,

    /// cost_basis / quantity
    pub average_cost: f64,

    pub current_price: f64,

    /// quantity * current_price
    pub current_value: f64,

    pub profit_loss: f64,

    pub return_pct: f64,

    /// This asset's value / total portfolio value × 100
    pub allocation_pct: f64,
}
