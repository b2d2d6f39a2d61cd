use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Acquiring coins
    Buy,
    /// Disposing of coins
    Sell,
}

impl TransactionType {
    /// +1 for buys, -1 for sells. Applied to quantities only.
    pub fn sign(self) -> f64 {
        match self {
            TransactionType::Buy => 1.0,
            TransactionType::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "BUY"),
            TransactionType::Sell => write!(f, "SELL"),
        }
    }
}

/// A single entry in an asset's append-only ledger.
///
/// Transactions are immutable once created. `total_cost` is fixed at
/// construction time as `quantity * price_per_coin` and never re-derived,
/// so later readers see exactly what was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Buy or Sell
    pub transaction_type: TransactionType,

    /// Number of coins (always positive; direction comes from `transaction_type`)
    pub quantity: f64,

    /// Price paid (or received) per coin
    pub price_per_coin: f64,

    /// When the transaction happened
    pub date: DateTime<Utc>,

    /// `quantity * price_per_coin` at creation
    pub total_cost: f64,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        quantity: f64,
        price_per_coin: f64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_type,
            quantity,
            price_per_coin,
            date,
            total_cost: quantity * price_per_coin,
        }
    }

    pub fn buy(quantity: f64, price_per_coin: f64, date: DateTime<Utc>) -> Self {
        Self::new(TransactionType::Buy, quantity, price_per_coin, date)
    }

    pub fn sell(quantity: f64, price_per_coin: f64, date: DateTime<Utc>) -> Self {
        Self::new(TransactionType::Sell, quantity, price_per_coin, date)
    }

    /// Quantity with the direction applied.
    pub fn signed_quantity(&self) -> f64 {
        self.transaction_type.sign() * self.quantity
    }
}
