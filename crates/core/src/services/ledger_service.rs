use crate::models::transaction::{Transaction, TransactionType};
use crate::models::range::to_millis;

/// Quantity and cost basis accumulated up to some instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Holding {
    pub quantity: f64,
    pub cost_basis: f64,
}

impl Holding {
    /// Whether anything is owned. Zero and negative totals count as not owned.
    pub fn is_owned(&self) -> bool {
        self.quantity > 0.0
    }

    /// Share of the cost basis carried by `sold` coins at average cost.
    /// Nothing is released when nothing is held.
    fn cost_released_by(&self, sold: f64) -> f64 {
        if !self.is_owned() {
            return 0.0;
        }
        let fraction = (sold / self.quantity).clamp(0.0, 1.0);
        self.cost_basis * fraction
    }
}

/// Folds an asset's ledger into running totals.
///
/// No I/O and no validation: malformed entries are folded in as given.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Quantity and cost basis from every transaction dated at or before `t_ms`.
    ///
    /// Later transactions contribute nothing. Buys add their total cost. A sell
    /// removes the average cost of the coins sold (`cost_basis * sold / held`,
    /// capped at the whole basis), never its proceeds. Entries are visited in
    /// date order, stable for equal dates, so the result is deterministic.
    pub fn cumulative_at(&self, transactions: &[Transaction], t_ms: f64) -> Holding {
        let mut included: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| to_millis(&tx.date) <= t_ms)
            .collect();
        included.sort_by_key(|tx| tx.date);

        included.into_iter().fold(Holding::default(), |acc, tx| match tx.transaction_type {
            TransactionType::Buy => Holding {
                quantity: acc.quantity + tx.quantity,
                cost_basis: acc.cost_basis + tx.total_cost,
            },
            TransactionType::Sell => Holding {
                quantity: acc.quantity - tx.quantity,
                cost_basis: acc.cost_basis - acc.cost_released_by(tx.quantity),
            },
        })
    }

    /// Running quantity after each transaction, with the ledger visited in date
    /// order (stable for equal dates). Used to reject edits that would sell
    /// more than was held.
    pub fn running_quantities(&self, transactions: &[Transaction]) -> Vec<f64> {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by_key(|tx| tx.date);

        let mut running = 0.0;
        ordered
            .into_iter()
            .map(|tx| {
                running += tx.signed_quantity();
                running
            })
            .collect()
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
