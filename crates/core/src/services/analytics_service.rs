use chrono::{DateTime, Utc};

use crate::models::analytics::{HoldingSummary, PortfolioSummary};
use crate::models::portfolio::Portfolio;
use crate::models::range::to_millis;
use crate::services::ledger_service::LedgerService;

/// Computes portfolio analytics: cost basis, profit/loss, allocation breakdown.
///
/// Holdings and cost basis come from the ledger as of `now`; values use each
/// asset's `current_price`.
pub struct AnalyticsService {
    ledger_service: LedgerService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
        }
    }

    /// Generate a full portfolio summary as of `now`.
    pub fn get_portfolio_summary(&self, portfolio: &Portfolio, now: DateTime<Utc>) -> PortfolioSummary {
        let now_ms = to_millis(&now);

        // 1. Per-asset value and cost basis
        let mut holdings: Vec<HoldingSummary> = portfolio
            .assets
            .iter()
            .filter_map(|asset| {
                let holding = self.ledger_service.cumulative_at(&asset.transactions, now_ms);
                if !holding.is_owned() {
                    return None;
                }
                let current_value = holding.quantity * asset.current_price;
                let profit_loss = current_value - holding.cost_basis;
                Some(HoldingSummary {
                    asset_id: asset.id,
                    ticker: asset.ticker.clone(),
                    quantity: holding.quantity,
                    cost_basis: holding.cost_basis,
                    average_cost: holding.cost_basis / holding.quantity,
                    current_price: asset.current_price,
                    current_value,
                    profit_loss,
                    return_pct: percentage(profit_loss, holding.cost_basis),
                    allocation_pct: 0.0, // filled below
                })
            })
            .collect();

        // 2. Totals
        let total_value: f64 = holdings.iter().map(|h| h.current_value).sum();
        let total_cost_basis: f64 = holdings.iter().map(|h| h.cost_basis).sum();
        let total_profit_loss = total_value - total_cost_basis;

        // 3. Allocation, largest first
        for holding in &mut holdings {
            holding.allocation_pct = percentage(holding.current_value, total_value);
        }
        holdings.sort_by(|a, b| b.allocation_pct.total_cmp(&a.allocation_pct));

        PortfolioSummary {
            as_of: now,
            asset_count: holdings.len(),
            total_value,
            total_cost_basis,
            total_profit_loss,
            total_return_pct: percentage(total_profit_loss, total_cost_basis),
            holdings,
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}
