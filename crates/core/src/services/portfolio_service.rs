use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::portfolio::Portfolio;
use crate::models::price::PricePoint;
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::ledger_service::LedgerService;

/// Tolerance when comparing running quantities against sells.
const QUANTITY_EPSILON: f64 = 1e-12;

/// Manages assets and their transaction ledgers.
///
/// Pure business logic. No I/O, no API calls.
pub struct PortfolioService {
    ledger_service: LedgerService,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
        }
    }

    /// Start tracking a new coin. Tickers are unique (case-insensitive).
    pub fn add_asset(
        &self,
        portfolio: &mut Portfolio,
        ticker: &str,
        name: &str,
    ) -> Result<Uuid, CoreError> {
        let asset = Asset::new(ticker, name);
        if asset.ticker.is_empty() {
            return Err(CoreError::ValidationError("Ticker must not be empty".into()));
        }
        if portfolio.assets.iter().any(|a| a.ticker == asset.ticker) {
            return Err(CoreError::DuplicateAsset(asset.ticker));
        }

        let id = asset.id;
        debug!("Tracking new asset {} ({id})", asset.ticker);
        portfolio.assets.push(asset);
        Ok(id)
    }

    /// Insert a fully built asset (e.g., from an import). Same uniqueness rules
    /// as `add_asset`, plus id uniqueness.
    pub fn insert_asset(&self, portfolio: &mut Portfolio, mut asset: Asset) -> Result<Uuid, CoreError> {
        asset.ticker = asset.ticker.trim().to_uppercase();
        if asset.ticker.is_empty() {
            return Err(CoreError::ValidationError("Ticker must not be empty".into()));
        }
        if portfolio
            .assets
            .iter()
            .any(|a| a.ticker == asset.ticker || a.id == asset.id)
        {
            return Err(CoreError::DuplicateAsset(asset.ticker));
        }
        for tx in &asset.transactions {
            Self::validate_amounts(tx.quantity, tx.price_per_coin)?;
        }
        asset.price_history = Self::normalize_history(std::mem::take(&mut asset.price_history));
        asset.quantity = asset.ledger_quantity();

        let id = asset.id;
        portfolio.assets.push(asset);
        Ok(id)
    }

    /// Stop tracking an asset, dropping its ledger and history.
    pub fn remove_asset(&self, portfolio: &mut Portfolio, asset_id: Uuid) -> Result<Asset, CoreError> {
        let idx = portfolio
            .assets
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;
        Ok(portfolio.assets.remove(idx))
    }

    /// Append a transaction to an asset's ledger.
    ///
    /// Rules:
    /// - Quantity must be positive and finite
    /// - Price per coin must be non-negative and finite
    /// - Can't sell more than you hold at that date
    ///
    /// The first buy on an asset without a known price seeds `current_price`.
    pub fn add_transaction(
        &self,
        portfolio: &mut Portfolio,
        asset_id: Uuid,
        transaction_type: TransactionType,
        quantity: f64,
        price_per_coin: f64,
        date: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        Self::validate_amounts(quantity, price_per_coin)?;

        let asset = Self::asset_mut(portfolio, asset_id)?;
        let tx = Transaction::new(transaction_type, quantity, price_per_coin, date);

        if transaction_type == TransactionType::Sell {
            let held = self
                .ledger_service
                .cumulative_at(&asset.transactions, date.timestamp_millis() as f64)
                .quantity;
            if held + QUANTITY_EPSILON < quantity {
                return Err(CoreError::ValidationError(format!(
                    "Cannot sell {quantity} {} — you only hold {held} on {date}",
                    asset.ticker
                )));
            }
        }

        asset.transactions.push(tx.clone());
        if self.has_negative_running_quantity(&asset.transactions) {
            asset.transactions.pop();
            return Err(CoreError::ValidationError(format!(
                "Selling {quantity} {} on {date} would oversell a later position",
                asset.ticker
            )));
        }

        asset.quantity = asset.ledger_quantity();
        if transaction_type == TransactionType::Buy && asset.current_price == 0.0 {
            asset.current_price = price_per_coin;
        }

        Ok(tx.id)
    }

    /// Remove a transaction. Rejected (and rolled back) if a later sell would
    /// then exceed the running quantity.
    pub fn remove_transaction(
        &self,
        portfolio: &mut Portfolio,
        asset_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, CoreError> {
        let asset = Self::asset_mut(portfolio, asset_id)?;
        let idx = asset
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        let removed = asset.transactions.remove(idx);
        if self.has_negative_running_quantity(&asset.transactions) {
            asset.transactions.insert(idx, removed);
            return Err(CoreError::ValidationError(format!(
                "Removing this transaction would leave a {} sell uncovered",
                asset.ticker
            )));
        }

        asset.quantity = asset.ledger_quantity();
        Ok(removed)
    }

    /// Update the latest known market price of an asset.
    pub fn set_current_price(
        &self,
        portfolio: &mut Portfolio,
        asset_id: Uuid,
        price: f64,
    ) -> Result<(), CoreError> {
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Price must be a non-negative number, got {price}"
            )));
        }
        Self::asset_mut(portfolio, asset_id)?.current_price = price;
        Ok(())
    }

    /// Replace an asset's price history. Samples are sorted ascending and
    /// non-finite prices dropped.
    pub fn set_price_history(
        &self,
        portfolio: &mut Portfolio,
        asset_id: Uuid,
        history: Vec<PricePoint>,
    ) -> Result<usize, CoreError> {
        let asset = Self::asset_mut(portfolio, asset_id)?;
        asset.price_history = Self::normalize_history(history);
        Ok(asset.price_history.len())
    }

    /// Forget an asset's history, switching it back to anchor estimation.
    pub fn clear_price_history(&self, portfolio: &mut Portfolio, asset_id: Uuid) -> Result<(), CoreError> {
        Self::asset_mut(portfolio, asset_id)?.price_history.clear();
        Ok(())
    }

    fn normalize_history(mut history: Vec<PricePoint>) -> Vec<PricePoint> {
        history.retain(|p| p.price.is_finite());
        history.sort_by_key(|p| p.timestamp);
        history
    }

    fn validate_amounts(quantity: f64, price_per_coin: f64) -> Result<(), CoreError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::ValidationError(
                "Transaction quantity must be positive".into(),
            ));
        }
        if !price_per_coin.is_finite() || price_per_coin < 0.0 {
            return Err(CoreError::ValidationError(
                "Price per coin must not be negative".into(),
            ));
        }
        Ok(())
    }

    fn has_negative_running_quantity(&self, transactions: &[Transaction]) -> bool {
        self.ledger_service
            .running_quantities(transactions)
            .iter()
            .any(|q| *q < -QUANTITY_EPSILON)
    }

    fn asset_mut(portfolio: &mut Portfolio, asset_id: Uuid) -> Result<&mut Asset, CoreError> {
        portfolio
            .find_asset_mut(asset_id)
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
