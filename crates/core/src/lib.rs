pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use models::{
    analytics::PortfolioSummary,
    asset::Asset,
    chart::{ChartData, SeriesPoint},
    portfolio::Portfolio,
    price::{PricePoint, PriceQuote},
    range::TimeRange,
    settings::Settings,
    transaction::{Transaction, TransactionType},
};
use providers::registry::PriceProviderRegistry;
use services::{
    analytics_service::AnalyticsService, chart_service::ChartService,
    portfolio_service::PortfolioService, price_service::PriceService,
    series_service::SeriesService,
};
use storage::manager::StorageManager;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Coinfolio core library.
/// Holds the portfolio state and all services needed to operate on it.
///
/// Chart and summary calls take `now` explicitly so results depend only on
/// their inputs.
#[must_use]
pub struct Coinfolio {
    portfolio: Portfolio,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    series_service: SeriesService,
    chart_service: ChartService,
    analytics_service: AnalyticsService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
    /// Set by `with_registry`; API key changes then leave the providers alone.
    custom_registry: bool,
}

impl std::fmt::Debug for Coinfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coinfolio")
            .field("assets", &self.portfolio.assets.len())
            .field("transactions", &self.portfolio.transaction_count())
            .field("settings", &self.portfolio.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Coinfolio {
    /// Create a brand new empty portfolio with default settings.
    pub fn create_new() -> Self {
        Self::build(Portfolio::default())
    }

    /// Wrap an existing portfolio (e.g., one built by hand or loaded elsewhere).
    pub fn from_portfolio(portfolio: Portfolio) -> Self {
        Self::build(portfolio)
    }

    /// Create an empty portfolio that fetches prices through `registry`
    /// instead of the default providers.
    ///
    /// The registry is kept for the lifetime of the tracker: `set_api_key`
    /// and `remove_api_key` still record keys in settings but do not swap
    /// the injected providers for the defaults.
    pub fn with_registry(registry: PriceProviderRegistry) -> Self {
        let mut tracker = Self::build(Portfolio::default());
        tracker.price_service = PriceService::new(registry);
        tracker.custom_registry = true;
        tracker
    }

    /// Load an existing portfolio from bytes produced by `save_to_bytes`.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_bytes(data)?;
        Ok(Self::build(portfolio))
    }

    /// Save the current portfolio to bytes the frontend can persist.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.portfolio)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from a file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_file(path)?;
        Ok(Self::build(portfolio))
    }

    /// Save to a file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// Start tracking a coin. Returns the new asset's id.
    pub fn add_asset(&mut self, ticker: &str, name: &str) -> Result<Uuid, CoreError> {
        let id = self
            .portfolio_service
            .add_asset(&mut self.portfolio, ticker, name)?;
        self.dirty = true;
        Ok(id)
    }

    /// Stop tracking a coin. Returns the removed asset.
    pub fn remove_asset(&mut self, asset_id: Uuid) -> Result<Asset, CoreError> {
        let removed = self
            .portfolio_service
            .remove_asset(&mut self.portfolio, asset_id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// All assets in insertion (stacking) order.
    #[must_use]
    pub fn get_assets(&self) -> &[Asset] {
        &self.portfolio.assets
    }

    #[must_use]
    pub fn get_asset(&self, asset_id: Uuid) -> Option<&Asset> {
        self.portfolio.find_asset(asset_id)
    }

    /// Find an asset by ticker (case-insensitive).
    #[must_use]
    pub fn find_asset_by_ticker(&self, ticker: &str) -> Option<&Asset> {
        let upper = ticker.trim().to_uppercase();
        self.portfolio.assets.iter().find(|a| a.ticker == upper)
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a buy or sell. Returns the transaction id.
    pub fn add_transaction(
        &mut self,
        asset_id: Uuid,
        transaction_type: TransactionType,
        quantity: f64,
        price_per_coin: f64,
        date: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let id = self.portfolio_service.add_transaction(
            &mut self.portfolio,
            asset_id,
            transaction_type,
            quantity,
            price_per_coin,
            date,
        )?;
        self.dirty = true;
        Ok(id)
    }

    /// Remove a transaction from an asset's ledger.
    pub fn remove_transaction(
        &mut self,
        asset_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, CoreError> {
        let removed =
            self.portfolio_service
                .remove_transaction(&mut self.portfolio, asset_id, transaction_id)?;
        self.dirty = true;
        Ok(removed)
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Manually set the current price of an asset (offline use, tests).
    pub fn set_current_price(&mut self, asset_id: Uuid, price: f64) -> Result<(), CoreError> {
        self.portfolio_service
            .set_current_price(&mut self.portfolio, asset_id, price)?;
        self.dirty = true;
        Ok(())
    }

    /// Manually replace an asset's price history.
    pub fn set_price_history(
        &mut self,
        asset_id: Uuid,
        history: Vec<PricePoint>,
    ) -> Result<usize, CoreError> {
        let count = self
            .portfolio_service
            .set_price_history(&mut self.portfolio, asset_id, history)?;
        self.dirty = true;
        Ok(count)
    }

    /// Fetch the current price of a ticker without touching the portfolio.
    pub async fn fetch_quote(&self, ticker: &str) -> Result<PriceQuote, CoreError> {
        self.price_service.fetch_current_price(ticker).await
    }

    /// Refresh the current price of every asset from the providers.
    ///
    /// Assets that can't be priced keep their previous price; failures are
    /// logged. Returns the number of assets updated.
    pub async fn refresh_prices(&mut self) -> Result<usize, CoreError> {
        if !self.price_service.has_providers() {
            return Err(CoreError::NoProvider);
        }

        let mut updated = 0;
        for asset in &mut self.portfolio.assets {
            match self.price_service.fetch_current_price(&asset.ticker).await {
                Ok(quote) => {
                    debug!("{} refreshed from {:?}", asset.ticker, quote.sources);
                    asset.current_price = quote.price;
                    updated += 1;
                }
                Err(e) => warn!("Keeping previous price for {}: {e}", asset.ticker),
            }
        }

        if updated > 0 {
            self.dirty = true;
        }
        Ok(updated)
    }

    /// Fetch and store an asset's price history between `from` and `to`.
    /// Returns the number of samples stored.
    pub async fn fetch_price_history(
        &mut self,
        asset_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<usize, CoreError> {
        let ticker = self
            .portfolio
            .find_asset(asset_id)
            .map(|a| a.ticker.clone())
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;

        let history = self.price_service.fetch_history(&ticker, from, to).await?;
        self.set_price_history(asset_id, history)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Chart data (window, samples, stacked geometry) for `range` at `now`,
    /// using the configured resolution.
    #[must_use]
    pub fn get_chart(&self, range: &TimeRange, now: DateTime<Utc>) -> ChartData {
        self.chart_service.generate_chart(
            &self.portfolio.assets,
            range,
            now,
            self.portfolio.settings.chart_steps,
        )
    }

    /// Chart data for the configured default range.
    #[must_use]
    pub fn get_default_chart(&self, now: DateTime<Utc>) -> ChartData {
        self.get_chart(&self.portfolio.settings.default_range, now)
    }

    /// The sampled value curve only, with an explicit resolution
    /// (capped at `MAX_CHART_STEPS`).
    #[must_use]
    pub fn get_series(&self, range: &TimeRange, now: DateTime<Utc>, steps: usize) -> Vec<SeriesPoint> {
        self.series_service
            .synthesize(&self.portfolio.assets, range, now, steps)
    }

    /// The sample under a horizontal position (0..=1) of a chart.
    #[must_use]
    pub fn query_point<'a>(&self, chart: &'a ChartData, ratio: f64) -> Option<&'a SeriesPoint> {
        self.chart_service.resolve_at(&chart.points, ratio)
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Holdings, cost basis, profit/loss and allocation as of `now`.
    #[must_use]
    pub fn get_summary(&self, now: DateTime<Utc>) -> PortfolioSummary {
        self.analytics_service
            .get_portfolio_summary(&self.portfolio, now)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.portfolio.settings
    }

    /// Set the range the dashboard opens with.
    pub fn set_default_range(&mut self, range: TimeRange) {
        self.portfolio.settings.default_range = range;
        self.dirty = true;
    }

    /// Set the chart resolution (clamped to a sane range).
    pub fn set_chart_steps(&mut self, steps: usize) {
        self.portfolio.settings.set_chart_steps(steps);
        self.dirty = true;
    }

    /// Set an API key for a provider (e.g., "coingecko").
    /// Rebuilds the default provider registry so the new key takes effect
    /// immediately. An injected registry is left as is.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.portfolio.settings.api_keys.insert(provider, key);
        self.rebuild_price_service();
        self.dirty = true;
    }

    /// Remove an API key for a provider.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.portfolio.settings.api_keys.remove(provider).is_some();
        if removed {
            self.rebuild_price_service();
            self.dirty = true;
        }
        removed
    }

    /// Names of the price providers in use.
    #[must_use]
    pub fn get_provider_names(&self) -> Vec<String> {
        self.price_service.get_provider_names()
    }

    /// Returns `true` if the portfolio has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all assets (ledgers and history included) as a JSON string.
    pub fn export_assets_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.portfolio.assets)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize assets to JSON: {e}")))
    }

    /// Import assets from a JSON string. All-or-nothing: if any asset is
    /// invalid or already tracked, nothing is imported.
    /// Returns the number of assets imported.
    pub fn import_assets_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let assets: Vec<Asset> = serde_json::from_str(json)?;
        let count = assets.len();

        let mut staged = self.portfolio.clone();
        for asset in assets {
            let ticker = asset.ticker.clone();
            self.portfolio_service
                .insert_asset(&mut staged, asset)
                .inspect_err(|e| warn!("Import rejected at {ticker}, nothing imported: {e}"))?;
        }

        self.portfolio = staged;
        if count > 0 {
            self.dirty = true;
        }
        Ok(count)
    }

    /// Export the full portfolio as JSON (snapshot for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn rebuild_price_service(&mut self) {
        if self.custom_registry {
            debug!("Keeping injected provider registry after API key change");
            return;
        }
        let registry = PriceProviderRegistry::new_with_defaults(&self.portfolio.settings.api_keys);
        self.price_service = PriceService::new(registry);
    }

    fn build(mut portfolio: Portfolio) -> Self {
        portfolio.settings.sanitize();
        let registry = PriceProviderRegistry::new_with_defaults(&portfolio.settings.api_keys);

        Self {
            portfolio,
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(registry),
            series_service: SeriesService::new(),
            chart_service: ChartService::new(),
            analytics_service: AnalyticsService::new(),
            dirty: false,
            custom_registry: false,
        }
    }
}
