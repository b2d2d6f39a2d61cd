use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Trait abstraction for crypto price data sources.
///
/// Each API (CoinCap, CoinGecko) implements this trait. If an API stops
/// working or changes, only that implementation is replaced.
/// All prices are in USD.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs, errors and quote sources).
    fn name(&self) -> &str;

    /// Get the current (latest) USD price of a coin.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Get price samples between `from` and `to`, sorted by timestamp.
    async fn get_price_history(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
