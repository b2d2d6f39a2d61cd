use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceQuote};
use crate::providers::registry::PriceProviderRegistry;

/// Fetches coin prices from the registered providers.
///
/// - **Current price**: every provider is asked; answers are averaged and the
///   contributing providers reported as sources.
/// - **History**: providers are tried in priority order, first success wins.
///
/// This is the only async part of the crate. The chart engine never calls it;
/// callers store the results on the assets first.
pub struct PriceService {
    registry: PriceProviderRegistry,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of all registered providers.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn has_providers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Current USD price of `symbol`, averaged over every provider that answered.
    pub async fn fetch_current_price(&self, symbol: &str) -> Result<PriceQuote, CoreError> {
        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut prices = Vec::new();
        let mut sources = Vec::new();
        let mut last_error = None;

        for provider in self.registry.providers() {
            match provider.get_current_price(symbol).await {
                Ok(price) if price.is_finite() && price >= 0.0 => {
                    prices.push(price);
                    sources.push(provider.name().to_string());
                }
                Ok(price) => {
                    warn!("{} returned an invalid price for {symbol}: {price}", provider.name());
                }
                Err(e) => {
                    warn!("{} failed to price {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        if prices.is_empty() {
            return Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
            }));
        }

        let price = prices.iter().sum::<f64>() / prices.len() as f64;
        debug!("{symbol} priced at {price} from {sources:?}");
        Ok(PriceQuote { price, sources })
    }

    /// Price history of `symbol` between `from` and `to`, sorted ascending.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoreError> {
        if from >= to {
            return Err(CoreError::ValidationError(format!(
                "History range start {from} must be before end {to}"
            )));
        }
        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.get_price_history(symbol, from, to).await {
                Ok(mut points) if !points.is_empty() => {
                    points.sort_by_key(|p| p.timestamp);
                    debug!("{} returned {} samples for {symbol}", provider.name(), points.len());
                    return Ok(points);
                }
                Ok(_) => {
                    warn!("{} returned no history for {symbol}, trying next provider", provider.name());
                }
                Err(e) => {
                    warn!("{} history failed for {symbol}: {e}, trying next provider", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
        }))
    }
}
