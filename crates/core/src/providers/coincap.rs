use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://api.coincap.io/v2";
const PROVIDER: &str = "CoinCap";

/// Tickers CoinCap knows under a different id than the lowercased ticker.
const KNOWN_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("USDC", "usd-coin"),
    ("BNB", "binance-coin"),
    ("XRP", "xrp"),
    ("ADA", "cardano"),
    ("SOL", "solana"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("MATIC", "polygon"),
    ("LTC", "litecoin"),
    ("AVAX", "avalanche"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("ATOM", "cosmos"),
    ("XLM", "stellar"),
    ("NEAR", "near-protocol"),
    ("SHIB", "shiba-inu"),
    ("TRX", "tron"),
    ("XMR", "monero"),
];

/// CoinCap v2 REST provider. Keyless.
///
/// Endpoints: `/assets/{id}` (spot), `/assets/{id}/history` (time series) and
/// `/assets?search=` to discover ids for tickers outside `KNOWN_IDS`.
/// Discovered ids are cached for the lifetime of the provider.
pub struct CoinCapProvider {
    client: Client,
    ids: Mutex<HashMap<String, String>>,
}

impl CoinCapProvider {
    pub fn new() -> Self {
        let ids = KNOWN_IDS
            .iter()
            .map(|(ticker, id)| (ticker.to_string(), id.to_string()))
            .collect();
        Self {
            client: super::http_client(),
            ids: Mutex::new(ids),
        }
    }

    /// Offline lookup: the cached id for `symbol`, or the lowercased symbol.
    pub fn resolve_id(&self, symbol: &str) -> String {
        self.cached_id(&symbol.to_uppercase())
            .unwrap_or_else(|| symbol.to_lowercase())
    }

    /// Sampling interval for a history request spanning `from..to`.
    /// Finer intervals on long windows exceed CoinCap's response limits.
    pub fn interval_for(from: DateTime<Utc>, to: DateTime<Utc>) -> &'static str {
        match to - from {
            span if span <= Duration::days(1) => "m5",
            span if span <= Duration::days(30) => "h1",
            _ => "d1",
        }
    }

    fn cached_id(&self, ticker: &str) -> Option<String> {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(ticker)
            .cloned()
    }

    /// Cached id, or a search request whose exact ticker match gets cached.
    async fn lookup_id(&self, symbol: &str) -> Result<String, CoreError> {
        let ticker = symbol.to_uppercase();
        if let Some(id) = self.cached_id(&ticker) {
            return Ok(id);
        }

        let found: SearchResponse = self
            .get_json(&format!("{BASE_URL}/assets?search={ticker}&limit=5"), symbol)
            .await?;
        let id = found
            .data
            .into_iter()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(&ticker))
            .map(|entry| entry.id)
            .ok_or_else(|| api_error(format!("No CoinCap asset found for symbol {ticker}")))?;

        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(ticker, id.clone());
        Ok(id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &str) -> Result<T, CoreError> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| api_error(format!("Unexpected response for {symbol}: {e}")))
    }
}

impl Default for CoinCapProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER.into(),
        message,
    }
}

// ── Response shapes ─────────────────────────────────────────────────
// CoinCap encodes every number as a string.

#[derive(Deserialize)]
struct SpotResponse {
    data: SpotData,
}

#[derive(Deserialize)]
struct SpotData {
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
}

#[derive(Deserialize)]
struct SeriesResponse {
    data: Vec<SeriesSample>,
}

#[derive(Deserialize)]
struct SeriesSample {
    #[serde(rename = "priceUsd")]
    price_usd: String,
    /// Epoch milliseconds
    time: i64,
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<SearchEntry>,
}

#[derive(Deserialize)]
struct SearchEntry {
    id: String,
    symbol: String,
}

impl SeriesSample {
    fn to_point(&self) -> Option<PricePoint> {
        let price = self.price_usd.parse::<f64>().ok().filter(|p| p.is_finite())?;
        let timestamp = DateTime::from_timestamp_millis(self.time)?;
        Some(PricePoint::new(timestamp, price))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for CoinCapProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let id = self.lookup_id(symbol).await?;
        let spot: SpotResponse = self.get_json(&format!("{BASE_URL}/assets/{id}"), symbol).await?;

        let raw = spot.data.price_usd.ok_or_else(|| CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
        })?;
        raw.parse::<f64>()
            .map_err(|e| api_error(format!("Invalid price {raw:?} for {symbol}: {e}")))
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let id = self.lookup_id(symbol).await?;
        let url = format!(
            "{BASE_URL}/assets/{id}/history?interval={}&start={}&end={}",
            Self::interval_for(from, to),
            from.timestamp_millis(),
            to.timestamp_millis()
        );

        let series: SeriesResponse = self.get_json(&url, symbol).await?;
        let mut points: Vec<PricePoint> = series.data.iter().filter_map(SeriesSample::to_point).collect();
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}
