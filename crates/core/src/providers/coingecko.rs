use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER: &str = "CoinGecko";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko API provider.
///
/// - **Free tier**: works without a key; a demo key (sent as a header, never
///   in the URL) raises the rate limit.
/// - **Endpoints**: `/simple/price`, `/coins/{id}/market_chart/range`
pub struct CoinGeckoProvider {
    client: Client,
    api_key: Option<String>,
    /// Uppercase symbol (BTC) → CoinGecko coin id (bitcoin).
    symbol_map: HashMap<String, String>,
}

impl CoinGeckoProvider {
    pub fn new(api_key: Option<String>) -> Self {
        let common = [
            ("BTC", "bitcoin"),
            ("ETH", "ethereum"),
            ("USDT", "tether"),
            ("USDC", "usd-coin"),
            ("BNB", "binancecoin"),
            ("XRP", "ripple"),
            ("ADA", "cardano"),
            ("SOL", "solana"),
            ("DOGE", "dogecoin"),
            ("DOT", "polkadot"),
            ("LTC", "litecoin"),
            ("AVAX", "avalanche-2"),
            ("LINK", "chainlink"),
            ("UNI", "uniswap"),
            ("ATOM", "cosmos"),
            ("XLM", "stellar"),
            ("NEAR", "near"),
            ("SHIB", "shiba-inu"),
            ("TRX", "tron"),
            ("XMR", "monero"),
        ];

        Self {
            client: super::http_client(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            symbol_map: common
                .iter()
                .map(|(sym, id)| (sym.to_string(), id.to_string()))
                .collect(),
        }
    }

    /// Map a ticker to a CoinGecko coin id; unknown tickers are lowercased.
    pub fn resolve_id(&self, symbol: &str) -> String {
        self.symbol_map
            .get(&symbol.to_uppercase())
            .cloned()
            .unwrap_or_else(|| symbol.to_lowercase())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// GET `url` with the demo key attached, decoding the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &str) -> Result<T, CoreError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| api_error(format!("Unexpected response for {symbol}: {e}")))
    }
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER.into(),
        message,
    }
}

// ── CoinGecko API response types ────────────────────────────────────

/// `/simple/price` → `{"bitcoin": {"usd": 64000.0}}`
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// `/market_chart/range` → `{"prices": [[ms, price], ...], ...}`
#[derive(Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let id = self.resolve_id(symbol);
        let url = format!("{BASE_URL}/simple/price?ids={id}&vs_currencies=usd");

        let resp: SimplePriceResponse = self.get_json(&url, symbol).await?;

        resp.get(&id)
            .and_then(|prices| prices.get("usd"))
            .copied()
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
            })
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let id = self.resolve_id(symbol);
        let url = format!(
            "{BASE_URL}/coins/{id}/market_chart/range?vs_currency=usd&from={}&to={}",
            from.timestamp(),
            to.timestamp()
        );

        let resp: MarketChartResponse = self.get_json(&url, symbol).await?;
        Ok(resp
            .prices
            .into_iter()
            .filter(|(_, price)| price.is_finite())
            .filter_map(|(ms, price)| {
                DateTime::from_timestamp_millis(ms as i64).map(|t| PricePoint::new(t, price))
            })
            .collect())
    }
}
