use std::collections::HashMap;

use super::coincap::CoinCapProvider;
use super::coingecko::CoinGeckoProvider;
use super::traits::PriceProvider;

/// Registry of all available price providers, in priority order.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // CoinCap: keyless
        registry.register(Box::new(CoinCapProvider::new()));

        // CoinGecko: keyless, or with a demo key from settings
        registry.register(Box::new(CoinGeckoProvider::new(
            api_keys.get("coingecko").cloned(),
        )));

        registry
    }

    /// Register a new price provider (lowest priority so far).
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// All providers, in registration order.
    pub fn providers(&self) -> Vec<&dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    /// Provider names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
