pub mod registry;
pub mod traits;

// API provider implementations
pub mod coincap;
pub mod coingecko;

use reqwest::Client;

/// HTTP client shared by the provider implementations. Native builds get a
/// 30 s timeout; the browser fetch API handles its own.
pub(crate) fn http_client() -> Client {
    let builder = Client::builder();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.timeout(std::time::Duration::from_secs(30));
    builder.build().unwrap_or_else(|_| Client::new())
}
