use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::format;

/// High-level storage operations: save/load a portfolio to/from bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to raw bytes (portable, platform-independent).
    ///
    /// Flow: Portfolio → bincode → CPFL format bytes
    pub fn save_to_bytes(portfolio: &Portfolio) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;
        debug!(
            "Saving {} assets ({} bytes)",
            portfolio.assets.len(),
            payload.len()
        );
        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    /// Deserialize a portfolio from raw bytes.
    ///
    /// Flow: CPFL bytes → parse header → bincode → Portfolio → sanitized settings
    pub fn load_from_bytes(data: &[u8]) -> Result<Portfolio, CoreError> {
        let (header, payload) = format::read_file(data)?;
        let mut portfolio: Portfolio = bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize portfolio: {e}")))?;
        let stored_steps = portfolio.settings.chart_steps;
        if portfolio.settings.sanitize() {
            warn!(
                "Stored chart_steps {stored_steps} out of range, using {}",
                portfolio.settings.chart_steps
            );
        }
        debug!(
            "Loaded {} assets from a v{} file",
            portfolio.assets.len(),
            header.version
        );
        Ok(portfolio)
    }

    /// Save portfolio to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(portfolio: &Portfolio, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(portfolio)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load portfolio from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Portfolio, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
