use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::Asset;
use super::settings::Settings;

/// The main data container. Everything in here gets serialized and saved
/// to the portable .cpfl file.
///
/// `assets` keeps insertion order, which is also the stacking order of the
/// value chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    /// All tracked assets with their ledgers and price data
    pub assets: Vec<Asset>,

    /// User settings (default range, chart resolution, API keys)
    pub settings: Settings,
}

impl Portfolio {
    pub fn find_asset(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn find_asset_mut(&mut self, id: Uuid) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    /// Total number of ledger entries across all assets.
    pub fn transaction_count(&self) -> usize {
        self.assets.iter().map(|a| a.transactions.len()).sum()
    }
}
