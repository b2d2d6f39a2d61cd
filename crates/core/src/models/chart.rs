use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::range::TimeWindow;

/// Value of one asset at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetValue {
    pub asset_id: Uuid,
    pub value: f64,
}

/// A single sample of the reconstructed portfolio curve.
///
/// The core generates these; the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Sample time in milliseconds since the Unix epoch (may be fractional)
    pub timestamp_ms: f64,

    /// Sum of the cost basis of every asset held at this time
    pub cost_basis: f64,

    /// Sum of the estimated value of every asset held at this time
    pub market_value: f64,

    /// Per-asset values, one entry per asset in portfolio order.
    /// Assets not yet owned appear with a value of exactly `0.0`.
    pub per_asset: Vec<AssetValue>,
}

impl SeriesPoint {
    /// Value contributed by `asset_id`, or `0.0` if the asset is unknown.
    pub fn value_of(&self, asset_id: Uuid) -> f64 {
        self.per_asset
            .iter()
            .find(|v| v.asset_id == asset_id)
            .map(|v| v.value)
            .unwrap_or(0.0)
    }

    /// Unrealised profit/loss at this sample.
    pub fn profit_loss(&self) -> f64 {
        self.market_value - self.cost_basis
    }
}

/// A point on the logical chart canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartCoord {
    pub x: f64,
    pub y: f64,
}

/// The band one asset occupies in the stacked value chart.
///
/// `top` and `bottom` are both in time order and share indices with the
/// series they were built from, so `bottom[i]` of one region is exactly
/// `top[i]` of the region stacked below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedRegion {
    pub asset_id: Uuid,
    pub ticker: String,
    pub top: Vec<ChartCoord>,
    pub bottom: Vec<ChartCoord>,
}

impl StackedRegion {
    /// Closed outline: the top line left-to-right, then the bottom line
    /// mirrored right-to-left.
    pub fn polygon(&self) -> Vec<ChartCoord> {
        self.top
            .iter()
            .chain(self.bottom.iter().rev())
            .copied()
            .collect()
    }
}

/// All geometric primitives needed to draw the stacked value chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackGeometry {
    /// Stacked bands, bottom-most first. Assets that are zero across the
    /// whole window are not included.
    pub regions: Vec<StackedRegion>,

    /// Cost basis reference polyline, independent of the stack
    pub cost_basis_line: Vec<ChartCoord>,

    /// Largest market value or cost basis in the series (placeholder when all zero)
    pub max_value: f64,

    /// Logical canvas width
    pub width: f64,

    /// Logical canvas height
    pub height: f64,
}

/// Everything a chart view needs: the resolved window, the raw samples
/// (for tooltips) and the geometry (for drawing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub window: TimeWindow,
    pub points: Vec<SeriesPoint>,
    pub geometry: StackGeometry,
}
