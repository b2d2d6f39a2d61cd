use chrono::{DateTime, Utc};
use log::debug;

use crate::models::asset::Asset;
use crate::models::chart::{ChartCoord, ChartData, SeriesPoint, StackGeometry, StackedRegion};
use crate::models::range::TimeRange;
use crate::services::range_service::RangeService;
use crate::services::series_service::SeriesService;

/// Logical canvas width of the generated geometry.
pub const CANVAS_WIDTH: f64 = 100.0;

/// Logical canvas height of the generated geometry.
pub const CANVAS_HEIGHT: f64 = 100.0;

/// Vertical headroom above the largest value (10%).
const HEADROOM: f64 = 1.1;

/// Scale used when the whole series is zero.
const EMPTY_SERIES_MAX: f64 = 1.0;

/// Generates chart-ready data sets from the assets.
///
/// The core computes all the numbers; the frontend only renders.
/// Chart data includes:
/// - The sampled value curve (for tooltips)
/// - One stacked band per asset plus a cost basis line (for drawing)
pub struct ChartService {
    series_service: SeriesService,
    range_service: RangeService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            series_service: SeriesService::new(),
            range_service: RangeService::new(),
        }
    }

    /// Full pipeline: resolve the window, sample the curve, build the stack.
    pub fn generate_chart(
        &self,
        assets: &[Asset],
        range: &TimeRange,
        now: DateTime<Utc>,
        steps: usize,
    ) -> ChartData {
        let window = self.range_service.resolve(range, assets, now);
        let points = self.series_service.synthesize_window(assets, window, now, steps);
        let geometry = self.build_stack(&points, assets);
        ChartData {
            window,
            points,
            geometry,
        }
    }

    /// Stack the per-asset values of `points` in the order of `asset_order`.
    ///
    /// Each band sits on a running baseline: its bottom is the previous band's
    /// top at the same index. Assets that are zero at every sample produce no
    /// band. Coordinates are on a `CANVAS_WIDTH × CANVAS_HEIGHT` canvas with
    /// y growing downwards and 10% headroom above the largest value.
    pub fn build_stack(&self, points: &[SeriesPoint], asset_order: &[Asset]) -> StackGeometry {
        let max_value = Self::max_observed_value(points);
        let scale = Scale::new(points, max_value);

        let mut baseline = vec![0.0_f64; points.len()];
        let mut regions = Vec::new();

        for asset in asset_order {
            let values: Vec<f64> = points.iter().map(|p| p.value_of(asset.id)).collect();
            if values.iter().all(|v| *v == 0.0) {
                debug!("{}: zero across the window, not stacked", asset.ticker);
                continue;
            }

            let mut top = Vec::with_capacity(points.len());
            let mut bottom = Vec::with_capacity(points.len());
            for (i, point) in points.iter().enumerate() {
                let x = scale.x(point.timestamp_ms);
                let stacked = baseline[i] + values[i];
                bottom.push(ChartCoord {
                    x,
                    y: scale.y(baseline[i]),
                });
                top.push(ChartCoord {
                    x,
                    y: scale.y(stacked),
                });
                baseline[i] = stacked;
            }

            regions.push(StackedRegion {
                asset_id: asset.id,
                ticker: asset.ticker.clone(),
                top,
                bottom,
            });
        }

        let cost_basis_line = points
            .iter()
            .map(|p| ChartCoord {
                x: scale.x(p.timestamp_ms),
                y: scale.y(p.cost_basis),
            })
            .collect();

        StackGeometry {
            regions,
            cost_basis_line,
            max_value,
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }

    /// The sample under a horizontal position, `ratio` being 0 at the left
    /// edge and 1 at the right edge. Out-of-range ratios are clamped.
    /// No interpolation: the nearest preceding sample is returned.
    pub fn resolve_at<'a>(&self, points: &'a [SeriesPoint], ratio: f64) -> Option<&'a SeriesPoint> {
        let last = points.len().checked_sub(1)?;
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let idx = ((ratio * last as f64).floor() as usize).min(last);
        points.get(idx)
    }

    /// Largest market value or cost basis across the series, or a placeholder
    /// when nothing is positive.
    pub fn max_observed_value(points: &[SeriesPoint]) -> f64 {
        let max = points
            .iter()
            .flat_map(|p| [p.market_value, p.cost_basis])
            .fold(0.0_f64, f64::max);
        if max > 0.0 {
            max
        } else {
            EMPTY_SERIES_MAX
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear maps from (time, value) to canvas coordinates.
struct Scale {
    min_ms: f64,
    span_ms: f64,
    top_value: f64,
}

impl Scale {
    fn new(points: &[SeriesPoint], max_value: f64) -> Self {
        let min_ms = points.first().map(|p| p.timestamp_ms).unwrap_or(0.0);
        let max_ms = points.last().map(|p| p.timestamp_ms).unwrap_or(0.0);
        Self {
            min_ms,
            span_ms: max_ms - min_ms,
            top_value: max_value * HEADROOM,
        }
    }

    fn x(&self, t_ms: f64) -> f64 {
        if self.span_ms > 0.0 {
            (t_ms - self.min_ms) / self.span_ms * CANVAS_WIDTH
        } else {
            0.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        CANVAS_HEIGHT - (value / self.top_value) * CANVAS_HEIGHT
    }
}
