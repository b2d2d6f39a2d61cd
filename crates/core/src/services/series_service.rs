use chrono::{DateTime, Utc};
use log::debug;

use crate::models::asset::Asset;
use crate::models::chart::{AssetValue, SeriesPoint};
use crate::models::range::{TimeRange, TimeWindow};
use crate::models::settings::MAX_CHART_STEPS;
use crate::services::estimator_service::EstimatorService;
use crate::services::ledger_service::LedgerService;
use crate::services::range_service::RangeService;

/// Reconstructs the portfolio value curve over a time window.
///
/// For each of `steps + 1` evenly spaced instants, every asset is valued as
/// `holding quantity × estimated price` and its cost basis added to the
/// point's total. An asset that is not held yet (quantity ≤ 0) contributes
/// exactly zero and its price is never estimated, so no phantom position is
/// drawn before the first buy.
///
/// Pure: the same inputs always give bit-identical output.
pub struct SeriesService {
    ledger_service: LedgerService,
    estimator_service: EstimatorService,
    range_service: RangeService,
}

impl SeriesService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
            estimator_service: EstimatorService::new(),
            range_service: RangeService::new(),
        }
    }

    /// Resolve `range` and synthesize the series over it.
    pub fn synthesize(
        &self,
        assets: &[Asset],
        range: &TimeRange,
        now: DateTime<Utc>,
        steps: usize,
    ) -> Vec<SeriesPoint> {
        let window = self.range_service.resolve(range, assets, now);
        self.synthesize_window(assets, window, now, steps)
    }

    /// Synthesize the series over an already resolved window.
    ///
    /// `steps == 0` yields a single sample at the end of the window.
    pub fn synthesize_window(
        &self,
        assets: &[Asset],
        window: TimeWindow,
        now: DateTime<Utc>,
        steps: usize,
    ) -> Vec<SeriesPoint> {
        let steps = steps.min(MAX_CHART_STEPS);
        debug!(
            "Synthesizing {} samples for {} assets over [{}, {}]",
            steps + 1,
            assets.len(),
            window.min_ms,
            window.max_ms
        );

        Self::sample_times(window, steps)
            .into_iter()
            .map(|t_ms| self.point_at(assets, t_ms, now))
            .collect()
    }

    /// Evenly spaced sample instants across the inclusive window. The last one
    /// is exactly `max_ms`.
    pub fn sample_times(window: TimeWindow, steps: usize) -> Vec<f64> {
        let steps = steps.min(MAX_CHART_STEPS);
        if steps == 0 {
            return vec![window.max_ms];
        }
        let span = window.span_ms();
        (0..=steps)
            .map(|i| {
                if i == steps {
                    window.max_ms
                } else {
                    window.min_ms + span * (i as f64 / steps as f64)
                }
            })
            .collect()
    }

    fn point_at(&self, assets: &[Asset], t_ms: f64, now: DateTime<Utc>) -> SeriesPoint {
        let mut cost_basis = 0.0;
        let mut market_value = 0.0;
        let mut per_asset = Vec::with_capacity(assets.len());

        for asset in assets {
            let holding = self.ledger_service.cumulative_at(&asset.transactions, t_ms);

            let value = if holding.is_owned() {
                let price = self.estimator_service.estimate_price(asset, t_ms, now);
                cost_basis += holding.cost_basis;
                holding.quantity * price
            } else {
                0.0
            };

            market_value += value;
            per_asset.push(AssetValue {
                asset_id: asset.id,
                value,
            });
        }

        SeriesPoint {
            timestamp_ms: t_ms,
            cost_basis,
            market_value,
            per_asset,
        }
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::new()
    }
}
