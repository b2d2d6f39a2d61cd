use chrono::{DateTime, Utc};
use log::debug;

use crate::models::asset::Asset;
use crate::models::range::to_millis;

/// A `(time, price)` point the estimator interpolates between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub t_ms: f64,
    pub price: f64,
}

/// Estimates an asset's price at an arbitrary instant.
///
/// Two strategies, chosen per asset:
/// - **History**: the asset has a fetched price history → interpolate it.
/// - **Anchors**: no history → interpolate between the transaction prices
///   and the current price pinned at `now`.
///
/// Outside the known range the boundary price is returned (clamping).
pub struct EstimatorService;

impl EstimatorService {
    pub fn new() -> Self {
        Self
    }

    /// Estimated price of `asset` at `t_ms`.
    pub fn estimate_price(&self, asset: &Asset, t_ms: f64, now: DateTime<Utc>) -> f64 {
        let anchors = if asset.has_history() {
            asset
                .price_history
                .iter()
                .map(|p| Anchor {
                    t_ms: to_millis(&p.timestamp),
                    price: p.price,
                })
                .collect()
        } else {
            self.build_anchors(asset, now)
        };

        match Self::interpolate(&anchors, t_ms) {
            Some(price) => price,
            None => {
                debug!("{}: no price data, using current price", asset.ticker);
                asset.current_price
            }
        }
    }

    /// Anchor points used when no history exists: one per transaction plus
    /// `(now, current_price)`, sorted by time. Of several anchors sharing a
    /// timestamp only the first one seen is kept.
    pub fn build_anchors(&self, asset: &Asset, now: DateTime<Utc>) -> Vec<Anchor> {
        let mut anchors: Vec<Anchor> = asset
            .transactions
            .iter()
            .map(|tx| Anchor {
                t_ms: to_millis(&tx.date),
                price: tx.price_per_coin,
            })
            .collect();
        anchors.push(Anchor {
            t_ms: to_millis(&now),
            price: asset.current_price,
        });

        // Stable sort keeps ledger order among equal timestamps.
        anchors.sort_by(|a, b| a.t_ms.total_cmp(&b.t_ms));
        anchors.dedup_by(|later, earlier| later.t_ms == earlier.t_ms);
        anchors
    }

    /// Clamp-or-interpolate over points sorted ascending by time.
    /// Returns `None` only when there are no points at all.
    pub fn interpolate(points: &[Anchor], t_ms: f64) -> Option<f64> {
        let first = points.first()?;
        // Index of the first point at or after t.
        let idx = points.partition_point(|p| p.t_ms < t_ms);

        if idx == 0 {
            return Some(first.price);
        }
        let Some(p2) = points.get(idx) else {
            return points.last().map(|p| p.price);
        };
        let p1 = &points[idx - 1];

        if p2.t_ms == t_ms {
            return Some(p2.price);
        }
        if p2.t_ms == p1.t_ms {
            return Some(p1.price);
        }

        let ratio = (t_ms - p1.t_ms) / (p2.t_ms - p1.t_ms);
        Some(p1.price + (p2.price - p1.price) * ratio)
    }
}

impl Default for EstimatorService {
    fn default() -> Self {
        Self::new()
    }
}
