use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::range::TimeRange;

/// Default number of chart steps (the series has `steps + 1` samples).
pub const DEFAULT_CHART_STEPS: usize = 150;

/// Upper bound on chart steps, both in settings and in the series engine.
pub const MAX_CHART_STEPS: usize = 2000;

/// User-configurable settings, stored inside the portfolio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Range selected when the dashboard opens.
    pub default_range: TimeRange,

    /// Chart resolution: number of intervals across the window.
    pub chart_steps: usize,

    /// Optional API keys for providers that accept them.
    /// Keys: provider name (e.g., "coingecko"). Values: the API key string.
    pub api_keys: HashMap<String, String>,
}

impl Settings {
    /// Set the chart resolution, clamped to `1..=MAX_CHART_STEPS`.
    pub fn set_chart_steps(&mut self, steps: usize) {
        self.chart_steps = steps.clamp(1, MAX_CHART_STEPS);
    }

    /// Bring values read from an untrusted file back into range.
    /// Returns `true` if anything was changed.
    pub fn sanitize(&mut self) -> bool {
        let stored = self.chart_steps;
        self.set_chart_steps(stored);
        self.chart_steps != stored
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_range: TimeRange::default(),
            chart_steps: DEFAULT_CHART_STEPS,
            api_keys: HashMap::new(),
        }
    }
}
