use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::error::{Result, RiskError};
use crate::indicators::IndicatorKey;

/// One weekly observation of an indicator. Never mutated after generation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Chronologically ordered points, strictly increasing by date.
pub type TimeSeries = Vec<DataPoint>;

/// Round to a fixed number of decimals (display and storage precision).
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

/// Date grid the history is generated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationWindow {
    pub end_date: NaiveDate,
    pub window_years: u32,
    pub step_days: u32,
}

impl Default for GenerationWindow {
    fn default() -> Self {
        Self {
            end_date: NaiveDate::from_ymd_opt(2025, 12, 29).expect("valid default end date"),
            window_years: 20,
            step_days: 7,
        }
    }
}

/// Generated history for every indicator. Written once, read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct MarketDataset {
    pub window: GenerationWindow,
    series: BTreeMap<IndicatorKey, TimeSeries>,
}

impl MarketDataset {
    pub fn new(window: GenerationWindow, series: BTreeMap<IndicatorKey, TimeSeries>) -> Self {
        Self { window, series }
    }

    pub fn series(&self, key: IndicatorKey) -> Result<&[DataPoint]> {
        self.series
            .get(&key)
            .map(|s| s.as_slice())
            .ok_or_else(|| RiskError::UnknownIndicator(key.slug().to_string()))
    }

    pub fn latest(&self, key: IndicatorKey) -> Result<Option<&DataPoint>> {
        Ok(self.series(key)?.last())
    }

    /// Latest value per indicator. Indicators with an empty series are skipped.
    pub fn current_values(&self) -> BTreeMap<IndicatorKey, f64> {
        self.series
            .iter()
            .filter_map(|(key, s)| s.last().map(|dp| (*key, dp.value)))
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = IndicatorKey> + '_ {
        self.series.keys().copied()
    }

    /// Points per indicator (all series share the same date grid).
    pub fn points_per_series(&self) -> usize {
        self.series.values().map(|s| s.len()).max().unwrap_or(0)
    }
}
