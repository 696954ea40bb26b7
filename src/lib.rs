pub mod error;
pub mod models;
pub mod core;
pub mod indicators;
pub mod analysis;
pub mod config;

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;

use analysis::insight::IndicatorAnalysis;
use analysis::market_status::{IndicatorRow, OverallAssessment};
use analysis::StatusTier;
use config::DashboardConfig;
use error::{Result, RiskError};
use indicators::registry::Registry;
use indicators::{IndicatorKey, IndicatorSpec};
use models::{GenerationWindow, MarketDataset, TimeSeries};

/// Read-only view over one generated market history.
///
/// Cloning is cheap: the registry and the dataset are shared snapshots.
#[derive(Clone)]
pub struct Dashboard {
    registry: Arc<Registry>,
    dataset: Arc<MarketDataset>,
    period_years: f64,
}

impl Dashboard {
    /// Build the catalog, seed the RNG and generate the history as configured.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let registry = config.registry()?;
        let mut rng = config.rng();
        let mut dashboard = Self::new(registry, &config.generation_window(), &mut rng)?;
        dashboard.period_years = config.period_years;
        Ok(dashboard)
    }

    pub fn new<R: Rng + ?Sized>(registry: Registry, window: &GenerationWindow, rng: &mut R) -> Result<Self> {
        let dataset = core::generator::generate(&registry, window, rng)?;
        log::info!(
            "Dashboard ready: {} indicators, {} points each",
            registry.len(),
            dataset.points_per_series()
        );
        Ok(Self {
            registry: Arc::new(registry),
            dataset: Arc::new(dataset),
            period_years: config::DEFAULT_PERIOD_YEARS,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dataset(&self) -> &MarketDataset {
        &self.dataset
    }

    pub fn specs(&self) -> &[IndicatorSpec] {
        self.registry.specs()
    }

    pub fn period_years(&self) -> f64 {
        self.period_years
    }

    pub fn current_values(&self) -> BTreeMap<IndicatorKey, f64> {
        self.dataset.current_values()
    }

    /// Trailing `years` of history for one indicator.
    pub fn series(&self, key: IndicatorKey, years: f64) -> Result<TimeSeries> {
        let full = self.dataset.series(key)?;
        Ok(core::timeseries::slice_period(full, years)?.to_vec())
    }

    /// History over the configured default chart period.
    pub fn default_series(&self, key: IndicatorKey) -> Result<TimeSeries> {
        self.series(key, self.period_years)
    }

    pub fn classify(&self, key: IndicatorKey, value: f64) -> Result<StatusTier> {
        Ok(analysis::classify(self.registry.get(key)?, value))
    }

    /// Jittered score using the thread RNG. Repeated calls may differ.
    pub fn sentiment_score(&self, key: IndicatorKey, value: f64) -> Result<u8> {
        self.sentiment_score_with(key, value, &mut rand::thread_rng())
    }

    pub fn sentiment_score_with<R: Rng + ?Sized>(&self, key: IndicatorKey, value: f64, rng: &mut R) -> Result<u8> {
        analysis::sentiment::score(&self.registry, key, value, rng)
    }

    pub fn format_value(&self, key: IndicatorKey, value: f64) -> Result<String> {
        Ok(self.registry.get(key)?.format_value(value))
    }

    pub fn assess_overall(&self, values: &BTreeMap<IndicatorKey, f64>) -> Result<OverallAssessment> {
        analysis::assess_overall(&self.registry, values)
    }

    /// Assessment of the latest values.
    pub fn current_assessment(&self) -> Result<OverallAssessment> {
        self.assess_overall(&self.current_values())
    }

    pub fn overview(&self) -> Vec<IndicatorRow> {
        analysis::market_status::overview(&self.registry, &self.current_values())
    }

    pub fn danger_alerts(&self) -> Vec<String> {
        analysis::market_status::danger_alerts(&self.registry, &self.current_values())
    }

    pub fn alert_message(&self) -> Option<String> {
        analysis::market_status::alert_message(&self.danger_alerts())
    }

    pub fn week_over_week_change(&self, key: IndicatorKey) -> Result<Option<f64>> {
        Ok(core::timeseries::week_over_week_change(self.dataset.series(key)?))
    }

    /// Detail view for the latest value of one indicator.
    pub fn analysis(&self, key: IndicatorKey) -> Result<IndicatorAnalysis> {
        self.analysis_with(key, &mut rand::thread_rng())
    }

    pub fn analysis_with<R: Rng + ?Sized>(&self, key: IndicatorKey, rng: &mut R) -> Result<IndicatorAnalysis> {
        let latest = self.dataset.latest(key)?.ok_or(RiskError::EmptyWindow)?;
        let week_change = self.week_over_week_change(key)?;
        let score = self.sentiment_score_with(key, latest.value, rng)?;
        analysis::analyze(&self.registry, key, latest.value, week_change, score)
    }
}
