use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::models::round_to;

pub mod credit;
pub mod psychology;
pub mod registry;
pub mod technical;
pub mod valuation;
pub mod volatility;

// ============================================================================
// KEYS & ENUMS
// ============================================================================

/// The closed set of tracked indicators. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKey {
    Vix,
    Skew,
    PutCall,
    HySpread,
    ShillerPe,
    Ma200Deviation,
    FearGreed,
    BuffettIndicator,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 8] = [
        IndicatorKey::Vix,
        IndicatorKey::Skew,
        IndicatorKey::PutCall,
        IndicatorKey::HySpread,
        IndicatorKey::ShillerPe,
        IndicatorKey::Ma200Deviation,
        IndicatorKey::FearGreed,
        IndicatorKey::BuffettIndicator,
    ];

    /// Stable slug (e.g. "put_call"), identical to the serde form.
    pub fn slug(&self) -> &'static str {
        match self {
            IndicatorKey::Vix => "vix",
            IndicatorKey::Skew => "skew",
            IndicatorKey::PutCall => "put_call",
            IndicatorKey::HySpread => "hy_spread",
            IndicatorKey::ShillerPe => "shiller_pe",
            IndicatorKey::Ma200Deviation => "ma200_deviation",
            IndicatorKey::FearGreed => "fear_greed",
            IndicatorKey::BuffettIndicator => "buffett_indicator",
        }
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for IndicatorKey {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKey::ALL
            .iter()
            .copied()
            .find(|k| k.slug() == s)
            .ok_or_else(|| RiskError::UnknownIndicator(s.to_string()))
    }
}

/// Which side of the threshold is dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdDirection {
    /// value >= threshold is dangerous
    Above,
    /// value <= threshold is dangerous
    Below,
}

// ============================================================================
// CRISIS PERIODS & BOUNDS
// ============================================================================

/// Date range (inclusive) during which generated values are skewed by `factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub factor: f64,
}

impl CrisisPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Shared stress calendar: GFC, COVID crash, 2022 rate shock.
static CRISIS_WINDOWS: Lazy<[(NaiveDate, NaiveDate); 3]> = Lazy::new(|| {
    [
        (ymd(2008, 9, 1), ymd(2009, 3, 1)),
        (ymd(2020, 2, 1), ymd(2020, 5, 1)),
        (ymd(2022, 2, 1), ymd(2022, 4, 1)),
    ]
});

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("crisis calendar dates are valid")
}

/// Pair factors with the shared crisis calendar, in calendar order.
/// Fewer factors than windows leaves the later windows out.
pub(crate) fn crisis_periods(factors: &[f64]) -> Vec<CrisisPeriod> {
    CRISIS_WINDOWS
        .iter()
        .zip(factors)
        .map(|(&(start, end), &factor)| CrisisPeriod { start, end, factor })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Floor,
    Ceiling,
}

/// Hard bound on generated values. A violating value is replaced by a fresh
/// draw from `[reseed_base, reseed_base + reseed_span)` rather than clamped,
/// so the series never flat-lines at the limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundCorrection {
    pub kind: BoundKind,
    pub limit: f64,
    pub reseed_base: f64,
    pub reseed_span: f64,
}

impl BoundCorrection {
    pub fn floor(limit: f64, reseed_span: f64) -> Self {
        Self { kind: BoundKind::Floor, limit, reseed_base: limit, reseed_span }
    }

    pub fn ceiling(limit: f64, reseed_base: f64, reseed_span: f64) -> Self {
        Self { kind: BoundKind::Ceiling, limit, reseed_base, reseed_span }
    }

    pub fn is_violated(&self, value: f64) -> bool {
        match self.kind {
            BoundKind::Floor => value < self.limit,
            BoundKind::Ceiling => value > self.limit,
        }
    }

    pub fn reseed<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.reseed_base + rng.gen::<f64>() * self.reseed_span
    }
}

// ============================================================================
// SPEC
// ============================================================================

/// Static configuration of one indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub key: IndicatorKey,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub threshold: f64,
    pub threshold_direction: ThresholdDirection,
    #[serde(default)]
    pub unit: String,
    pub decimal_places: u32,
    pub baseline: f64,
    pub volatility: f64,
    /// Additive drift per year over the generation window.
    #[serde(default)]
    pub trend: Option<f64>,
    #[serde(default)]
    pub crisis_periods: Vec<CrisisPeriod>,
    #[serde(default)]
    pub bounds: Vec<BoundCorrection>,
}

impl IndicatorSpec {
    /// First matching period in declaration order wins; 1.0 outside any crisis.
    pub fn crisis_factor(&self, date: NaiveDate) -> f64 {
        self.crisis_periods
            .iter()
            .find(|p| p.contains(date))
            .map(|p| p.factor)
            .unwrap_or(1.0)
    }

    /// Apply every bound rule in order, reseeding violations.
    pub fn correct_bounds<R: Rng + ?Sized>(&self, mut value: f64, rng: &mut R) -> f64 {
        for bound in &self.bounds {
            if bound.is_violated(value) {
                value = bound.reseed(rng);
            }
        }
        value
    }

    /// e.g. "12.35" for VIX, "4.20%" for HY spread.
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}{}", self.decimal_places as usize, value, self.unit)
    }

    /// e.g. "30 or above", "0.7 or below".
    pub fn threshold_text(&self) -> String {
        let side = match self.threshold_direction {
            ThresholdDirection::Above => "above",
            ThresholdDirection::Below => "below",
        };
        format!("{}{} or {}", self.threshold, self.unit, side)
    }

    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.decimal_places)
    }
}

// ============================================================================
// STRATEGY TRAIT
// ============================================================================

/// Per-indicator behaviour that does not fit in plain configuration.
pub trait IndicatorModel: Send + Sync {
    fn key(&self) -> IndicatorKey;

    /// Built-in configuration for this indicator.
    fn default_spec(&self) -> IndicatorSpec;

    /// Bespoke sentiment curve (low = fear, high = greed).
    /// `None` falls back to the status-derived score.
    fn base_score(&self, value: f64) -> Option<f64>;

    /// Apply a crisis factor to the pre-noise value.
    fn apply_crisis(&self, value: f64, factor: f64, _volatility: f64) -> f64 {
        if factor != 1.0 {
            value * factor
        } else {
            value
        }
    }
}

/// First `(limit, score)` with `value >= limit` wins.
pub(crate) fn score_at_or_above(value: f64, steps: &[(f64, f64)], otherwise: f64) -> f64 {
    steps
        .iter()
        .find(|(limit, _)| value >= *limit)
        .map(|(_, score)| *score)
        .unwrap_or(otherwise)
}

/// First `(limit, score)` with `value <= limit` wins.
pub(crate) fn score_at_or_below(value: f64, steps: &[(f64, f64)], otherwise: f64) -> f64 {
    steps
        .iter()
        .find(|(limit, _)| value <= *limit)
        .map(|(_, score)| *score)
        .unwrap_or(otherwise)
}
