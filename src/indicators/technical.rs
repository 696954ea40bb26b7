use super::{
    crisis_periods, score_at_or_below, IndicatorKey, IndicatorModel, IndicatorSpec,
    ThresholdDirection,
};

/// S&P 500 distance from its 200-day moving average, in percent.
/// Can go negative, so it carries no floor.
pub struct Ma200Deviation;

impl IndicatorModel for Ma200Deviation {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::Ma200Deviation
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "200D MA Deviation".to_string(),
            full_name: "S&P 500 Deviation from 200-Day Moving Average".to_string(),
            description: "Distance of price from the 200-day average. 0% or below = downtrend".to_string(),
            threshold: 0.0,
            threshold_direction: ThresholdDirection::Below,
            unit: "%".to_string(),
            decimal_places: 2,
            baseline: 2.5,
            volatility: 5.0,
            trend: None,
            crisis_periods: crisis_periods(&[-3.5, -2.0, -1.2]),
            bounds: Vec::new(),
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        Some(score_at_or_below(
            value,
            &[(-10.0, 15.0), (-5.0, 30.0), (0.0, 40.0), (3.0, 55.0), (7.0, 70.0), (12.0, 80.0)],
            90.0,
        ))
    }

    /// A negative factor encodes the deviation directly, in units of volatility,
    /// replacing the baseline instead of scaling it.
    fn apply_crisis(&self, value: f64, factor: f64, volatility: f64) -> f64 {
        if factor < 0.0 {
            factor * volatility
        } else if factor != 1.0 {
            value * factor
        } else {
            value
        }
    }
}
