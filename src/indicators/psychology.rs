use super::{
    crisis_periods, score_at_or_below, BoundCorrection, IndicatorKey, IndicatorModel,
    IndicatorSpec, ThresholdDirection,
};

// ============================================================================
// Put/Call Ratio: options positioning (Sentiment)
// ============================================================================
pub struct PutCallRatio;

impl IndicatorModel for PutCallRatio {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::PutCall
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "Put/Call Ratio".to_string(),
            full_name: "Put/Call Ratio - Market Sentiment".to_string(),
            description: "Puts traded per call. 0.7 or below = market too optimistic".to_string(),
            threshold: 0.7,
            threshold_direction: ThresholdDirection::Below,
            unit: String::new(),
            decimal_places: 2,
            baseline: 1.0,
            volatility: 0.2,
            trend: None,
            crisis_periods: crisis_periods(&[1.5, 1.8, 1.3]),
            bounds: vec![BoundCorrection::floor(0.5, 0.2)],
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        // Low ratio = complacency (greed), high ratio = fear
        Some(score_at_or_below(
            value,
            &[(0.6, 90.0), (0.7, 80.0), (0.9, 65.0), (1.1, 50.0), (1.3, 35.0)],
            20.0,
        ))
    }
}

// ============================================================================
// Fear & Greed Index: composite 0-100 sentiment
// ============================================================================
pub struct FearGreedIndex;

impl IndicatorModel for FearGreedIndex {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::FearGreed
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "Fear & Greed".to_string(),
            full_name: "Fear & Greed Index".to_string(),
            description: "Composite sentiment score 0-100. Lower = fear, higher = greed".to_string(),
            threshold: 25.0,
            threshold_direction: ThresholdDirection::Below,
            unit: String::new(),
            decimal_places: 0,
            baseline: 50.0,
            volatility: 15.0,
            trend: None,
            crisis_periods: crisis_periods(&[0.3, 0.25, 0.6]),
            bounds: vec![
                BoundCorrection::floor(5.0, 10.0),
                BoundCorrection::ceiling(95.0, 85.0, 10.0),
            ],
        }
    }

    /// Already a sentiment score.
    fn base_score(&self, value: f64) -> Option<f64> {
        Some(value)
    }
}
