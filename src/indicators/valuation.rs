use super::{
    crisis_periods, score_at_or_above, BoundCorrection, IndicatorKey, IndicatorModel,
    IndicatorSpec, ThresholdDirection,
};

// ============================================================================
// Shiller P/E (CAPE): cyclically adjusted valuation
// ============================================================================
pub struct ShillerPe;

impl IndicatorModel for ShillerPe {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::ShillerPe
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "Shiller P/E".to_string(),
            full_name: "Shiller P/E - Valuation".to_string(),
            description: "Cyclically adjusted P/E ratio (CAPE). 30+ = stocks expensive".to_string(),
            threshold: 30.0,
            threshold_direction: ThresholdDirection::Above,
            unit: String::new(),
            decimal_places: 2,
            baseline: 25.0,
            volatility: 3.0,
            trend: Some(0.15),
            crisis_periods: crisis_periods(&[0.6, 0.75]),
            bounds: vec![BoundCorrection::floor(15.0, 5.0)],
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        // Expensive = greed, cheap = fear
        Some(score_at_or_above(
            value,
            &[(35.0, 95.0), (30.0, 85.0), (27.0, 75.0), (24.0, 60.0), (20.0, 50.0), (18.0, 40.0)],
            25.0,
        ))
    }

    // Crisis factors < 1 compress the multiple; the default multiplicative
    // overlay already does that.
}

// ============================================================================
// Buffett Indicator: total market cap / GDP
// ============================================================================
pub struct BuffettIndicator;

impl IndicatorModel for BuffettIndicator {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::BuffettIndicator
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "Buffett Indicator".to_string(),
            full_name: "Buffett Indicator (Market Cap / GDP)".to_string(),
            description: "Market Cap to GDP Ratio. >100% = overvalued, 150%+ = warning".to_string(),
            threshold: 150.0,
            threshold_direction: ThresholdDirection::Above,
            unit: "%".to_string(),
            decimal_places: 1,
            baseline: 100.0,
            volatility: 10.0,
            trend: Some(0.8),
            crisis_periods: crisis_periods(&[0.65, 0.80]),
            bounds: vec![BoundCorrection::floor(50.0, 20.0)],
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        Some(score_at_or_above(
            value,
            &[(180.0, 95.0), (150.0, 85.0), (130.0, 75.0), (110.0, 60.0), (100.0, 50.0), (80.0, 40.0)],
            25.0,
        ))
    }
}
