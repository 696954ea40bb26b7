use super::{
    crisis_periods, score_at_or_above, BoundCorrection, IndicatorKey, IndicatorModel,
    IndicatorSpec, ThresholdDirection,
};

// ============================================================================
// VIX: implied volatility of S&P 500 options (Fear)
// ============================================================================
pub struct Vix;

impl IndicatorModel for Vix {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::Vix
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "VIX".to_string(),
            full_name: "VIX - Fear Index".to_string(),
            description: "Expected market volatility. Higher = more investor anxiety".to_string(),
            threshold: 30.0,
            threshold_direction: ThresholdDirection::Above,
            unit: String::new(),
            decimal_places: 2,
            baseline: 15.0,
            volatility: 8.0,
            trend: None,
            crisis_periods: crisis_periods(&[3.5, 4.0, 1.8]),
            bounds: vec![BoundCorrection::floor(10.0, 5.0)],
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        // Higher VIX = more fear
        Some(score_at_or_above(
            value,
            &[(40.0, 10.0), (30.0, 20.0), (25.0, 35.0), (20.0, 50.0), (15.0, 70.0)],
            85.0,
        ))
    }
}

// ============================================================================
// SKEW: priced tail risk
// ============================================================================
pub struct Skew;

impl IndicatorModel for Skew {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::Skew
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "SKEW".to_string(),
            full_name: "SKEW - Tail Risk".to_string(),
            description: "Priced risk of a market crash. 145+ is a warning sign".to_string(),
            threshold: 145.0,
            threshold_direction: ThresholdDirection::Above,
            unit: String::new(),
            decimal_places: 2,
            baseline: 130.0,
            volatility: 8.0,
            trend: None,
            crisis_periods: crisis_periods(&[1.15, 1.18, 1.10]),
            bounds: vec![BoundCorrection::floor(115.0, 10.0)],
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        Some(score_at_or_above(
            value,
            &[(150.0, 15.0), (145.0, 25.0), (140.0, 40.0), (135.0, 55.0), (130.0, 70.0)],
            80.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vix_curve() {
        assert_eq!(Vix.base_score(82.7), Some(10.0));
        assert_eq!(Vix.base_score(30.0), Some(20.0));
        assert_eq!(Vix.base_score(22.0), Some(50.0));
        assert_eq!(Vix.base_score(12.0), Some(85.0));
    }

    #[test]
    fn test_vix_crisis_is_multiplicative() {
        assert_eq!(Vix.apply_crisis(15.0, 4.0, 8.0), 60.0);
        assert_eq!(Vix.apply_crisis(15.0, 1.0, 8.0), 15.0);
    }

    #[test]
    fn test_skew_curve() {
        assert_eq!(Skew.base_score(151.0), Some(15.0));
        assert_eq!(Skew.base_score(137.0), Some(55.0));
        assert_eq!(Skew.base_score(120.0), Some(80.0));
    }
}
