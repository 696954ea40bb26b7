use super::{
    crisis_periods, score_at_or_above, BoundCorrection, IndicatorKey, IndicatorModel,
    IndicatorSpec, ThresholdDirection,
};

/// High Yield OAS over Treasuries. Widening = credit stress.
pub struct HighYieldSpread;

impl IndicatorModel for HighYieldSpread {
    fn key(&self) -> IndicatorKey {
        IndicatorKey::HySpread
    }

    fn default_spec(&self) -> IndicatorSpec {
        IndicatorSpec {
            key: self.key(),
            name: "HY Spread".to_string(),
            full_name: "High Yield Bond Spread".to_string(),
            description: "High yield minus Treasury yield. Widening = rising credit risk".to_string(),
            threshold: 5.0,
            threshold_direction: ThresholdDirection::Above,
            unit: "%".to_string(),
            decimal_places: 2,
            baseline: 3.5,
            volatility: 0.8,
            trend: None,
            crisis_periods: crisis_periods(&[4.5, 2.5, 1.4]),
            bounds: vec![BoundCorrection::floor(2.0, 1.0)],
        }
    }

    fn base_score(&self, value: f64) -> Option<f64> {
        Some(score_at_or_above(
            value,
            &[(7.0, 10.0), (5.0, 25.0), (4.0, 40.0), (3.5, 55.0), (3.0, 70.0)],
            85.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hy_spread_curve() {
        assert_eq!(HighYieldSpread.base_score(9.1), Some(10.0));
        assert_eq!(HighYieldSpread.base_score(5.0), Some(25.0));
        assert_eq!(HighYieldSpread.base_score(3.6), Some(55.0));
        assert_eq!(HighYieldSpread.base_score(2.4), Some(85.0));
    }

    #[test]
    fn test_gfc_widening() {
        let spec = HighYieldSpread.default_spec();
        let date = chrono::NaiveDate::from_ymd_opt(2008, 11, 1).unwrap();
        let factor = spec.crisis_factor(date);
        assert_eq!(factor, 4.5);
        assert!((HighYieldSpread.apply_crisis(spec.baseline, factor, spec.volatility) - 15.75).abs() < 1e-9);
    }
}
