use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorSpec, ThresholdDirection};

/// Band below (or above, for `Below` indicators) the threshold that counts as warning.
const ABOVE_WARNING_RATIO: f64 = 0.85;
const BELOW_WARNING_RATIO: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Safe,
    Warning,
    Danger,
}

impl StatusTier {
    /// Badge text shown next to the value.
    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::Safe => "Safe",
            StatusTier::Warning => "Caution",
            StatusTier::Danger => "Warning",
        }
    }

    /// Fallback sentiment for indicators without a bespoke curve.
    pub fn default_score(&self) -> f64 {
        match self {
            StatusTier::Danger => 25.0,
            StatusTier::Warning => 50.0,
            StatusTier::Safe => 75.0,
        }
    }
}

/// Three-way partition around the threshold. The threshold itself is Danger
/// in both directions.
pub fn classify(spec: &IndicatorSpec, value: f64) -> StatusTier {
    let threshold = spec.threshold;
    match spec.threshold_direction {
        ThresholdDirection::Above => {
            if value >= threshold {
                StatusTier::Danger
            } else if value >= threshold * ABOVE_WARNING_RATIO {
                StatusTier::Warning
            } else {
                StatusTier::Safe
            }
        }
        ThresholdDirection::Below => {
            if value <= threshold {
                StatusTier::Danger
            } else if value <= threshold * BELOW_WARNING_RATIO {
                StatusTier::Warning
            } else {
                StatusTier::Safe
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::registry::Registry;
    use crate::indicators::IndicatorKey;

    fn spec(key: IndicatorKey) -> IndicatorSpec {
        Registry::builtin().get(key).unwrap().clone()
    }

    #[test]
    fn test_vix_scenario() {
        let vix = spec(IndicatorKey::Vix);
        assert_eq!(classify(&vix, 32.0), StatusTier::Danger);
        assert_eq!(classify(&vix, 30.0), StatusTier::Danger);
        assert_eq!(classify(&vix, 26.0), StatusTier::Warning);
        assert_eq!(classify(&vix, 25.5), StatusTier::Warning);
        assert_eq!(classify(&vix, 20.0), StatusTier::Safe);
    }

    #[test]
    fn test_put_call_scenario() {
        let pc = spec(IndicatorKey::PutCall);
        assert_eq!(classify(&pc, 0.65), StatusTier::Danger);
        assert_eq!(classify(&pc, 0.7), StatusTier::Danger);
        assert_eq!(classify(&pc, 0.8), StatusTier::Warning);
        assert_eq!(classify(&pc, 1.0), StatusTier::Safe);
    }

    #[test]
    fn test_zero_threshold_has_no_warning_band() {
        let ma = spec(IndicatorKey::Ma200Deviation);
        assert_eq!(classify(&ma, 0.0), StatusTier::Danger);
        assert_eq!(classify(&ma, -4.0), StatusTier::Danger);
        assert_eq!(classify(&ma, 0.01), StatusTier::Safe);
    }

    #[test]
    fn test_partition_sweep() {
        let registry = Registry::builtin();
        for spec in registry.specs() {
            let t = spec.threshold;
            let mut v = -1000.0;
            while v <= 1000.0 {
                let tier = classify(spec, v);
                let expected = match spec.threshold_direction {
                    ThresholdDirection::Above if v >= t => StatusTier::Danger,
                    ThresholdDirection::Above if v >= t * 0.85 => StatusTier::Warning,
                    ThresholdDirection::Below if v <= t => StatusTier::Danger,
                    ThresholdDirection::Below if v <= t * 1.2 => StatusTier::Warning,
                    _ => StatusTier::Safe,
                };
                assert_eq!(tier, expected, "{} at {}", spec.key, v);
                v += 0.25;
            }
            assert_eq!(classify(spec, t), StatusTier::Danger);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(StatusTier::Safe.label(), "Safe");
        assert_eq!(StatusTier::Warning.label(), "Caution");
        assert_eq!(StatusTier::Danger.label(), "Warning");
    }

    #[test]
    fn test_default_scores() {
        assert_eq!(StatusTier::Danger.default_score(), 25.0);
        assert_eq!(StatusTier::Warning.default_score(), 50.0);
        assert_eq!(StatusTier::Safe.default_score(), 75.0);
    }
}
