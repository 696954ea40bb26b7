use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{classify, StatusTier};
use crate::error::Result;
use crate::indicators::registry::Registry;
use crate::indicators::IndicatorKey;

/// Max jitter added to a base score, in points either way.
const JITTER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=25 => SentimentLabel::ExtremeFear,
            26..=45 => SentimentLabel::Fear,
            46..=55 => SentimentLabel::Neutral,
            56..=75 => SentimentLabel::Greed,
            _ => SentimentLabel::ExtremeGreed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::ExtremeFear => "Extreme Fear",
            SentimentLabel::Fear => "Fear",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Greed => "Greed",
            SentimentLabel::ExtremeGreed => "Extreme Greed",
        }
    }
}

/// Base score before jitter: the indicator's own curve, or 25/50/75 by status.
pub fn base_score(registry: &Registry, key: IndicatorKey, value: f64) -> Result<f64> {
    let curve = registry.model(key)?.base_score(value);
    let tier = classify(registry.get(key)?, value);
    Ok(curve_or_status(curve, tier))
}

fn curve_or_status(curve: Option<f64>, tier: StatusTier) -> f64 {
    curve.unwrap_or_else(|| tier.default_score())
}

/// 0-100 fear/greed score for an indicator value.
///
/// Jitter of up to +/-3 points is added on every call, so repeated calls with
/// the same input can differ; pass a seeded RNG for reproducible output.
pub fn score<R: Rng + ?Sized>(
    registry: &Registry,
    key: IndicatorKey,
    value: f64,
    rng: &mut R,
) -> Result<u8> {
    let base = base_score(registry, key, value)?;
    let jitter: f64 = rng.gen_range(-JITTER..JITTER);
    Ok(clamp_score(base + jitter))
}

/// Clamp to [0, 100] and round. NaN maps to 0.
fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_score_bounds_at_extremes() {
        let registry = Registry::builtin();
        let mut rng = StdRng::seed_from_u64(99);
        let extremes = [-1.0e6, -1000.0, -10.0, 0.0, 0.5, 25.0, 150.0, 1000.0, 1.0e6, f64::INFINITY];
        for key in IndicatorKey::ALL {
            for &v in &extremes {
                for _ in 0..20 {
                    let s = score(&registry, key, v, &mut rng).unwrap();
                    assert!(s <= 100, "{} at {} scored {}", key, v, s);
                }
            }
        }
    }

    #[test]
    fn test_score_stays_near_base() {
        let registry = Registry::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            // VIX 32 -> base 20
            let s = score(&registry, IndicatorKey::Vix, 32.0, &mut rng).unwrap() as i32;
            assert!((17..=23).contains(&s));
            // Put/Call 1.0 -> base 50
            let s = score(&registry, IndicatorKey::PutCall, 1.0, &mut rng).unwrap() as i32;
            assert!((47..=53).contains(&s));
        }
    }

    #[test]
    fn test_fear_greed_clamps() {
        let registry = Registry::builtin();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert!(score(&registry, IndicatorKey::FearGreed, 99.0, &mut rng).unwrap() >= 96);
            assert!(score(&registry, IndicatorKey::FearGreed, 1.0, &mut rng).unwrap() <= 4);
        }
        assert_eq!(score(&registry, IndicatorKey::FearGreed, 500.0, &mut rng).unwrap(), 100);
        assert_eq!(score(&registry, IndicatorKey::FearGreed, -500.0, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_missing_curve_falls_back_to_status() {
        assert_eq!(curve_or_status(None, StatusTier::Danger), 25.0);
        assert_eq!(curve_or_status(None, StatusTier::Warning), 50.0);
        assert_eq!(curve_or_status(None, StatusTier::Safe), 75.0);
        assert_eq!(curve_or_status(Some(90.0), StatusTier::Danger), 90.0);
    }

    #[test]
    fn test_nan_scores_zero() {
        assert_eq!(clamp_score(f64::NAN), 0);
        assert_eq!(clamp_score(49.5), 50);
    }

    #[test]
    fn test_labels_bucket() {
        assert_eq!(SentimentLabel::from_score(0), SentimentLabel::ExtremeFear);
        assert_eq!(SentimentLabel::from_score(25), SentimentLabel::ExtremeFear);
        assert_eq!(SentimentLabel::from_score(26), SentimentLabel::Fear);
        assert_eq!(SentimentLabel::from_score(45), SentimentLabel::Fear);
        assert_eq!(SentimentLabel::from_score(55), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(75), SentimentLabel::Greed);
        assert_eq!(SentimentLabel::from_score(76), SentimentLabel::ExtremeGreed);
        assert_eq!(SentimentLabel::ExtremeGreed.label(), "Extreme Greed");
    }
}
