use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Result, RiskError};
use crate::indicators::credit::HighYieldSpread;
use crate::indicators::psychology::{FearGreedIndex, PutCallRatio};
use crate::indicators::technical::Ma200Deviation;
use crate::indicators::valuation::{BuffettIndicator, ShillerPe};
use crate::indicators::volatility::{Skew, Vix};
use crate::indicators::{BoundKind, IndicatorKey, IndicatorModel, IndicatorSpec};

const MAX_DECIMAL_PLACES: u32 = 10;

/// Strategy object for a key. The key set is closed, so every key has one.
fn model_for(key: IndicatorKey) -> Box<dyn IndicatorModel> {
    match key {
        IndicatorKey::Vix => Box::new(Vix),
        IndicatorKey::Skew => Box::new(Skew),
        IndicatorKey::PutCall => Box::new(PutCallRatio),
        IndicatorKey::HySpread => Box::new(HighYieldSpread),
        IndicatorKey::ShillerPe => Box::new(ShillerPe),
        IndicatorKey::Ma200Deviation => Box::new(Ma200Deviation),
        IndicatorKey::FearGreed => Box::new(FearGreedIndex),
        IndicatorKey::BuffettIndicator => Box::new(BuffettIndicator),
    }
}

// ============================================================================
// REGISTRY STRUCT & IMPL
// ============================================================================

/// Immutable indicator catalog: specs in display order plus their strategies.
/// Built once at startup and passed by reference.
pub struct Registry {
    specs: Vec<IndicatorSpec>,
    index: HashMap<IndicatorKey, usize>,
    models: HashMap<IndicatorKey, Box<dyn IndicatorModel>>,
}

impl Registry {
    /// The eight built-in indicators with their shipped parameters.
    pub fn builtin() -> Self {
        let specs = IndicatorKey::ALL
            .iter()
            .map(|&key| model_for(key).default_spec())
            .collect();
        Self::assemble(specs)
    }

    /// Validate and index a catalog. Malformed configuration fails here,
    /// never later at lookup time.
    pub fn from_specs(specs: Vec<IndicatorSpec>) -> Result<Self> {
        validate(&specs)?;
        Ok(Self::assemble(specs))
    }

    /// Parse a JSON array of indicator specs.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<IndicatorSpec> = serde_json::from_str(json)
            .map_err(|e| RiskError::InvalidConfig(format!("indicator catalog: {}", e)))?;
        Self::from_specs(specs)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&raw)?;
        log::info!(
            "Loaded {} indicators from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    fn assemble(specs: Vec<IndicatorSpec>) -> Self {
        let index = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| (spec.key, idx))
            .collect();
        let models = specs
            .iter()
            .map(|spec| (spec.key, model_for(spec.key)))
            .collect();
        Self { specs, index, models }
    }

    /// All specs in display order.
    pub fn specs(&self) -> &[IndicatorSpec] {
        &self.specs
    }

    pub fn keys(&self) -> impl Iterator<Item = IndicatorKey> + '_ {
        self.specs.iter().map(|s| s.key)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// O(1) lookup by key. Keys absent from this catalog are an error.
    pub fn get(&self, key: IndicatorKey) -> Result<&IndicatorSpec> {
        self.index
            .get(&key)
            .and_then(|&idx| self.specs.get(idx))
            .ok_or_else(|| RiskError::UnknownIndicator(key.slug().to_string()))
    }

    pub fn model(&self, key: IndicatorKey) -> Result<&dyn IndicatorModel> {
        self.models
            .get(&key)
            .map(|m| m.as_ref())
            .ok_or_else(|| RiskError::UnknownIndicator(key.slug().to_string()))
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn invalid(key: IndicatorKey, msg: impl AsRef<str>) -> RiskError {
    RiskError::InvalidConfig(format!("{}: {}", key, msg.as_ref()))
}

fn validate(specs: &[IndicatorSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(RiskError::InvalidConfig("indicator catalog is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for spec in specs {
        let key = spec.key;
        if !seen.insert(key) {
            return Err(invalid(key, "duplicate indicator"));
        }

        let finite = [
            ("threshold", spec.threshold),
            ("baseline", spec.baseline),
            ("volatility", spec.volatility),
            ("trend", spec.trend.unwrap_or(0.0)),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(key, format!("{} must be finite", field)));
            }
        }
        if spec.volatility < 0.0 {
            return Err(invalid(key, "volatility must be non-negative"));
        }
        if spec.decimal_places > MAX_DECIMAL_PLACES {
            return Err(invalid(key, format!("decimal_places above {}", MAX_DECIMAL_PLACES)));
        }

        for period in &spec.crisis_periods {
            if period.start > period.end {
                return Err(invalid(key, format!("crisis period {} starts after it ends", period.start)));
            }
            if !period.factor.is_finite() {
                return Err(invalid(key, "crisis factor must be finite"));
            }
        }
        for (i, a) in spec.crisis_periods.iter().enumerate() {
            for b in &spec.crisis_periods[i + 1..] {
                if a.start <= b.end && b.start <= a.end {
                    log::warn!(
                        "{}: crisis periods {}..{} and {}..{} overlap; the first one wins",
                        key, a.start, a.end, b.start, b.end
                    );
                }
            }
        }

        for bound in &spec.bounds {
            if !(bound.limit.is_finite() && bound.reseed_base.is_finite() && bound.reseed_span.is_finite()) {
                return Err(invalid(key, "bound parameters must be finite"));
            }
            if bound.reseed_span < 0.0 {
                return Err(invalid(key, "bound reseed_span must be non-negative"));
            }
            // The reseed band must itself satisfy the bound.
            let band_ok = match bound.kind {
                BoundKind::Floor => bound.reseed_base >= bound.limit,
                BoundKind::Ceiling => bound.reseed_base + bound.reseed_span <= bound.limit,
            };
            if !band_ok {
                return Err(invalid(key, format!("reseed band violates the {:?} at {}", bound.kind, bound.limit)));
            }
            // Values are rounded after correction; a finer limit could be rounded past.
            if spec.round(bound.limit) != bound.limit {
                return Err(invalid(
                    key,
                    format!("bound {} has more precision than {} decimal places", bound.limit, spec.decimal_places),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_passes_validation() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 8);
        assert!(validate(registry.specs()).is_ok());
        let order: Vec<_> = registry.keys().collect();
        assert_eq!(order, IndicatorKey::ALL.to_vec());
    }

    #[test]
    fn test_subset_catalog_rejects_missing_keys() {
        let vix = Vix.default_spec();
        let registry = Registry::from_specs(vec![vix]).unwrap();
        assert!(registry.get(IndicatorKey::Vix).is_ok());
        assert!(matches!(registry.get(IndicatorKey::Skew), Err(RiskError::UnknownIndicator(_))));
        assert!(registry.model(IndicatorKey::Skew).is_err());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let specs = vec![Vix.default_spec(), Vix.default_spec()];
        assert!(matches!(Registry::from_specs(specs), Err(RiskError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_direction_rejected() {
        let mut value = serde_json::to_value(vec![Vix.default_spec()]).unwrap();
        value[0]["threshold_direction"] = serde_json::json!("sideways");
        let result = Registry::from_json(&value.to_string());
        assert!(matches!(result, Err(RiskError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_catalog() {
        let builtin = Registry::builtin();
        let json = serde_json::to_string(builtin.specs()).unwrap();
        let loaded = Registry::from_json(&json).unwrap();
        assert_eq!(loaded.len(), builtin.len());
        assert_eq!(loaded.get(IndicatorKey::FearGreed).unwrap().bounds.len(), 2);
    }

    #[test]
    fn test_inverted_crisis_period_rejected() {
        let mut spec = Skew.default_spec();
        let first = spec.crisis_periods[0].clone();
        spec.crisis_periods[0].start = first.end;
        spec.crisis_periods[0].end = first.start;
        assert!(matches!(Registry::from_specs(vec![spec]), Err(RiskError::InvalidConfig(_))));
    }

    #[test]
    fn test_floor_band_below_limit_rejected() {
        let mut spec = Vix.default_spec();
        spec.bounds[0].reseed_base = 5.0;
        assert!(Registry::from_specs(vec![spec]).is_err());
    }

    #[test]
    fn test_bound_finer_than_rounding_rejected() {
        use crate::indicators::psychology::PutCallRatio;
        use crate::indicators::BoundCorrection;

        let mut spec = PutCallRatio.default_spec();
        spec.decimal_places = 1;
        spec.bounds = vec![BoundCorrection::floor(0.54, 0.05)];
        // 0.541 would round to 0.5, under the floor.
        assert_eq!(spec.round(0.541), 0.5);
        assert!(matches!(Registry::from_specs(vec![spec.clone()]), Err(RiskError::InvalidConfig(_))));

        spec.bounds = vec![BoundCorrection::floor(0.5, 0.05)];
        assert!(Registry::from_specs(vec![spec]).is_ok());
    }
}
