use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Result, RiskError};
use crate::indicators::registry::Registry;
use crate::models::GenerationWindow;

pub const ENV_END_DATE: &str = "RISK_DASHBOARD_END_DATE";
pub const ENV_WINDOW_YEARS: &str = "RISK_DASHBOARD_WINDOW_YEARS";
pub const ENV_STEP_DAYS: &str = "RISK_DASHBOARD_STEP_DAYS";
pub const ENV_SEED: &str = "RISK_DASHBOARD_SEED";
pub const ENV_PERIOD_YEARS: &str = "RISK_DASHBOARD_PERIOD_YEARS";
pub const ENV_INDICATORS: &str = "RISK_DASHBOARD_INDICATORS";

/// Chart period shown when none is picked.
pub const DEFAULT_PERIOD_YEARS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub window: GenerationWindow,
    /// `None` draws from OS entropy, so every run differs.
    pub seed: Option<u64>,
    pub period_years: f64,
    /// JSON catalog replacing the built-in indicators.
    pub indicators_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window: GenerationWindow::default(),
            seed: None,
            period_years: DEFAULT_PERIOD_YEARS,
            indicators_path: None,
        }
    }
}

impl DashboardConfig {
    /// Load `.env` (if any) and read `RISK_DASHBOARD_*` variables.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Build from any name -> value source. Unset names keep their defaults;
    /// set but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let end_date = match lookup(ENV_END_DATE) {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| RiskError::InvalidConfig(format!("{ENV_END_DATE}={raw:?}: {e}")))?,
            None => defaults.window.end_date,
        };
        let window_years = parse_var(&lookup, ENV_WINDOW_YEARS)?.unwrap_or(defaults.window.window_years);
        let step_days: u32 = parse_var(&lookup, ENV_STEP_DAYS)?.unwrap_or(defaults.window.step_days);
        if step_days == 0 {
            return Err(RiskError::InvalidConfig(format!("{ENV_STEP_DAYS} must be at least 1")));
        }

        let seed = parse_var(&lookup, ENV_SEED)?;
        let period_years: f64 = parse_var(&lookup, ENV_PERIOD_YEARS)?.unwrap_or(defaults.period_years);
        if !period_years.is_finite() || period_years < 0.0 {
            return Err(RiskError::InvalidConfig(format!("{ENV_PERIOD_YEARS} must be a non-negative number")));
        }

        let indicators_path = lookup(ENV_INDICATORS)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            window: GenerationWindow { end_date, window_years, step_days },
            seed,
            period_years,
            indicators_path,
        })
    }

    pub fn generation_window(&self) -> GenerationWindow {
        self.window
    }

    /// Seeded when a seed is configured, otherwise from entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// The configured catalog, or the built-ins when no path is set.
    pub fn registry(&self) -> Result<Registry> {
        match &self.indicators_path {
            Some(path) => Registry::load(path),
            None => Ok(Registry::builtin()),
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| RiskError::InvalidConfig(format!("{name}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.generation_window().window_years, 20);
        assert_eq!(config.period_years, 5.0);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_END_DATE, "2024-06-30"),
            (ENV_WINDOW_YEARS, "3"),
            (ENV_STEP_DAYS, " 1 "),
            (ENV_SEED, "42"),
            (ENV_PERIOD_YEARS, "0.25"),
            (ENV_INDICATORS, "catalog.json"),
        ]))
        .unwrap();
        assert_eq!(config.window.end_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(config.window.window_years, 3);
        assert_eq!(config.window.step_days, 1);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.period_years, 0.25);
        assert_eq!(config.indicators_path, Some(PathBuf::from("catalog.json")));
    }

    #[test]
    fn test_bad_values_rejected() {
        for (name, value) in [
            (ENV_END_DATE, "29/12/2025"),
            (ENV_WINDOW_YEARS, "-2"),
            (ENV_STEP_DAYS, "0"),
            (ENV_SEED, "abc"),
            (ENV_PERIOD_YEARS, "-1"),
        ] {
            let result = DashboardConfig::from_lookup(lookup_from(&[(name, value)]));
            assert!(matches!(result, Err(RiskError::InvalidConfig(_))), "{name}={value}");
        }
    }

    #[test]
    fn test_seeded_rng_repeats() {
        use rand::Rng;
        let config = DashboardConfig { seed: Some(7), ..DashboardConfig::default() };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_catalog_is_io_error() {
        let config = DashboardConfig {
            indicators_path: Some(PathBuf::from("/nonexistent/indicators.json")),
            ..DashboardConfig::default()
        };
        assert!(matches!(config.registry(), Err(RiskError::Io(_))));
    }
}
