use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::classifier::{classify, StatusTier};
use crate::error::Result;
use crate::indicators::registry::Registry;
use crate::indicators::IndicatorKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
    ExtremelyHigh,
}

impl RiskLevel {
    /// First matching rule wins.
    pub fn from_counts(danger: usize, warning: usize) -> Self {
        if danger >= 4 {
            RiskLevel::ExtremelyHigh
        } else if danger >= 2 {
            RiskLevel::High
        } else if danger == 1 || warning >= 3 {
            RiskLevel::Elevated
        } else if warning >= 1 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::ExtremelyHigh => "Extremely High",
            RiskLevel::High => "High",
            RiskLevel::Elevated => "Elevated",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Low => "Low",
        }
    }

    pub fn comment(&self) -> &'static str {
        match self {
            RiskLevel::ExtremelyHigh => "Several indicators have reached danger levels. The market carries serious risk and the odds of a sharp correction or crash are rising. Review the portfolio and move to defensive positioning.",
            RiskLevel::High => "Multiple warning lights are on. Market instability is increasing and a careful response is needed. Consider cutting risk-asset exposure and raising cash.",
            RiskLevel::Elevated => "Some indicators show concern. The outlook is getting murkier and vigilance is warranted. Consider adjusting position sizes or adding hedges.",
            RiskLevel::Moderate => "A few indicators need attention. The market is broadly stable but there are some concerns. Keep monitoring and invest with care.",
            RiskLevel::Low => "Indicators look healthy overall. The market is relatively stable with no major risk in sight. Markets always move, so keep checking regularly.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallAssessment {
    pub danger_count: usize,
    pub warning_count: usize,
    pub safe_count: usize,
    pub risk_level: RiskLevel,
    pub risk_label: String,
    pub comment: String,
}

/// Count tiers across the current values and pick a risk level.
/// Every key must be in the registry.
pub fn assess_overall(registry: &Registry, current: &BTreeMap<IndicatorKey, f64>) -> Result<OverallAssessment> {
    let mut danger_count = 0;
    let mut warning_count = 0;
    let mut safe_count = 0;

    for (&key, &value) in current {
        match classify(registry.get(key)?, value) {
            StatusTier::Danger => danger_count += 1,
            StatusTier::Warning => warning_count += 1,
            StatusTier::Safe => safe_count += 1,
        }
    }

    let risk_level = RiskLevel::from_counts(danger_count, warning_count);
    log::debug!(
        "Assessment: {} danger / {} warning / {} safe -> {}",
        danger_count,
        warning_count,
        safe_count,
        risk_level.label()
    );

    Ok(OverallAssessment {
        danger_count,
        warning_count,
        safe_count,
        risk_level,
        risk_label: risk_level.label().to_string(),
        comment: risk_level.comment().to_string(),
    })
}

/// One row of the indicator table.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorRow {
    pub key: IndicatorKey,
    pub name: String,
    pub description: String,
    pub value: f64,
    pub formatted_value: String,
    pub threshold_text: String,
    pub status: StatusTier,
    pub status_label: String,
}

/// Table rows in registry order. Indicators without a current value are skipped.
pub fn overview(registry: &Registry, current: &BTreeMap<IndicatorKey, f64>) -> Vec<IndicatorRow> {
    registry
        .specs()
        .iter()
        .filter_map(|spec| {
            let value = *current.get(&spec.key)?;
            let status = classify(spec, value);
            Some(IndicatorRow {
                key: spec.key,
                name: spec.name.clone(),
                description: spec.description.clone(),
                value,
                formatted_value: spec.format_value(value),
                threshold_text: spec.threshold_text(),
                status,
                status_label: status.label().to_string(),
            })
        })
        .collect()
}

/// Names of indicators currently in Danger, in registry order.
pub fn danger_alerts(registry: &Registry, current: &BTreeMap<IndicatorKey, f64>) -> Vec<String> {
    registry
        .specs()
        .iter()
        .filter(|spec| {
            current
                .get(&spec.key)
                .is_some_and(|&value| classify(spec, value) == StatusTier::Danger)
        })
        .map(|spec| spec.name.clone())
        .collect()
}

/// Banner text, or `None` when nothing is in Danger.
pub fn alert_message(alerts: &[String]) -> Option<String> {
    if alerts.is_empty() {
        return None;
    }
    Some(format!("Warning: the following indicators crossed their thresholds - {}", alerts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(IndicatorKey, f64)]) -> BTreeMap<IndicatorKey, f64> {
        pairs.iter().copied().collect()
    }

    /// Every indicator comfortably in Safe.
    fn calm_market() -> BTreeMap<IndicatorKey, f64> {
        values(&[
            (IndicatorKey::Vix, 14.0),
            (IndicatorKey::Skew, 120.0),
            (IndicatorKey::PutCall, 1.0),
            (IndicatorKey::HySpread, 3.0),
            (IndicatorKey::ShillerPe, 20.0),
            (IndicatorKey::Ma200Deviation, 4.0),
            (IndicatorKey::FearGreed, 50.0),
            (IndicatorKey::BuffettIndicator, 100.0),
        ])
    }

    #[test]
    fn test_level_rules() {
        assert_eq!(RiskLevel::from_counts(4, 0), RiskLevel::ExtremelyHigh);
        assert_eq!(RiskLevel::from_counts(2, 5), RiskLevel::High);
        assert_eq!(RiskLevel::from_counts(1, 0), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_counts(0, 3), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_counts(0, 2), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_counts(0, 0), RiskLevel::Low);
    }

    #[test]
    fn test_calm_market_is_low() {
        let registry = Registry::builtin();
        let result = assess_overall(&registry, &calm_market()).unwrap();
        assert_eq!(result.safe_count, 8);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.comment, RiskLevel::Low.comment());
    }

    #[test]
    fn test_four_dangers_is_extreme() {
        let registry = Registry::builtin();
        let mut current = calm_market();
        current.insert(IndicatorKey::Vix, 35.0);
        current.insert(IndicatorKey::Skew, 150.0);
        current.insert(IndicatorKey::PutCall, 0.6);
        current.insert(IndicatorKey::Ma200Deviation, -5.0);

        let result = assess_overall(&registry, &current).unwrap();
        assert_eq!(result.danger_count, 4);
        assert_eq!(result.risk_level, RiskLevel::ExtremelyHigh);
        assert_eq!(result.danger_count + result.warning_count + result.safe_count, 8);

        let alerts = danger_alerts(&registry, &current);
        assert_eq!(alerts, vec!["VIX", "SKEW", "Put/Call Ratio", "200D MA Deviation"]);
        assert!(alert_message(&alerts).unwrap().ends_with("VIX, SKEW, Put/Call Ratio, 200D MA Deviation"));
    }

    #[test]
    fn test_empty_values() {
        let registry = Registry::builtin();
        let result = assess_overall(&registry, &BTreeMap::new()).unwrap();
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(danger_alerts(&registry, &BTreeMap::new()).is_empty());
        assert_eq!(alert_message(&[]), None);
    }

    #[test]
    fn test_overview_rows_follow_registry_order() {
        let registry = Registry::builtin();
        let rows = overview(&registry, &calm_market());
        assert_eq!(rows.len(), 8);
        assert_eq!(rows.iter().map(|r| r.key).collect::<Vec<_>>(), IndicatorKey::ALL.to_vec());

        let vix = &rows[0];
        assert_eq!(vix.formatted_value, "14.00");
        assert_eq!(vix.threshold_text, "30 or above");
        assert_eq!(vix.status_label, "Safe");
    }
}
