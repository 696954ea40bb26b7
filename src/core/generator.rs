use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};
use rand::Rng;

use crate::error::{Result, RiskError};
use crate::indicators::registry::Registry;
use crate::indicators::{IndicatorModel, IndicatorSpec};
use crate::models::{DataPoint, GenerationWindow, MarketDataset, TimeSeries};

const DAYS_PER_YEAR: f64 = 365.25;
/// Noise amplitude as a share of volatility.
const NOISE_SCALE: f64 = 0.5;

/// Dates from `end_date - window_years` to `end_date` inclusive, every `step_days`.
pub fn window_dates(window: &GenerationWindow) -> Result<Vec<NaiveDate>> {
    if window.step_days == 0 {
        return Err(RiskError::InvalidConfig("step_days must be at least 1".to_string()));
    }
    let start = window
        .end_date
        .checked_sub_months(Months::new(window.window_years.saturating_mul(12)))
        .ok_or_else(|| RiskError::InvalidConfig(format!("window of {} years is out of range", window.window_years)))?;

    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= window.end_date) {
        dates.push(date);
        current = date.checked_add_days(Days::new(window.step_days as u64));
    }
    Ok(dates)
}

/// One synthetic observation: baseline + trend, crisis overlay, noise,
/// bound correction, rounding.
fn synthesize<R: Rng + ?Sized>(
    spec: &IndicatorSpec,
    model: &dyn IndicatorModel,
    date: NaiveDate,
    years_elapsed: f64,
    rng: &mut R,
) -> f64 {
    let mut value = spec.baseline;

    if let Some(trend) = spec.trend {
        value += trend * years_elapsed;
    }

    let crisis_factor = spec.crisis_factor(date);
    value = model.apply_crisis(value, crisis_factor, spec.volatility);

    let noise: f64 = rng.gen_range(-1.0..1.0);
    value += noise * spec.volatility * NOISE_SCALE;

    value = spec.correct_bounds(value, rng);

    spec.round(value)
}

/// Build the full history for every indicator in the registry.
pub fn generate<R: Rng + ?Sized>(
    registry: &Registry,
    window: &GenerationWindow,
    rng: &mut R,
) -> Result<MarketDataset> {
    let dates = window_dates(window)?;
    let Some(&start) = dates.first() else {
        return Err(RiskError::EmptyWindow);
    };

    let models = registry
        .specs()
        .iter()
        .map(|spec| registry.model(spec.key))
        .collect::<Result<Vec<_>>>()?;

    let mut columns: Vec<TimeSeries> = vec![Vec::with_capacity(dates.len()); registry.len()];

    // Date-major so every indicator sees the same step at the same time.
    for &date in &dates {
        let years_elapsed = (date - start).num_days() as f64 / DAYS_PER_YEAR;
        for ((spec, model), column) in registry.specs().iter().zip(&models).zip(columns.iter_mut()) {
            let value = synthesize(spec, *model, date, years_elapsed, rng);
            column.push(DataPoint { date, value });
        }
    }

    let series: BTreeMap<_, _> = registry
        .keys()
        .zip(columns)
        .inspect(|(key, column)| log_series_stats(key.slug(), column))
        .collect();

    log::info!(
        "Generated {} indicators x {} points ({} -> {}, every {} days)",
        series.len(),
        dates.len(),
        start,
        window.end_date,
        window.step_days
    );

    Ok(MarketDataset::new(*window, series))
}

fn log_series_stats(slug: &str, series: &[DataPoint]) {
    if !log::log_enabled!(log::Level::Debug) || series.is_empty() {
        return;
    }
    let min = series.iter().map(|dp| dp.value).fold(f64::INFINITY, f64::min);
    let max = series.iter().map(|dp| dp.value).fold(f64::NEG_INFINITY, f64::max);
    let mean = series.iter().map(|dp| dp.value).sum::<f64>() / series.len() as f64;
    log::debug!("{:<18} min {:>9.2} | max {:>9.2} | mean {:>9.2}", slug, min, max, mean);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorKey;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_window_dates_span_twenty_years() {
        let dates = window_dates(&GenerationWindow::default()).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2005, 12, 29).unwrap());
        // 7305 days / 7 -> 1044 weekly steps including the start
        assert_eq!(dates.len(), 1044);
        assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
        assert!(*dates.last().unwrap() <= NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
    }

    #[test]
    fn test_zero_step_rejected() {
        let window = GenerationWindow { step_days: 0, ..GenerationWindow::default() };
        assert!(matches!(window_dates(&window), Err(RiskError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_year_window_is_single_point() {
        let window = GenerationWindow { window_years: 0, ..GenerationWindow::default() };
        let dataset = generate(&Registry::builtin(), &window, &mut seeded(1)).unwrap();
        assert_eq!(dataset.points_per_series(), 1);
    }

    #[test]
    fn test_same_seed_same_history() {
        let registry = Registry::builtin();
        let window = GenerationWindow::default();
        let a = generate(&registry, &window, &mut seeded(42)).unwrap();
        let b = generate(&registry, &window, &mut seeded(42)).unwrap();
        let c = generate(&registry, &window, &mut seeded(43)).unwrap();
        for key in IndicatorKey::ALL {
            assert_eq!(a.series(key).unwrap(), b.series(key).unwrap());
        }
        assert_ne!(a.series(IndicatorKey::Vix).unwrap(), c.series(IndicatorKey::Vix).unwrap());
    }

    #[test]
    fn test_values_rounded_to_decimal_places() {
        let registry = Registry::builtin();
        let dataset = generate(&registry, &GenerationWindow::default(), &mut seeded(5)).unwrap();
        for spec in registry.specs() {
            for dp in dataset.series(spec.key).unwrap() {
                assert_eq!(spec.round(dp.value), dp.value, "{} not rounded: {}", spec.key, dp.value);
            }
        }
    }

    #[test]
    fn test_ma200_goes_negative_in_gfc() {
        let registry = Registry::builtin();
        let dataset = generate(&registry, &GenerationWindow::default(), &mut seeded(9)).unwrap();
        let gfc_start = NaiveDate::from_ymd_opt(2008, 9, 1).unwrap();
        let gfc_end = NaiveDate::from_ymd_opt(2009, 3, 1).unwrap();
        let crisis: Vec<_> = dataset
            .series(IndicatorKey::Ma200Deviation)
            .unwrap()
            .iter()
            .filter(|dp| dp.date >= gfc_start && dp.date <= gfc_end)
            .collect();
        assert!(!crisis.is_empty());
        // -3.5 * 5 = -17.5, noise is at most +/- 2.5
        assert!(crisis.iter().all(|dp| dp.value <= -15.0 && dp.value >= -20.0));
    }

    #[test]
    fn test_trend_lifts_buffett_over_time() {
        let registry = Registry::builtin();
        let dataset = generate(&registry, &GenerationWindow::default(), &mut seeded(3)).unwrap();
        let series = dataset.series(IndicatorKey::BuffettIndicator).unwrap();
        let mean = |pts: &[DataPoint]| pts.iter().map(|dp| dp.value).sum::<f64>() / pts.len() as f64;
        // Trend adds ~16 points over 20 years; compare first and last two years.
        let head = mean(&series[..104]);
        let tail = mean(&series[series.len() - 104..]);
        assert!(tail > head + 8.0, "head {head:.1} tail {tail:.1}");
    }
}
