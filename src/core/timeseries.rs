use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{Result, RiskError};
use crate::models::DataPoint;

/// Period used for the week-over-week change (~7 days of weekly data).
pub const WEEK_PERIOD_YEARS: f64 = 0.02;

/// Earliest date kept when looking back `years` from `latest`.
///
/// Short periods (< 1 year) are converted to whole days via `floor(years * 365)`.
/// Longer periods move back to the same month and day of year
/// `trunc(year - years)`, so 5 years from 2025-12-29 is exactly 2020-12-29
/// and 1.5 years from it is 2023-12-29.
pub fn cutoff_date(latest: NaiveDate, years: f64) -> Result<NaiveDate> {
    if !years.is_finite() || years < 0.0 {
        return Err(RiskError::InvalidPeriod(years));
    }

    let cutoff = if years < 1.0 {
        latest.checked_sub_days(Days::new((years * 365.0).floor() as u64))
    } else {
        let target_year = (latest.year() as f64 - years).trunc();
        let whole_years = latest.year() as f64 - target_year;
        if whole_years > (u32::MAX / 12) as f64 {
            None
        } else {
            latest.checked_sub_months(Months::new(whole_years as u32 * 12))
        }
    };

    // Past the calendar's range: keep everything.
    Ok(cutoff.unwrap_or(NaiveDate::MIN))
}

/// All points with `date >= latest - years`, in their original order.
/// An empty series yields an empty slice.
pub fn slice_period(series: &[DataPoint], years: f64) -> Result<&[DataPoint]> {
    if !years.is_finite() || years < 0.0 {
        return Err(RiskError::InvalidPeriod(years));
    }
    let Some(latest) = series.last() else {
        return Ok(series);
    };

    let cutoff = cutoff_date(latest.date, years)?;
    // Series are sorted by date, so the kept points form a suffix.
    let start = series.partition_point(|dp| dp.date < cutoff);
    Ok(&series[start..])
}

/// Percent change across the trailing week. `None` when fewer than two points
/// fall in the window or the reference value is zero.
pub fn week_over_week_change(series: &[DataPoint]) -> Option<f64> {
    let window = slice_period(series, WEEK_PERIOD_YEARS).ok()?;
    if window.len() < 2 {
        return None;
    }

    let old_value = window.first()?.value;
    let new_value = window.last()?.value;
    if old_value == 0.0 {
        return None;
    }
    Some((new_value - old_value) / old_value * 100.0)
}
