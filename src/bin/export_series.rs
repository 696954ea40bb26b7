use anyhow::{bail, Context, Result};
use market_risk_lib::config::DashboardConfig;
use market_risk_lib::indicators::IndicatorKey;
use market_risk_lib::Dashboard;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let Some(slug) = args.next() else {
        bail!("usage: export_series <indicator> [years]");
    };
    let key: IndicatorKey = slug.parse()?;

    let config = DashboardConfig::from_env().context("Failed to read dashboard configuration")?;
    let years = match args.next() {
        Some(raw) => raw.parse::<f64>().with_context(|| format!("Invalid years: {raw}"))?,
        None => config.period_years,
    };

    let dashboard = Dashboard::from_config(&config).context("Failed to build dashboard")?;
    let series = dashboard.series(key, years)?;
    let spec = dashboard.registry().get(key)?;

    let payload = serde_json::json!({
        "key": key,
        "name": spec.name,
        "unit": spec.unit,
        "years": years,
        "points": series,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
