use anyhow::{Context, Result};
use market_risk_lib::config::DashboardConfig;
use market_risk_lib::Dashboard;

fn init_logging() {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("market_risk_lib"), log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let json = std::env::args().any(|arg| arg == "--json")
        || std::env::var("RISK_DASHBOARD_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let config = DashboardConfig::from_env().context("Failed to read dashboard configuration")?;
    let dashboard = Dashboard::from_config(&config).context("Failed to build dashboard")?;
    let assessment = dashboard.current_assessment()?;
    let rows = dashboard.overview();

    if json {
        let payload = serde_json::json!({
            "end_date": config.window.end_date,
            "indicators": rows,
            "assessment": assessment,
            "alerts": dashboard.danger_alerts(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if let Some(message) = dashboard.alert_message() {
        println!("⚠️  {}\n", message);
    }

    println!(
        "{:<20} | {:>10} | {:>9} | {:<16} | {:<8}",
        "Indicator", "Value", "1W Chg", "Threshold", "Status"
    );
    println!("{}", "-".repeat(76));

    for row in &rows {
        let change = match dashboard.week_over_week_change(row.key)? {
            Some(pct) => format!("{:+.2}%", pct),
            None => "-".to_string(),
        };
        println!(
            "{:<20} | {:>10} | {:>9} | {:<16} | {:<8}",
            row.name, row.formatted_value, change, row.threshold_text, row.status_label
        );
    }

    println!(
        "\nOverall risk: {}  (danger {} / caution {} / safe {})",
        assessment.risk_label, assessment.danger_count, assessment.warning_count, assessment.safe_count
    );
    println!("{}", assessment.comment);
    Ok(())
}
