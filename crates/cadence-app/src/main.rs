use anyhow::{Context, bail};
use cadence_core::config::load_config;
use cadence_rule::rule::{ParserDefaults, RuleParser, expand_series};
use chrono::NaiveDate;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

const USAGE: &str = "usage: cadence <anchor YYYY-MM-DD> <rule>";

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let mut args = std::env::args().skip(1);
    let (Some(anchor), Some(rule)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let anchor = NaiveDate::parse_from_str(&anchor, "%Y-%m-%d")
        .with_context(|| format!("invalid anchor date {anchor:?}"))?;

    let parser = RuleParser::new(ParserDefaults::from(&config.recurrence));
    let Some(summary) = parser.summarize(Some(rule.as_str())) else {
        println!("No recurrence");
        return Ok(());
    };
    println!("{summary}");

    let series = expand_series(&rule, anchor, config.recurrence.expansion_limit)?;
    for date in &series.dates {
        println!("  {date}");
    }
    if series.truncated {
        println!("  ... (first {} shown)", series.dates.len());
    }

    Ok(())
}
