//! Handler for the `config` command group.

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::dispatch::load_config;
use crate::adapter::inbound::cli::output;
use crate::domain::ExchangeId;
use crate::error::Result;
use crate::infrastructure::config::Config;

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

fn api_key_state(key: Option<&String>) -> &'static str {
    if key.is_some() {
        "set"
    } else {
        "not set"
    }
}

fn source_label(arg: &ConfigPathArg) -> String {
    let path = arg.path();
    if !arg.is_explicit() && !path.exists() {
        format!("{} (not found, using defaults)", path.display())
    } else {
        path.display().to_string()
    }
}

/// Execute `config show`.
pub fn execute_show(arg: &ConfigPathArg) -> Result<()> {
    let config = load_config(arg)?;
    let run_at = config.run_at()?;

    output::section("Effective Configuration");
    output::field("Source", source_label(arg));

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    if let Some(path) = &config.logging.file {
        output::field("File", path.display());
    }

    output::section("Schedule");
    output::field("Daily at", run_at.format("%H:%M"));
    output::field("Run on start", config.schedule.run_on_start);

    output::section("Report");
    output::field("Gainer limit", config.report.gainer_limit);
    output::field("Display limit", config.report.display_limit);
    output::field("Snapshot dir", config.report.snapshot_dir.display());

    output::section("HTTP");
    output::field("Timeout", format!("{}s", config.http.timeout_secs));
    output::field(
        "Connect timeout",
        format!("{}s", config.http.connect_timeout_secs),
    );
    output::field("User agent", &config.http.user_agent);

    output::section("Exchanges");
    print_exchanges(&config);

    output::section("Notifications");
    output::field("Telegram", enabled(config.telegram.enabled));

    Ok(())
}

fn print_exchanges(config: &Config) {
    let exchanges = &config.exchanges;
    for id in ExchangeId::ALL {
        let key = match id {
            ExchangeId::CoinGecko => exchanges.coingecko.api_key.as_ref(),
            ExchangeId::Binance => exchanges.binance.api_key.as_ref(),
            ExchangeId::Bybit => exchanges.bybit.api_key.as_ref(),
        };
        let url = exchanges.base_url(id);
        if exchanges.is_enabled(id) {
            output::field(
                id.display_name(),
                format!("{url} (API key {})", api_key_state(key)),
            );
        } else {
            output::field(id.display_name(), enabled(false));
        }
    }
}

/// Execute `config validate`.
pub fn execute_validate(arg: &ConfigPathArg) -> Result<()> {
    let config = load_config(arg)?;
    let exchanges: Vec<&str> = config
        .exchanges
        .enabled()
        .into_iter()
        .map(ExchangeId::as_str)
        .collect();

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": arg.path().display().to_string(),
            "valid": true,
            "exchanges": exchanges,
            "telegram": config.telegram.enabled,
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", source_label(arg));
    output::field("Exchanges", exchanges.join(", "));
    output::field("Telegram", enabled(config.telegram.enabled));
    output::success("Configuration is valid");
    Ok(())
}
