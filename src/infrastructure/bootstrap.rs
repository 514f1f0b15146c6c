//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use chrono::NaiveTime;
use tracing::info;

use crate::adapter::outbound::exchange::build_clients;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::snapshot::JsonSnapshotStore;
use crate::application::{
    Aggregator, DailyTrigger, ReportCycle, Reporter, ReporterConfig, Scheduler,
};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, NotifierRegistry};

/// Which side effects a cycle performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOptions {
    /// Send reports and alerts to configured notifiers.
    pub notify: bool,
    /// Write a JSON snapshot per cycle.
    pub snapshot: bool,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            notify: true,
            snapshot: true,
        }
    }
}

/// Build notifier registry from configuration.
///
/// Always includes the log notifier; adds Telegram when enabled.
#[cfg(feature = "telegram")]
pub fn build_notifier_registry(config: &Config, notify: bool) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if notify && config.telegram.enabled {
        let tg_config = TelegramConfig::from_env()?;
        registry.register(Box::new(TelegramNotifier::new(tg_config)));
        info!("Telegram notifier enabled");
    }

    Ok(registry)
}

/// Build notifier registry from configuration (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub fn build_notifier_registry(_config: &Config, _notify: bool) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    Ok(registry)
}

/// Register a client for every enabled exchange.
pub fn build_aggregator(config: &Config) -> Result<Aggregator> {
    let mut aggregator = Aggregator::new();
    for client in build_clients(&config.exchanges, &config.http, config.report.gainer_limit)? {
        aggregator.register(client)?;
    }
    info!(exchanges = ?aggregator.exchanges(), "Exchange clients ready");
    Ok(aggregator)
}

/// Wire a report cycle.
pub fn build_cycle(
    config: &Config,
    reporter: ReporterConfig,
    notifier: Arc<NotifierRegistry>,
    options: CycleOptions,
) -> Result<ReportCycle> {
    let cycle = ReportCycle::new(build_aggregator(config)?, Reporter::new(reporter), notifier);
    if options.snapshot {
        let store = JsonSnapshotStore::new(&config.report.snapshot_dir);
        info!(dir = %store.dir().display(), "Snapshots enabled");
        Ok(cycle.with_store(Arc::new(store)))
    } else {
        Ok(cycle)
    }
}

/// Wire the daily scheduler.
///
/// `run_at` overrides the configured trigger time.
pub fn build_scheduler(
    config: &Config,
    run_at: Option<NaiveTime>,
    run_on_start: bool,
    options: CycleOptions,
) -> Result<Scheduler> {
    let run_at = match run_at {
        Some(at) => at,
        None => config.run_at()?,
    };
    let reporter = ReporterConfig {
        display_limit: config.report.display_limit,
        next_run: run_at,
    };
    let notifier = Arc::new(build_notifier_registry(config, options.notify)?);
    let cycle = build_cycle(config, reporter, Arc::clone(&notifier), options)?;

    Ok(Scheduler::new(
        cycle,
        Box::new(DailyTrigger::new(run_at)),
        notifier,
        run_on_start,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::parse_toml("[telegram]\nenabled = false\n[exchanges.bybit]\nenabled = false")
            .unwrap()
    }

    #[test]
    fn aggregator_registers_enabled_exchanges() {
        let aggregator = build_aggregator(&config()).unwrap();
        assert_eq!(aggregator.len(), 2);
    }

    #[test]
    fn registry_without_telegram_only_logs() {
        let registry = build_notifier_registry(&config(), true).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn scheduler_builds_with_override() {
        let at = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        let scheduler = build_scheduler(&config(), Some(at), false, CycleOptions::default());
        assert!(scheduler.is_ok());
    }
}
