//! Moverwatch - daily top gainers and losers across crypto exchanges.
//!
//! Each report cycle fetches 24-hour ticker data from CoinGecko, Binance,
//! and Bybit concurrently, ranks the biggest movers per exchange, renders a
//! console summary and a Telegram HTML message, and writes a JSON snapshot.
//! One exchange failing never prevents the others from being reported.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Observations, rankings, per-exchange results, reports
//! - [`port`] - Traits for exchange clients, notifiers, snapshot stores
//! - [`application`] - Aggregator, reporter, report cycle, scheduler
//! - [`adapter`] - CLI plus HTTP exchange clients, Telegram, JSON files
//! - [`infrastructure`] - Configuration, runtime wiring, shutdown signals
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram delivery via `teloxide`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use moverwatch::infrastructure::bootstrap::{build_cycle, build_notifier_registry, CycleOptions};
//! use moverwatch::infrastructure::config::Config;
//!
//! # async fn example() -> moverwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let notifier = Arc::new(build_notifier_registry(&config, false)?);
//! let options = CycleOptions { notify: false, snapshot: true };
//! let cycle = build_cycle(&config, config.reporter_config()?, notifier, options)?;
//!
//! let outcome = cycle.run().await;
//! println!("{}", outcome.rendered.console);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
