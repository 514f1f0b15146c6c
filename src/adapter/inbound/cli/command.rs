//! Command-line interface definitions.
//!
//! Defines the CLI structure for moverwatch using `clap`. Subcommands run a
//! single report cycle, run the daily scheduler, inspect saved snapshots,
//! check Telegram delivery, and manage configuration.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use super::paths;

/// Daily crypto top gainers and losers report
#[derive(Parser, Debug)]
#[command(name = "moverwatch")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, report, and deliver once
    Run(RunArgs),

    /// Run the daily report until interrupted
    Schedule(ScheduleArgs),

    /// Summarize the most recent snapshot
    Stats(StatsArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Commands {
    /// Configuration file the command reads, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> {
        match self {
            Self::Run(args) => Some(args.config.path()),
            Self::Schedule(args) => Some(args.config.path()),
            Self::Check(CheckCommand::Telegram(arg))
            | Self::Config(ConfigCommand::Show(arg) | ConfigCommand::Validate(arg)) => {
                Some(arg.path())
            }
            Self::Stats(_) => None,
        }
    }
}

/// Subcommands for `moverwatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Send a test message to the configured Telegram chat.
    Telegram(ConfigPathArg),
}

/// Subcommands for `moverwatch config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared configuration path argument.
///
/// Without `--config` the default location is used, and a missing file there
/// means built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigPathArg {
    /// Path to the configuration file [default: ~/.moverwatch/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigPathArg {
    /// Path to read, falling back to the default location.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(paths::default_config)
    }

    /// Whether the path was given on the command line.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.config.is_some()
    }
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Do not send the report to notifiers
    #[arg(long)]
    pub no_notify: bool,

    /// Do not write a snapshot file
    #[arg(long)]
    pub no_snapshot: bool,
}

/// Arguments for the `schedule` subcommand.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Daily trigger time in local time (HH:MM), overriding the config
    #[arg(long, value_name = "HH:MM")]
    pub at: Option<String>,

    /// Wait for the first trigger instead of reporting immediately
    #[arg(long)]
    pub skip_initial: bool,
}

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Directory containing snapshot files
    #[arg(long, default_value_os_t = paths::default_snapshot_dir())]
    pub dir: PathBuf,
}

impl StatsArgs {
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
