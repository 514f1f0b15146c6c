//! Command dispatch and shared config loading.

use super::command::{CheckCommand, Cli, Commands, ConfigCommand, ConfigPathArg};
use super::{check, config, output, run, schedule, stats};

use tracing_appender::non_blocking::WorkerGuard;

use crate::error::Result;
use crate::infrastructure::config::Config;

/// Load the configuration a command points at.
///
/// A missing file at the default location yields built-in defaults; a
/// missing file given with `--config` is an error.
pub fn load_config(arg: &ConfigPathArg) -> Result<Config> {
    Config::load_or_default(arg.path(), arg.is_explicit())
}

/// Load the configuration and install the tracing subscriber, letting
/// `-q` / `-v` override the configured level.
///
/// The guard flushes the log file on drop, so callers hold it for the whole
/// command.
fn load_with_logging(
    arg: &ConfigPathArg,
    settings: output::OutputConfig,
) -> Result<(Config, Option<WorkerGuard>)> {
    let config = load_config(arg)?;
    let guard = match settings.log_level() {
        Some(level) => config.logging.with_level(level).init()?,
        None => config.init_logging()?,
    };
    Ok((config, guard))
}

/// Run the parsed command line.
pub async fn dispatch(cli: &Cli) -> Result<()> {
    let settings = output::OutputConfig::new(cli.json, cli.quiet, cli.verbose);
    output::configure(settings, &cli.color);

    match &cli.command {
        Commands::Run(args) => {
            let (config, _log_guard) = load_with_logging(&args.config, settings)?;
            run::execute(args, &config).await
        }
        Commands::Schedule(args) => {
            let (config, _log_guard) = load_with_logging(&args.config, settings)?;
            schedule::execute(args, &config).await
        }
        Commands::Stats(args) => stats::execute(args.dir()),
        Commands::Check(CheckCommand::Telegram(arg)) => {
            let (_config, _log_guard) = load_with_logging(arg, settings)?;
            check::execute_telegram().await
        }
        Commands::Config(ConfigCommand::Show(arg)) => config::execute_show(arg),
        Commands::Config(ConfigCommand::Validate(arg)) => config::execute_validate(arg),
    }
}
