use clap::Parser;

use moverwatch::adapter::inbound::cli::command::Cli;
use moverwatch::adapter::inbound::cli::diagnostic;
use moverwatch::adapter::inbound::cli::dispatch::dispatch;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = dispatch(&cli).await {
        let config_path = cli.command.config_path();
        let report = diagnostic::report(&e, config_path.as_deref());
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}
