use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use language_detector::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    if matches!(command, cli::Commands::Version) {
        println!("Language Detector v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Every other command needs the configuration, and logging follows it
    let cfg = config::load_config(&args.config)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    match command {
        cli::Commands::Serve => commands::serve::execute(cfg).await?,
        cli::Commands::Test => commands::test::execute(&cfg)?,
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
        },
        cli::Commands::Logs(logs_args) => commands::logs::execute(&cfg, logs_args).await?,
        // printed before the configuration was loaded
        cli::Commands::Version => {}
    }

    Ok(())
}
