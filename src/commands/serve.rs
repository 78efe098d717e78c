use anyhow::Result;
use colored::Colorize;
use language_detector::{config::Config, server};
use tracing::info;

/// Execute the serve command
///
/// Blocks until a shutdown signal arrives. Any failure to load the model
/// artifacts or open the database aborts startup.
pub async fn execute(cfg: Config) -> Result<()> {
    println!("{}", "Starting language detector...".green());
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        "Starting language detector in foreground mode"
    );

    server::start_server(cfg).await
}
