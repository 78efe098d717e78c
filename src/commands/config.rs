use anyhow::Result;
use colored::Colorize;
use language_detector::config::Config;
use tracing::info;

/// Execute the config show command
///
/// Prints the effective configuration (file + environment + defaults) as TOML
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying effective configuration");

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", render(cfg)?);

    Ok(())
}

fn render(cfg: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
