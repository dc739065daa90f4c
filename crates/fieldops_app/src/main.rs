mod cli;
mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use fieldops_logging::{ops_debug, LogDestination};
use log::LevelFilter;

use crate::cli::Cli;
use crate::commands::App;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    config.apply_overrides(cli.base_url.clone(), cli.page_size);

    let destination = if config.log_to_file {
        LogDestination::Both(LogDestination::default_file())
    } else {
        LogDestination::Terminal
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    fieldops_logging::initialize(destination, level);
    ops_debug!("Using backend {}", config.base_url);

    App::new(config)?.run(cli.command).await
}
