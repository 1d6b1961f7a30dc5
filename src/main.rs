use clap::Parser;
use tracing_subscriber::EnvFilter;

mod agent;
mod app;
mod cli;
mod config;
mod core;
mod dispatch;
mod display;
mod prompt;
mod providers;
mod recommend;
mod utils;

use crate::app::Application;
use crate::cli::Cli;
use crate::config::Config;
use crate::core::error::SahayakError;
use crate::dispatch::{CascadeDispatcher, ProviderRegistry};

#[tokio::main]
async fn main() -> Result<(), SahayakError> {
    // Diagnostics go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sahayak=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let registry = ProviderRegistry::from_config(&config);
    let dispatcher = CascadeDispatcher::new(registry);

    let app = Application::new(dispatcher);
    app.run(cli.command).await
}
