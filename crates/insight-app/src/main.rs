use std::path::Path;

use clap::Parser;
use insight_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub mod background;
pub mod cli;
pub mod commands;
pub mod controller;
pub mod events;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod storage;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Commands};

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(atty::is(atty::Stream::Stderr))
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            let data = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        }
        None => Ok(Config::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Install { rank, lemma } => commands::install(&config, &rank, &lemma).await,
        Commands::Highlight {
            page,
            host,
            translations,
            hover,
        } => {
            commands::highlight(
                config,
                &page,
                &host,
                translations.as_deref(),
                hover.as_deref(),
            )
            .await
        }
        Commands::Ignore { lemma } => commands::ignore(&config, &lemma).await,
        Commands::Unignore { lemma } => commands::unignore(&config, &lemma).await,
        Commands::Percent { value } => commands::set_percent(&config, value).await,
        Commands::Mode { mode } => commands::set_mode(&config, &mode).await,
        Commands::SiteMode { host, mode } => commands::set_site_mode(&config, &host, &mode).await,
        Commands::Show => commands::show(&config).await,
    }
}
