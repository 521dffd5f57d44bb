use anyhow::Context;
use clap::Parser;
use paleo_config::Config;
use tokio::signal;

pub mod cli;
pub mod commands;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod state;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Command};
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    logging::init_tracing(&config.log);

    let state = AppState::new(config)?;

    // Shutdown request (Ctrl+C); the driver stops between canvases
    let cancel = state.cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("Shutdown requested, finishing current canvas");
            cancel.cancel();
        }
    });

    match cli.cmd {
        Command::Manifest(args) => {
            let options = args.processing.options(args.new_id);
            commands::manifest::transcribe_manifest(&state, &args.source, &args.output, &options)
                .await
                .with_context(|| format!("failed to annotate {}", args.source))?;
        }
        Command::List(args) => {
            let options = args.processing.options(None);
            commands::list::run_list(&state, &args.list, &args.output_dir, &options)
                .await
                .with_context(|| format!("failed to process list {}", args.list))?;
        }
    }

    Ok(())
}

/// Defaults, then config file, then environment, then CLI flags
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            config.apply_env();
            config
        }
        None => Config::new(),
    };

    if let Some(model) = &cli.model {
        config.transcriber.model = model.clone();
    }
    if cli.log_json {
        config.log.json = true;
    }

    Ok(config)
}
