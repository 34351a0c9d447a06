mod cli;
mod commands;
mod compare;
mod config;
mod render;
mod report;
mod run;
mod store;

use std::path::{Path, PathBuf};

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

/// Resolve the run config with only a folder override.
fn resolve(config_path: &Path, folder: Option<PathBuf>) -> anyhow::Result<ResolvedRunConfig> {
    ResolvedRunConfig::new(
        config_path,
        CliOverrides {
            folder,
            ..CliOverrides::default()
        },
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pagevrt=info,pagevrt_diff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config_path = cli.config;

    match cli.command {
        cli::Command::Init { folder, force } => {
            commands::init(&config_path, &folder, force)?;
        }
        cli::Command::Test {
            folder,
            filter,
            parallel,
            timings,
            prune,
            diff,
        } => {
            let overrides = CliOverrides {
                folder,
                parallel,
                diff,
            };
            let config = ResolvedRunConfig::new(&config_path, overrides)?;
            let code = commands::test(config, filter.as_deref(), timings, prune).await?;
            std::process::exit(code);
        }
        cli::Command::Update {
            folder,
            filter,
            parallel,
            timings,
        } => {
            let overrides = CliOverrides {
                folder,
                parallel,
                ..CliOverrides::default()
            };
            let config = ResolvedRunConfig::new(&config_path, overrides)?;
            let code = commands::update(config, filter.as_deref(), timings).await?;
            std::process::exit(code);
        }
        cli::Command::Approve {
            folder,
            filter,
            new,
            failed,
            all,
        } => {
            let config = resolve(&config_path, folder)?;
            commands::approve(&config.folder, filter.as_deref(), new, failed, all)?;
        }
        cli::Command::Review { folder, open } => {
            let config = resolve(&config_path, folder)?;
            commands::review(&config.folder, open)?;
        }
        cli::Command::Prune {
            folder,
            dry_run,
            yes,
        } => {
            let config = resolve(&config_path, folder)?;
            commands::prune(config, dry_run, yes)?;
        }
        cli::Command::Compare {
            master,
            actual,
            json,
            diff,
        } => {
            let code = commands::compare(&config_path, &master, &actual, &diff, json)?;
            std::process::exit(code);
        }
    }

    Ok(())
}
