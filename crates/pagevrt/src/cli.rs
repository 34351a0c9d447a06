use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, DiffConfig};

fn parse_parallel(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|e| format!("{e}"))?;
    config::validate_parallel(v)
}

#[derive(Parser)]
#[command(
    name = "pagevrt",
    about = "Visual regression testing for rendered documents"
)]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = config::CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the config file and the sample folder's .gitignore
    Init {
        /// Sample folder to configure
        #[arg(long, default_value = "samples")]
        folder: String,
        /// Overwrite existing config and gitignore
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Render, compare against masters, and report differences (exit 0/1)
    Test {
        /// Sample folder (overrides config)
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Only run samples whose name contains PATTERN (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
        /// Samples rendered and compared at once
        #[arg(long, value_parser = parse_parallel)]
        parallel: Option<usize>,
        /// Print per-page timing table
        #[arg(long)]
        timings: bool,
        /// Delete masters that no longer match any sample
        #[arg(long)]
        prune: bool,
        #[command(flatten)]
        diff: DiffConfig,
    },

    /// Render and save every page as its master
    Update {
        /// Sample folder (overrides config)
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Only run samples whose name contains PATTERN (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
        /// Samples rendered at once
        #[arg(long, value_parser = parse_parallel)]
        parallel: Option<usize>,
        /// Print per-page timing table
        #[arg(long)]
        timings: bool,
    },

    /// Promote actual renders to masters without re-rendering
    Approve {
        /// Sample folder (overrides config)
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Only approve pages whose name contains PATTERN (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
        /// Only approve new pages (no master yet)
        #[arg(long)]
        new: bool,
        /// Only approve failed pages (have an overlay)
        #[arg(long)]
        failed: bool,
        /// Approve all pending pages (default when no kind flags)
        #[arg(long)]
        all: bool,
    },

    /// Generate a visual review report (static HTML)
    Review {
        /// Sample folder (overrides config)
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Open the report in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Delete masters whose sample document no longer exists
    Prune {
        /// Sample folder (overrides config)
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Compare two PNG files and write an overlay of the differences (exit 0/1)
    Compare {
        /// Expected image
        master: PathBuf,
        /// Image under test
        actual: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        diff: DiffConfig,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_accepts_diff_flags() {
        let cli = Cli::try_parse_from([
            "pagevrt",
            "test",
            "--error-limit",
            "5",
            "--horizontal-tolerance",
            "2",
            "--parallel",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Test { diff, parallel, .. } => {
                assert_eq!(diff.error_limit, Some(5));
                assert_eq!(diff.horizontal_tolerance, Some(2));
                assert_eq!(diff.vertical_tolerance, None);
                assert_eq!(parallel, Some(3));
            }
            _ => panic!("expected test command"),
        }
        assert_eq!(cli.config, PathBuf::from("pagevrt.toml"));
    }

    #[test]
    fn zero_parallel_is_rejected() {
        assert!(Cli::try_parse_from(["pagevrt", "test", "--parallel", "0"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["pagevrt", "review", "--config", "other.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }
}
