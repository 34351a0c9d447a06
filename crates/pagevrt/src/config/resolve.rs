use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagevrt_diff::CompareOptions;

use super::diff::DiffConfig;
use super::{Config, load, validate_parallel};
use crate::render::RenderSettings;

const DEFAULT_PARALLEL: usize = 4;

/// Values extracted from the CLI that participate in the merge.
#[derive(Default)]
pub struct CliOverrides {
    pub folder: Option<PathBuf>,
    pub parallel: Option<usize>,
    pub diff: DiffConfig,
}

/// Values read from `PAGEVRT_*` environment variables.
#[derive(Default)]
pub struct EnvOverrides {
    pub folder: Option<PathBuf>,
    pub error_limit: Option<u32>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self> {
        let folder = std::env::var_os("PAGEVRT_FOLDER").map(PathBuf::from);
        let error_limit = std::env::var("PAGEVRT_ERROR_LIMIT")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("PAGEVRT_ERROR_LIMIT must be a non-negative integer")?;
        Ok(Self {
            folder,
            error_limit,
        })
    }
}

/// Fully resolved config after CLI > env > file > defaults merge.
pub struct ResolvedRunConfig {
    pub folder: PathBuf,
    pub samples: Vec<String>,
    pub parallel: usize,
    pub width: u32,
    pub height: u32,
    pub render: RenderSettings,
    pub compare: CompareOptions,
}

impl ResolvedRunConfig {
    pub fn new(config_path: &Path, cli: CliOverrides) -> Result<Self> {
        // 1. File layer
        let file_config = load(config_path).context("Run `pagevrt init` first")?;

        // 2. Env layer
        let env = EnvOverrides::from_env()?;

        Self::merge(file_config, env, cli)
    }

    /// CLI > env > file (highest priority first).
    pub fn merge(file_config: Config, env: EnvOverrides, cli: CliOverrides) -> Result<Self> {
        let folder = cli
            .folder
            .or(env.folder)
            .unwrap_or(file_config.folder);

        let parallel = cli
            .parallel
            .or(file_config.parallel)
            .unwrap_or(DEFAULT_PARALLEL);
        validate_parallel(parallel).map_err(|e| anyhow::anyhow!("{e}"))?;

        // Diff: file base, env limit, then CLI overlay
        let mut diff = file_config.diff;
        diff.merge(&DiffConfig {
            error_limit: env.error_limit,
            ..DiffConfig::default()
        });
        diff.merge(&cli.diff);

        let render = file_config.render.settings()?;

        Ok(Self {
            folder,
            samples: file_config.samples,
            parallel,
            width: file_config.render.width,
            height: file_config.render.height,
            render,
            compare: diff.options(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse;

    #[test]
    fn file_values_apply_without_overrides() {
        let file = parse("folder = \"pages\"\n[diff]\nerror_limit = 7\n").unwrap();
        let r = ResolvedRunConfig::merge(file, EnvOverrides::default(), CliOverrides::default())
            .unwrap();
        assert_eq!(r.folder, PathBuf::from("pages"));
        assert_eq!(r.parallel, DEFAULT_PARALLEL);
        assert_eq!(r.compare.error_limit, 7);
        assert_eq!((r.width, r.height), (1200, 1600));
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = parse("folder = \"pages\"\n[diff]\nerror_limit = 7\n").unwrap();
        let env = EnvOverrides {
            folder: Some(PathBuf::from("from-env")),
            error_limit: Some(9),
        };
        let cli = CliOverrides {
            folder: Some(PathBuf::from("from-cli")),
            parallel: Some(1),
            diff: DiffConfig::default(),
        };
        let r = ResolvedRunConfig::merge(file, env, cli).unwrap();
        assert_eq!(r.folder, PathBuf::from("from-cli"));
        assert_eq!(r.parallel, 1);
        assert_eq!(r.compare.error_limit, 9);
    }

    #[test]
    fn cli_diff_flags_override_env_limit() {
        let file = parse("").unwrap();
        let env = EnvOverrides {
            folder: None,
            error_limit: Some(9),
        };
        let cli = CliOverrides {
            diff: DiffConfig {
                error_limit: Some(3),
                horizontal_tolerance: Some(0),
                vertical_tolerance: None,
            },
            ..CliOverrides::default()
        };
        let r = ResolvedRunConfig::merge(file, env, cli).unwrap();
        assert_eq!(r.compare.error_limit, 3);
        assert_eq!(r.compare.tolerance.horizontal, 0);
        assert_eq!(r.compare.tolerance.vertical, 1);
    }

    #[test]
    fn zero_parallel_from_cli_is_rejected() {
        let cli = CliOverrides {
            parallel: Some(0),
            ..CliOverrides::default()
        };
        assert!(ResolvedRunConfig::merge(parse("").unwrap(), EnvOverrides::default(), cli).is_err());
    }
}
