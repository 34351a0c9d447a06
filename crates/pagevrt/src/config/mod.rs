pub mod diff;
pub mod resolve;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::render::RenderSettings;

pub use self::diff::DiffConfig;
pub use self::resolve::{CliOverrides, ResolvedRunConfig};
pub use self::template::{config_file_exists, write_gitignore, write_template};

pub const CONFIG_FILE: &str = "pagevrt.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// `#rrggbb` or `#rrggbbaa`.
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_dpi")]
    pub dpi: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            dpi: default_dpi(),
        }
    }
}

impl RenderConfig {
    pub fn settings(&self) -> Result<RenderSettings> {
        let background = parse_hex_color(&self.background)
            .map_err(|e| anyhow::anyhow!("render.background: {e}"))?;
        Ok(RenderSettings {
            background,
            dpi: self.dpi,
        })
    }
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    1600
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_dpi() -> f32 {
    96.0
}

fn default_folder() -> PathBuf {
    PathBuf::from("samples")
}

fn default_samples() -> Vec<String> {
    vec!["*.svg".to_string()]
}

/// Parse `#rrggbb` / `#rrggbbaa` (leading `#` optional) into RGBA.
pub fn parse_hex_color(s: &str) -> Result<[u8; 4], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected #rrggbb or #rrggbbaa, got {s:?}"));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}

pub fn validate_parallel(v: usize) -> Result<usize, String> {
    if v == 0 {
        return Err("parallel must be at least 1".to_string());
    }
    Ok(v)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding documents, actual renders, masters, and overlays.
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    /// Glob patterns, relative to `folder`, selecting the sample documents.
    #[serde(default = "default_samples")]
    pub samples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub diff: DiffConfig,
}

impl Config {
    /// Validate semantic constraints that serde cannot express.
    fn validate(&self) -> Result<()> {
        if self.samples.is_empty() {
            bail!(
                "No sample patterns configured. Add one, e.g.:\n\n  \
                 samples = [\"*.svg\"]"
            );
        }

        if self.render.width == 0 || self.render.height == 0 {
            bail!(
                "Render resolution has invalid dimensions ({}x{}). \
                 Both width and height must be > 0",
                self.render.width,
                self.render.height,
            );
        }

        if !(self.render.dpi.is_finite() && self.render.dpi > 0.0) {
            bail!("render.dpi must be a positive number, got {}", self.render.dpi);
        }

        parse_hex_color(&self.render.background)
            .map_err(|e| anyhow::anyhow!("render.background: {e}"))?;

        if let Some(p) = self.parallel {
            validate_parallel(p).map_err(|e| anyhow::anyhow!("{e}"))?;
        }

        Ok(())
    }
}

pub fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
