use pagevrt_diff::{CompareOptions, Tolerance};
use serde::{Deserialize, Serialize};

/// Comparison knobs.
///
/// Fields are `Option`; `None` means "use default".
/// Serves both TOML deserialization (`[diff]`) and CLI argument parsing.
#[derive(Clone, Debug, Default, clap::Args, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Stop scanning once more than N difference areas are found (0 = no limit)
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_limit: Option<u32>,

    /// Pixels left/right of a difference area that still extend it
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_tolerance: Option<u32>,

    /// Pixels above/below a difference area that still extend it
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_tolerance: Option<u32>,
}

impl DiffConfig {
    /// Overlay non-None fields from `other` onto self.
    pub fn merge(&mut self, other: &DiffConfig) {
        if other.error_limit.is_some() {
            self.error_limit = other.error_limit;
        }
        if other.horizontal_tolerance.is_some() {
            self.horizontal_tolerance = other.horizontal_tolerance;
        }
        if other.vertical_tolerance.is_some() {
            self.vertical_tolerance = other.vertical_tolerance;
        }
    }

    pub fn options(&self) -> CompareOptions {
        CompareOptions {
            error_limit: self.error_limit.unwrap_or(0),
            tolerance: Tolerance {
                horizontal: self
                    .horizontal_tolerance
                    .unwrap_or(Tolerance::DEFAULT_HORIZONTAL),
                vertical: self
                    .vertical_tolerance
                    .unwrap_or(Tolerance::DEFAULT_VERTICAL),
            },
        }
    }
}
