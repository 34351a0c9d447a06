use std::path::Path;

use anyhow::Result;
use pagevrt_diff::{Rect, Verdict};
use serde::Serialize;

use crate::compare::{SampleError, compare_files};
use crate::config::{self, DiffConfig};

/// Machine-readable result of `pagevrt compare --json`.
#[derive(Debug, Serialize)]
struct CompareReport<'a> {
    master: &'a Path,
    actual: &'a Path,
    verdict: &'static str,
    limit_reached: bool,
    regions: &'a [Rect],
    overlay: Option<&'a Path>,
}

fn verdict_name(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Identical => "identical",
        Verdict::Different => "different",
    }
}

/// Comparison settings: the config file's `[diff]` table when present, then CLI flags.
fn resolve_diff(config_path: &Path, cli: &DiffConfig) -> Result<DiffConfig> {
    let mut diff = if config::config_file_exists(config_path) {
        config::load(config_path)?.diff
    } else {
        DiffConfig::default()
    };
    diff.merge(cli);
    Ok(diff)
}

/// `pagevrt compare`: compare two PNG files and write the overlay on difference.
/// Returns exit code: 0 = identical, 1 = different or no master.
pub fn compare(
    config_path: &Path,
    master: &Path,
    actual: &Path,
    cli: &DiffConfig,
    json: bool,
) -> Result<i32> {
    let options = resolve_diff(config_path, cli)?.options();

    let result = match compare_files(master, actual, &options) {
        Ok(r) => r,
        Err(e @ SampleError::MasterNotFound(_)) => {
            println!("{e}");
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    let comparison = &result.comparison;
    if json {
        let report = CompareReport {
            master,
            actual,
            verdict: verdict_name(comparison.verdict),
            limit_reached: comparison.limit_reached,
            regions: comparison.map.areas(),
            overlay: result.overlay.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(overlay) = &result.overlay {
        let more = if comparison.limit_reached { "+" } else { "" };
        println!(
            "\x1b[31mFAIL\x1b[0m  {}  ({}{more} regions)",
            actual.display(),
            comparison.map.len()
        );
        println!("Overlay written to {}", overlay.display());
    } else {
        println!("\x1b[32mPASS\x1b[0m  {}", actual.display());
    }

    Ok(if comparison.is_identical() { 0 } else { 1 })
}
