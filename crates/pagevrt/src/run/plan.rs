use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use pagevrt_diff::CompareOptions;
use tokio::sync::mpsc;

use super::RunMode;
use super::job::SampleJob;
use super::pipeline::RunContext;
use super::runner::{SampleOutcome, run_all};
use crate::config::ResolvedRunConfig;
use crate::render::{RenderSettings, Renderer};
use crate::report::html;

/// Plans and executes a run: discovery, job building, filtering, execution.
pub struct SamplePlan {
    jobs: Vec<SampleJob>,
    parallel: usize,
    width: u32,
    height: u32,
    settings: RenderSettings,
    compare: CompareOptions,
}

impl SamplePlan {
    /// Discover sample documents and build the filtered job list.
    pub fn plan(config: &ResolvedRunConfig, filter: Option<&str>) -> Result<Self> {
        let samples = discover(&config.folder, &config.samples)?;

        if samples.is_empty() {
            println!(
                "No samples matching {} in {}",
                config.samples.join(", "),
                config.folder.display()
            );
        } else {
            println!(
                "Discovered {} sample(s) in {}",
                samples.len(),
                config.folder.display()
            );
            println!();
        }

        let mut jobs: Vec<SampleJob> = samples
            .into_iter()
            .map(|s| SampleJob::new(&config.folder, s))
            .collect();

        if let Some(pattern) = filter {
            jobs.retain(|job| job.matches_filter(pattern));
            if jobs.is_empty() {
                println!("No samples match filter");
            }
        }

        Ok(Self {
            jobs,
            parallel: config.parallel,
            width: config.width,
            height: config.height,
            settings: config.render,
            compare: config.compare,
        })
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// Sample names for all jobs in this run.
    pub fn job_names(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.sample.clone()).collect()
    }

    /// Load fonts and start rendering. Consumes self.
    pub async fn execute(
        self,
        mode: RunMode,
    ) -> Result<mpsc::Receiver<(SampleJob, SampleOutcome)>> {
        let renderer = tokio::task::spawn_blocking(Renderer::new)
            .await
            .context("Font loading panicked")?;
        let context = RunContext {
            renderer,
            width: self.width,
            height: self.height,
            settings: self.settings,
            compare: self.compare,
            mode,
        };
        Ok(run_all(self.jobs, context, self.parallel).await)
    }
}

/// Expand the sample glob patterns below `folder`.
///
/// Returns paths relative to `folder`, sorted and de-duplicated. PNG files are
/// never samples: they are renders, masters, or overlays. Neither are hidden
/// files nor the review report.
pub fn discover(folder: &Path, patterns: &[String]) -> Result<Vec<String>> {
    if !folder.is_dir() {
        bail!("Sample folder {} does not exist", folder.display());
    }

    let base = glob::Pattern::escape(&folder.to_string_lossy());
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };
    let mut samples = BTreeSet::new();
    for pattern in patterns {
        let full = format!("{base}/{pattern}");
        let paths = glob::glob_with(&full, options)
            .with_context(|| format!("Invalid sample pattern {pattern:?}"))?;
        for entry in paths {
            let path = entry.context("Failed to read sample folder")?;
            if !path.is_file()
                || path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("png"))
            {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(folder) {
                let rel = rel.to_string_lossy().replace('\\', "/");
                if rel != html::OUTPUT_FILE {
                    samples.insert(rel);
                }
            }
        }
    }
    Ok(samples.into_iter().collect())
}
