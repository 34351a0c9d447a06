use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use super::prune::find_orphans;
use crate::compare::PageStatus;
use crate::config::ResolvedRunConfig;
use crate::report::terminal::{self, Tally};
use crate::run::{PageTimings, RunMode, SampleOutcome, SamplePlan};
use crate::store;

/// `pagevrt test`: render, compare against masters, report.
/// Returns exit code: 0 = all pass, 1 = any fail, new or error.
pub async fn test(
    config: ResolvedRunConfig,
    filter: Option<&str>,
    timings: bool,
    prune: bool,
) -> Result<i32> {
    let run = SamplePlan::plan(&config, filter)?;
    if run.total() == 0 {
        return Ok(0);
    }

    let planned: BTreeSet<String> = run.job_names().into_iter().collect();

    let run_start = Instant::now();
    let total = run.total();
    let mut rx = run.execute(RunMode::Test).await?;

    let mut done = 0usize;
    let mut tally = Tally::default();
    let mut all_timings: Vec<(String, PageTimings)> = Vec::new();
    let mut failed_names: Vec<String> = Vec::new();
    let mut new_names: Vec<String> = Vec::new();
    let mut errored_names: Vec<String> = Vec::new();

    debug!(total, "waiting for results");
    while let Some((job, outcome)) = rx.recv().await {
        done += 1;
        debug!(done, total, sample = %job.sample, "received result");
        match outcome {
            SampleOutcome::Err(msg) => {
                tally.errored += 1;
                terminal::print_error_line(&job.sample, &msg);
                errored_names.push(job.sample);
            }
            SampleOutcome::Ok(reports) => {
                for report in reports {
                    tally.record(&report.status);
                    match &report.status {
                        PageStatus::Fail { .. } => failed_names.push(report.id.clone()),
                        PageStatus::New => new_names.push(report.id.clone()),
                        PageStatus::Error(_) => errored_names.push(report.id.clone()),
                        PageStatus::Pass | PageStatus::Updated => {}
                    }
                    terminal::print_line(&report.id, &report.status, report.timings.total());
                    all_timings.push((report.id, report.timings));
                }
            }
        }
        terminal::show_progress(done, total);
    }

    // Orphan detection: only on full (unfiltered) runs.
    let mut removed_names: Vec<String> = Vec::new();
    if filter.is_none() {
        for stem in find_orphans(&config.folder, &planned) {
            terminal::print_removed_line(&stem);
            if prune {
                store::remove_master(&config.folder, &stem)?;
            }
            removed_names.push(stem);
        }
    }
    tally.removed = removed_names.len();

    if timings {
        terminal::print_timing_table(&all_timings);
    }

    terminal::print_actionable_summary(&failed_names, &new_names, &errored_names, &removed_names);
    terminal::print_summary(&tally, run_start.elapsed());

    // Orphaned masters do not affect the exit code.
    Ok(if tally.is_clean() { 0 } else { 1 })
}
