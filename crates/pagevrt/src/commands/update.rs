use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use crate::compare::PageStatus;
use crate::config::ResolvedRunConfig;
use crate::report::terminal;
use crate::run::{PageTimings, RunMode, SampleOutcome, SamplePlan};

/// `pagevrt update`: render and store every page as its master.
/// Returns exit code: 1 when any sample failed to render.
pub async fn update(config: ResolvedRunConfig, filter: Option<&str>, timings: bool) -> Result<i32> {
    let run = SamplePlan::plan(&config, filter)?;
    if run.total() == 0 {
        return Ok(0);
    }

    let run_start = Instant::now();
    let total = run.total();
    let mut rx = run.execute(RunMode::Update).await?;

    let mut done = 0usize;
    let mut saved = 0usize;
    let mut errored = 0usize;
    let mut all_timings: Vec<(String, PageTimings)> = Vec::new();
    debug!(total, "waiting for results");
    while let Some((job, outcome)) = rx.recv().await {
        done += 1;
        match outcome {
            SampleOutcome::Ok(reports) => {
                for report in reports {
                    if matches!(report.status, PageStatus::Updated) {
                        saved += 1;
                    } else {
                        errored += 1;
                    }
                    terminal::print_line(&report.id, &report.status, report.timings.total());
                    all_timings.push((report.id, report.timings));
                }
            }
            SampleOutcome::Err(msg) => {
                terminal::print_error_line(&job.sample, &msg);
                errored += 1;
            }
        }
        terminal::show_progress(done, total);
    }

    if timings {
        terminal::print_timing_table(&all_timings);
    }

    terminal::clear_line();
    println!();
    println!("{saved} master(s) saved.");
    if errored > 0 {
        println!("{errored} page(s) or sample(s) failed to render.");
    }
    println!("Time: {}", terminal::format_duration(run_start.elapsed()));

    Ok(if errored > 0 { 1 } else { 0 })
}
