use std::time::Instant;

use image::RgbaImage;
use pagevrt_diff::CompareOptions;
use tracing::{debug, warn};

use super::RunMode;
use super::job::SampleJob;
use super::runner::SampleOutcome;
use super::timing::PageTimings;
use crate::compare::{PageStatus, SampleError, compare_files};
use crate::render::{Document, RenderSettings, Renderer};
use crate::store::{self, PagePaths};

/// Everything a worker needs to process a sample. Shared by all workers.
pub struct RunContext {
    pub renderer: Renderer,
    pub width: u32,
    pub height: u32,
    pub settings: RenderSettings,
    pub compare: CompareOptions,
    pub mode: RunMode,
}

/// Result for one page of a sample.
#[derive(Debug)]
pub struct PageReport {
    /// Page stem, e.g. `invoice.svg` or `invoice.svg.page2`.
    pub id: String,
    pub status: PageStatus,
    pub timings: PageTimings,
}

/// Render every page of a sample and check or store it.
///
/// Blocking: run it on the blocking pool. Each page gets its own difference
/// map, so concurrent samples never share comparison state.
pub fn process(ctx: &RunContext, job: &SampleJob) -> SampleOutcome {
    let document = match ctx.renderer.open(&job.document_path()) {
        Ok(d) => d,
        Err(e) => {
            warn!(sample = %job.sample, error = %e, "failed to open document");
            return SampleOutcome::Err(format!("Failed to open document: {e}"));
        }
    };

    let pages = document.page_count();
    debug!(sample = %job.sample, pages, "opened document");
    let reports = (0..pages)
        .map(|page| process_page(ctx, job, document.as_ref(), page))
        .collect();
    SampleOutcome::Ok(reports)
}

fn process_page(
    ctx: &RunContext,
    job: &SampleJob,
    document: &dyn Document,
    page: usize,
) -> PageReport {
    let id = job.page_id(page);
    let paths = job.page_paths(page);
    let mut timings = PageTimings::default();

    let t0 = Instant::now();
    let rendered = document.render_page(page, ctx.width, ctx.height, &ctx.settings);
    timings.render = t0.elapsed();

    let status = match rendered {
        Ok(image) => match ctx.mode {
            RunMode::Test => check(ctx, &paths, &image, &mut timings),
            RunMode::Update => match store::write_master(&paths, &image) {
                Ok(()) => PageStatus::Updated,
                Err(e) => PageStatus::Error(format!("{e:#}")),
            },
        },
        Err(e) => {
            warn!(page = %id, error = %e, "render failed");
            PageStatus::Error(e.to_string())
        }
    };

    PageReport {
        id,
        status,
        timings,
    }
}

/// Write the actual render, then compare it against the master.
fn check(
    ctx: &RunContext,
    paths: &PagePaths,
    image: &RgbaImage,
    timings: &mut PageTimings,
) -> PageStatus {
    if let Err(e) = store::write_png(&paths.actual, image) {
        return PageStatus::Error(format!("{e:#}"));
    }

    let t0 = Instant::now();
    let result = compare_files(&paths.master, &paths.actual, &ctx.compare);
    match result {
        Ok(r) => {
            timings.compare = t0.elapsed();
            if r.comparison.is_identical() {
                // Overlay from an earlier failing run.
                match store::remove_file(&paths.compared) {
                    Ok(()) => PageStatus::Pass,
                    Err(e) => PageStatus::Error(format!("{e:#}")),
                }
            } else {
                PageStatus::Fail {
                    regions: r.comparison.map.len(),
                    limit_reached: r.comparison.limit_reached,
                }
            }
        }
        Err(e @ SampleError::MasterNotFound(_)) => {
            debug!("{e}");
            match store::remove_file(&paths.compared) {
                Ok(()) => PageStatus::New,
                Err(e) => PageStatus::Error(format!("{e:#}")),
            }
        }
        Err(e) => {
            // Any earlier overlay no longer matches the new actual.
            if let Err(rm) = store::remove_file(&paths.compared) {
                warn!(error = %format!("{rm:#}"), "failed to remove stale overlay");
            }
            PageStatus::Error(e.to_string())
        }
    }
}
