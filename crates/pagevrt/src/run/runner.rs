use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, info_span, warn};

use super::job::SampleJob;
use super::pipeline::{self, PageReport, RunContext};

/// Per-sample outcome.
pub enum SampleOutcome {
    /// One report per page, in page order.
    Ok(Vec<PageReport>),
    /// The document could not be processed at all.
    Err(String),
}

/// Render orchestration: parallel workers pulling from a shared work queue.
///
/// Individual failures are reported per-sample rather than aborting the run.
///
/// Returns a `Receiver` immediately; outcomes stream in as samples complete.
pub async fn run_all(
    mut jobs: Vec<SampleJob>,
    context: RunContext,
    parallel: usize,
) -> mpsc::Receiver<(SampleJob, SampleOutcome)> {
    let (tx, rx) = mpsc::channel(parallel.max(1) * 2);
    if jobs.is_empty() {
        return rx;
    }

    let job_count = jobs.len();
    let worker_count = job_count.min(parallel.max(1));
    debug!(
        jobs = job_count,
        workers = worker_count,
        parallel,
        "starting run"
    );

    // Workers pop from the back.
    jobs.reverse();
    let context = Arc::new(context);
    let queue = Arc::new(Mutex::new(jobs));

    let mut set = tokio::task::JoinSet::new();
    for idx in 0..worker_count {
        let queue = queue.clone();
        let tx = tx.clone();
        let context = context.clone();
        let span = info_span!("worker", id = idx);
        set.spawn(
            async move {
                debug!("started");
                loop {
                    let (job, remaining) = {
                        let mut q = queue.lock().await;
                        match q.pop() {
                            Some(j) => {
                                let remaining = q.len();
                                (j, remaining)
                            }
                            None => {
                                debug!("queue empty, exiting");
                                break;
                            }
                        }
                    };
                    debug!(job = %job.sample, remaining, "picked job");

                    let task = {
                        let context = context.clone();
                        let job = job.clone();
                        tokio::task::spawn_blocking(move || pipeline::process(&context, &job))
                    };
                    let outcome = match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!(error = %e, "sample task panicked");
                            SampleOutcome::Err(format!("Processing panicked: {e}"))
                        }
                    };

                    if tx.send((job, outcome)).await.is_err() {
                        warn!("channel send failed (receiver dropped), stopping");
                        break;
                    }
                }
                debug!("exiting");
            }
            .instrument(span),
        );
    }

    // Channel closes once every worker's sender is gone.
    drop(tx);

    tokio::spawn(async move {
        while let Some(result) = set.join_next().await {
            match result {
                Ok(()) => debug!("worker task joined"),
                Err(e) => warn!(error = %e, "worker task panicked"),
            }
        }
        debug!("all workers done");
    });

    rx
}
