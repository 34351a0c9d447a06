pub mod job;
pub mod pipeline;
pub mod plan;
pub mod runner;
pub mod timing;

pub use self::plan::SamplePlan;
pub use self::runner::SampleOutcome;
pub use self::timing::PageTimings;

/// What a run does with each rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Write the actual render and compare it against the master.
    Test,
    /// Store the render as the new master.
    Update,
}
