pub mod sample;

pub use self::sample::{SampleError, compare_files};

/// Status of a single page comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Pass,
    Fail {
        regions: usize,
        limit_reached: bool,
    },
    /// No master image yet.
    New,
    /// Rendered and stored as the new master.
    Updated,
    Error(String),
}
