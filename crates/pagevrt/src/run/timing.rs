use std::time::Duration;

/// Per-stage timing breakdown for a single page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTimings {
    pub render: Duration,
    /// Time spent on image comparison. Zero when no master exists.
    pub compare: Duration,
}

impl PageTimings {
    pub fn total(&self) -> Duration {
        self.render + self.compare
    }
}
