use std::path::{Path, PathBuf};

use crate::store::{self, PagePaths};

/// Normalize a string for filter comparison: lowercase + treat `_` and ` ` as equivalent.
pub(crate) fn normalize_for_filter(s: &str) -> String {
    s.to_lowercase().replace('_', " ")
}

/// One sample document to render and check.
#[derive(Debug, Clone)]
pub struct SampleJob {
    pub folder: PathBuf,
    /// Document path relative to `folder`, e.g. `invoice.svg`.
    pub sample: String,
}

impl SampleJob {
    pub fn new(folder: &Path, sample: impl Into<String>) -> Self {
        Self {
            folder: folder.to_path_buf(),
            sample: sample.into(),
        }
    }

    pub fn document_path(&self) -> PathBuf {
        self.folder.join(&self.sample)
    }

    pub fn page_paths(&self, page: usize) -> PagePaths {
        PagePaths::new(&self.folder, &self.sample, page)
    }

    /// Name shown for a page: the sample itself for the first page.
    pub fn page_id(&self, page: usize) -> String {
        store::page_stem(&self.sample, page)
    }

    /// Check if this job matches a case-insensitive filter pattern.
    /// Strips `.png` suffix from pattern (user may copy from the review page).
    pub fn matches_filter(&self, pattern: &str) -> bool {
        let pattern = pattern.strip_suffix(".png").unwrap_or(pattern);
        normalize_for_filter(&self.sample).contains(&normalize_for_filter(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_case_insensitive_and_ignores_png_suffix() {
        let job = SampleJob::new(Path::new("s"), "Invoice_Draft.svg");
        assert!(job.matches_filter("invoice"));
        assert!(job.matches_filter("invoice draft"));
        assert!(job.matches_filter("Invoice_Draft.svg.png"));
        assert!(!job.matches_filter("receipt"));
    }

    #[test]
    fn page_ids_and_paths() {
        let job = SampleJob::new(Path::new("s"), "a.svg");
        assert_eq!(job.page_id(0), "a.svg");
        assert_eq!(job.page_id(2), "a.svg.page3");
        assert_eq!(job.document_path(), Path::new("s/a.svg"));
        assert_eq!(job.page_paths(0).master, Path::new("s/a.svg.master.png"));
    }
}
