use std::path::Path;

use anyhow::Result;

use crate::run::job::normalize_for_filter;
use crate::store::{self, PagePaths};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    New,
    Failed,
}

/// Pending pages: an overlay means failed, a missing master means new.
/// Pages whose last run passed are not pending.
fn pending(folder: &Path) -> Vec<(String, Kind)> {
    let masters = store::list_master_stems(folder);
    store::list_actual_stems(folder)
        .into_iter()
        .filter_map(|stem| {
            let kind = if PagePaths::from_stem(folder, &stem).compared.is_file() {
                Kind::Failed
            } else if !masters.contains(&stem) {
                Kind::New
            } else {
                return None;
            };
            Some((stem, kind))
        })
        .collect()
}

/// `pagevrt approve`: promote actual renders to masters without re-rendering.
pub fn approve(
    folder: &Path,
    filter: Option<&str>,
    new_only: bool,
    failed_only: bool,
    all: bool,
) -> Result<()> {
    let (new_only, failed_only) = if all {
        (false, false)
    } else {
        (new_only, failed_only)
    };

    let candidates = pending(folder);
    if candidates.is_empty() {
        println!("Nothing to approve, no failed or new pages.");
        return Ok(());
    }

    // Strip .png: names may be copied from the review page.
    let filtered: Vec<(String, Kind)> = candidates
        .into_iter()
        .filter(|(_, kind)| {
            if new_only {
                *kind == Kind::New
            } else if failed_only {
                *kind == Kind::Failed
            } else {
                true
            }
        })
        .filter(|(stem, _)| {
            filter.is_none_or(|pat| {
                let pat = pat.strip_suffix(".png").unwrap_or(pat);
                normalize_for_filter(stem).contains(&normalize_for_filter(pat))
            })
        })
        .collect();

    if filtered.is_empty() {
        println!("No pages matched the given filters.");
        return Ok(());
    }

    let mut count_new = 0usize;
    let mut count_failed = 0usize;

    for (stem, kind) in &filtered {
        store::promote(&PagePaths::from_stem(folder, stem))?;
        let label = match kind {
            Kind::Failed => {
                count_failed += 1;
                "\x1b[31mFAIL\x1b[0m"
            }
            Kind::New => {
                count_new += 1;
                "\x1b[33m NEW\x1b[0m"
            }
        };
        println!("  Approved  {label}  {stem}");
    }

    let total = count_new + count_failed;
    println!();
    println!("{total} page(s) approved ({count_new} new, {count_failed} failed).");

    Ok(())
}
