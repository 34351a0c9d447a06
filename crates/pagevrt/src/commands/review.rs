use std::path::Path;

use anyhow::{Context, Result};

use crate::report::html;

fn open_in_browser(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(target_os = "linux")]
    let cmd = "xdg-open";
    #[cfg(target_os = "windows")]
    let cmd = "start";

    std::process::Command::new(cmd)
        .arg(path)
        .spawn()
        .context("Failed to open report in browser")?;
    Ok(())
}

/// `pagevrt review`: generate the static HTML report in the sample folder.
pub fn review(folder: &Path, open: bool) -> Result<()> {
    let summary = html::generate(folder)?;
    println!(
        "Report written to {} ({} with differences, {} new)",
        summary.path.display(),
        summary.diff_count,
        summary.new_count
    );

    if open {
        let path = std::fs::canonicalize(&summary.path).unwrap_or(summary.path);
        open_in_browser(&path)?;
    }

    Ok(())
}
