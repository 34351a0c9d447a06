use std::io::Write;
use std::time::Duration;

use crate::compare::PageStatus;
use crate::run::PageTimings;

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Print a single page result line.
pub fn print_line(name: &str, status: &PageStatus, elapsed: Duration) {
    clear_line();
    let time_suffix = format!("  \x1b[2m{}\x1b[0m", format_duration(elapsed));

    match status {
        PageStatus::Pass => {
            println!("  \x1b[32mPASS\x1b[0m  {name}{time_suffix}");
        }
        PageStatus::Fail {
            regions,
            limit_reached,
        } => {
            let more = if *limit_reached { "+" } else { "" };
            println!("  \x1b[31mFAIL\x1b[0m  {name}  ({regions}{more} regions){time_suffix}");
        }
        PageStatus::New => {
            println!("  \x1b[33m NEW\x1b[0m  {name}  (no master){time_suffix}");
        }
        PageStatus::Updated => {
            println!("  \x1b[32m  OK\x1b[0m  {name}{time_suffix}");
        }
        PageStatus::Error(msg) => {
            println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg}){time_suffix}");
        }
    }
}

/// Print an error line (no timing available).
pub fn print_error_line(name: &str, msg: &str) {
    clear_line();
    println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg})");
}

/// Print a master left behind by a sample that no longer exists.
pub fn print_removed_line(name: &str) {
    clear_line();
    println!("  \x1b[2mGONE\x1b[0m  \x1b[2m{name}  (no matching sample)\x1b[0m");
}

/// Show render progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Rendering  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

/// Print an actionable summary listing page names grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(
    failed: &[String],
    new: &[String],
    errored: &[String],
    removed: &[String],
) {
    if failed.is_empty() && new.is_empty() && errored.is_empty() && removed.is_empty() {
        return;
    }

    clear_line();
    println!();
    println!("Actionable pages:");

    for (label, names) in [
        ("Failed", failed),
        ("New", new),
        ("Errored", errored),
        ("Removed", removed),
    ] {
        if !names.is_empty() {
            println!();
            println!("  {label} ({}):", names.len());
            for name in names {
                println!("    {name}");
            }
        }
    }
}

/// Counts shown in the final summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub errored: usize,
    pub removed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.new + self.errored
    }

    pub fn record(&mut self, status: &PageStatus) {
        match status {
            PageStatus::Pass | PageStatus::Updated => self.passed += 1,
            PageStatus::Fail { .. } => self.failed += 1,
            PageStatus::New => self.new += 1,
            PageStatus::Error(_) => self.errored += 1,
        }
    }

    /// A test run succeeds only when every page passed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.new == 0 && self.errored == 0
    }
}

/// Print the final summary of a test run.
pub fn print_summary(tally: &Tally, elapsed: Duration) {
    let Tally {
        passed,
        failed,
        new,
        errored,
        removed,
    } = *tally;

    clear_line();
    println!();
    print!(
        "Pages:  {} total, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{new} new\x1b[0m",
        tally.total()
    );
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    if removed > 0 {
        print!(", \x1b[2m{removed} removed\x1b[0m");
    }
    println!();
    println!("Time:   {}", format_duration(elapsed));

    if failed > 0 || new > 0 || errored > 0 || removed > 0 {
        println!();
        if failed > 0 {
            println!("{failed} page(s) have visual differences.");
        }
        if new > 0 {
            println!("{new} page(s) have no master.");
        }
        if errored > 0 {
            println!("{errored} page(s) could not be rendered or compared.");
        }
        if removed > 0 {
            println!(
                "{removed} master(s) no longer match any sample. Run `pagevrt prune` to delete."
            );
        }
        println!("Run `pagevrt approve` to accept, or `pagevrt update` to re-render.");
    }
}

/// Print a per-page timing table, slowest first.
pub fn print_timing_table(entries: &[(String, PageTimings)]) {
    if entries.is_empty() {
        return;
    }

    let mut sorted: Vec<&(String, PageTimings)> = entries.iter().collect();
    sorted.sort_by(|a, b| b.1.total().cmp(&a.1.total()));

    let name_width = sorted
        .iter()
        .map(|(n, _)| n.chars().count())
        .max()
        .unwrap_or(8)
        .clamp(8, 50);

    let headers = ["total", "render", "compare"];

    println!();
    println!("\x1b[1mTimings (all pages):\x1b[0m");
    println!();

    print!("  {:<width$}", "Page", width = name_width);
    for h in &headers {
        print!("  {:>7}", h);
    }
    println!();

    let sep_len = name_width + headers.len() * 9;
    println!("  {}", "\u{2500}".repeat(sep_len));

    for (name, t) in &sorted {
        print!("  {:<width$}", truncate_name(name, name_width), width = name_width);
        for d in [t.total(), t.render, t.compare] {
            print!("  {:>5}ms", d.as_millis());
        }
        println!();
    }
}

/// Truncate a page name to `max` chars, keeping the tail (the unique part).
fn truncate_name(name: &str, max: usize) -> String {
    let len = name.chars().count();
    if len <= max {
        name.to_string()
    } else {
        let skip = len - (max - 1);
        let truncated: String = name.chars().skip(skip).collect();
        format!("\u{2026}{truncated}")
    }
}
