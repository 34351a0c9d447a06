use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::ResolvedRunConfig;
use crate::run::SamplePlan;
use crate::store;

/// Master stems whose sample document is not among `planned`.
pub(crate) fn find_orphans(folder: &Path, planned: &BTreeSet<String>) -> Vec<String> {
    store::list_master_stems(folder)
        .into_iter()
        .filter(|stem| !planned.contains(store::sample_of(stem)))
        .collect()
}

/// `pagevrt prune`: find and delete masters whose sample is gone.
pub fn prune(config: ResolvedRunConfig, dry_run: bool, yes: bool) -> Result<()> {
    let run = SamplePlan::plan(&config, None)?;
    let planned: BTreeSet<String> = run.job_names().into_iter().collect();
    let orphans = find_orphans(&config.folder, &planned);

    if orphans.is_empty() {
        println!("No orphaned masters found.");
        return Ok(());
    }

    println!("Orphaned masters ({}):", orphans.len());
    for stem in &orphans {
        println!("  {stem}");
    }
    println!();

    if dry_run {
        println!("Dry run, no files deleted.");
        return Ok(());
    }

    if !yes {
        print!("Delete {} master(s)? [y/N] ", orphans.len());
        std::io::stdout().flush()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    for stem in &orphans {
        store::remove_master(&config.folder, stem)?;
    }
    println!("Deleted {} orphaned master(s).", orphans.len());

    Ok(())
}
