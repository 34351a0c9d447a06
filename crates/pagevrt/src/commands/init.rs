use std::path::Path;

use anyhow::{Result, bail};

use crate::config;

/// `pagevrt init`: write the config template and the sample folder's `.gitignore`.
pub fn init(config_path: &Path, folder: &str, force: bool) -> Result<()> {
    if !force && config::config_file_exists(config_path) {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    config::write_template(config_path, folder)?;
    config::write_gitignore(Path::new(folder), force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}", config_path.display());
    println!("  folder = {folder}");
    Ok(())
}
