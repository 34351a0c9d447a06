use std::path::Path;

use anyhow::{Context, Result};

/// Hand-crafted config template with commented-out keys.
/// Used by `pagevrt init` instead of `toml::to_string_pretty()` so that
/// users can see the available knobs without uncommenting section headers.
const CONFIG_TEMPLATE: &str = r##"folder = "{folder}"
samples = ["*.svg"]                 # glob patterns relative to folder
# parallel = 4                      # samples rendered and compared at once

# ─────────────────────────────────────────────────────────
# Rendering: all fields optional.
# ─────────────────────────────────────────────────────────
[render]
# width = 1200
# height = 1600
# background = "#ffffff"            # "#rrggbb" or "#rrggbbaa"
# dpi = 96.0

# ─────────────────────────────────────────────────────────
# Comparison: all fields optional.
# ─────────────────────────────────────────────────────────
[diff]
# error_limit = 0                   # stop after N difference areas (0 = no limit)
# horizontal_tolerance = 4          # px left/right that still extend an area
# vertical_tolerance = 1            # px above/below that still extend an area
"##;

/// Renders and overlays are regenerated on every run; only masters are kept.
const GITIGNORE: &str = "*.png\n!*.master.png\nreport.html\n";

pub fn config_file_exists(path: &Path) -> bool {
    path.exists()
}

/// Write `.gitignore` into the sample folder, creating the folder if needed.
pub fn write_gitignore(folder: &Path, force: bool) -> Result<()> {
    std::fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create {}", folder.display()))?;
    let path = folder.join(".gitignore");
    if !force && path.exists() {
        return Ok(());
    }
    std::fs::write(&path, GITIGNORE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the hand-crafted config template (with commented-out sections).
pub fn write_template(path: &Path, folder: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = CONFIG_TEMPLATE.replace("{folder}", folder);
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
