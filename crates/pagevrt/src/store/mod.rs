use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};

pub const ACTUAL_SUFFIX: &str = ".png";
pub const MASTER_SUFFIX: &str = ".master.png";
/// Appended to the actual file's full path, `.png` included.
pub const COMPARED_SUFFIX: &str = ".compared.png";

const PAGE_MARKER: &str = ".page";

/// Files belonging to one rendered page.
///
/// For sample `S` in folder `F`: `F/S.png`, `F/S.master.png` and
/// `F/S.png.compared.png`. Pages after the first insert `.page<n>` (1-based)
/// after the sample name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePaths {
    pub actual: PathBuf,
    pub master: PathBuf,
    pub compared: PathBuf,
}

impl PagePaths {
    pub fn new(folder: &Path, sample: &str, page: usize) -> Self {
        Self::from_stem(folder, &page_stem(sample, page))
    }

    pub fn from_stem(folder: &Path, stem: &str) -> Self {
        let actual = folder.join(format!("{stem}{ACTUAL_SUFFIX}"));
        Self {
            master: folder.join(format!("{stem}{MASTER_SUFFIX}")),
            compared: compared_path(&actual),
            actual,
        }
    }
}

/// Page stem: the sample name for page 0, `<sample>.page<n+1>` after that.
pub fn page_stem(sample: &str, page: usize) -> String {
    if page == 0 {
        sample.to_owned()
    } else {
        format!("{sample}{PAGE_MARKER}{}", page + 1)
    }
}

/// Sample name a page stem belongs to.
pub fn sample_of(stem: &str) -> &str {
    if let Some((sample, n)) = stem.rsplit_once(PAGE_MARKER)
        && !n.is_empty()
        && n.bytes().all(|b| b.is_ascii_digit())
    {
        return sample;
    }
    stem
}

pub fn compared_path(actual: &Path) -> PathBuf {
    let mut s = OsString::from(actual.as_os_str());
    s.push(COMPARED_SUFFIX);
    PathBuf::from(s)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_png(path: &Path, image: &RgbaImage) -> Result<()> {
    ensure_parent(path)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Delete a file; a missing file is not an error.
pub fn remove_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            Err(e).with_context(|| format!("Failed to delete {}", path.display()))
        }
        _ => Ok(()),
    }
}

/// Replace the master with the actual render and drop the stale overlay.
pub fn promote(paths: &PagePaths) -> Result<()> {
    std::fs::rename(&paths.actual, &paths.master).with_context(|| {
        format!(
            "Failed to move {} to {}",
            paths.actual.display(),
            paths.master.display()
        )
    })?;
    remove_file(&paths.compared)
}

/// Store a fresh master and clear outputs of earlier comparisons.
pub fn write_master(paths: &PagePaths, image: &RgbaImage) -> Result<()> {
    write_png(&paths.master, image)?;
    remove_file(&paths.actual)?;
    remove_file(&paths.compared)
}

/// Delete a page's master together with any outputs left next to it.
pub fn remove_master(folder: &Path, stem: &str) -> Result<()> {
    let paths = PagePaths::from_stem(folder, stem);
    remove_file(&paths.master)?;
    remove_file(&paths.actual)?;
    remove_file(&paths.compared)
}

/// Recursively walk a directory, collecting file paths relative to `base`
/// whose name ends with `suffix`, with the suffix stripped.
fn collect_stems(base: &Path, dir: &Path, suffix: &str, out: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_stems(base, &path, suffix, out);
        } else if let Ok(rel) = path.strip_prefix(base)
            && let Some(rel) = rel.to_str()
            && let Some(stem) = rel.strip_suffix(suffix)
        {
            out.insert(stem.replace('\\', "/"));
        }
    }
}

/// Page stems with a master image.
pub fn list_master_stems(folder: &Path) -> BTreeSet<String> {
    let mut stems = BTreeSet::new();
    collect_stems(folder, folder, MASTER_SUFFIX, &mut stems);
    stems
}

/// Page stems with an actual render (masters and overlays excluded).
pub fn list_actual_stems(folder: &Path) -> BTreeSet<String> {
    let mut stems = BTreeSet::new();
    collect_stems(folder, folder, ACTUAL_SUFFIX, &mut stems);
    stems.retain(|s| !s.ends_with(".master") && !s.ends_with(".compared"));
    stems
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn first_page_uses_plain_names() {
        let p = PagePaths::new(Path::new("F"), "S.svg", 0);
        assert_eq!(p.actual, Path::new("F/S.svg.png"));
        assert_eq!(p.master, Path::new("F/S.svg.master.png"));
        assert_eq!(p.compared, Path::new("F/S.svg.png.compared.png"));
    }

    #[test]
    fn later_pages_are_numbered_from_two() {
        let p = PagePaths::new(Path::new("F"), "S.svg", 1);
        assert_eq!(p.actual, Path::new("F/S.svg.page2.png"));
        assert_eq!(p.master, Path::new("F/S.svg.page2.master.png"));
        assert_eq!(p.compared, Path::new("F/S.svg.page2.png.compared.png"));
    }

    #[test]
    fn sample_of_strips_page_marker() {
        assert_eq!(sample_of("doc.svg"), "doc.svg");
        assert_eq!(sample_of("doc.svg.page3"), "doc.svg");
        assert_eq!(sample_of("doc.pages.svg"), "doc.pages.svg");
        assert_eq!(sample_of("doc.page"), "doc.page");
    }

    #[test]
    fn write_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path();
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));

        let a = PagePaths::new(folder, "a.svg", 0);
        let b = PagePaths::new(&folder.join("nested"), "b.svg", 1);
        write_png(&a.actual, &img).unwrap();
        write_png(&a.compared, &img).unwrap();
        write_png(&a.master, &img).unwrap();
        write_png(&b.actual, &img).unwrap();

        let actual: Vec<String> = list_actual_stems(folder).into_iter().collect();
        assert_eq!(actual, vec!["a.svg", "nested/b.svg.page2"]);
        let masters: Vec<String> = list_master_stems(folder).into_iter().collect();
        assert_eq!(masters, vec!["a.svg"]);
    }

    #[test]
    fn promote_moves_actual_and_drops_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let p = PagePaths::new(dir.path(), "x.svg", 0);
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255]));
        write_png(&p.actual, &img).unwrap();
        write_png(&p.compared, &img).unwrap();

        promote(&p).unwrap();
        assert!(p.master.exists());
        assert!(!p.actual.exists());
        assert!(!p.compared.exists());
    }

    #[test]
    fn write_master_clears_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let p = PagePaths::new(dir.path(), "x.svg", 0);
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255]));
        write_png(&p.actual, &img).unwrap();

        write_master(&p, &img).unwrap();
        assert!(p.master.exists());
        assert!(!p.actual.exists());
    }

    #[test]
    fn remove_master_takes_outputs_along() {
        let dir = tempfile::tempdir().unwrap();
        let p = PagePaths::new(dir.path(), "gone.svg", 0);
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255]));
        write_png(&p.master, &img).unwrap();
        write_png(&p.actual, &img).unwrap();

        remove_master(dir.path(), "gone.svg").unwrap();
        assert!(!p.master.exists());
        assert!(!p.actual.exists());
    }

    #[test]
    fn removing_a_missing_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        remove_file(&dir.path().join("nothing.png")).unwrap();
    }
}
