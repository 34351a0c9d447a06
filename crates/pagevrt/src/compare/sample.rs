use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, RgbaImage};
use pagevrt_diff::{
    CompareError, CompareOptions, Comparator, Comparison, DEFAULT_OUTLINE, draw_overlay,
};
use thiserror::Error;
use tracing::debug;

use crate::store;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Master file {} was not found", .0.display())]
    MasterNotFound(PathBuf),

    #[error("Failed to decode master {}: {source}", path.display())]
    MasterUnreadable {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("Failed to decode actual {}: {source}", path.display())]
    ActualUnreadable {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error("Failed to write overlay {}: {source}", path.display())]
    OverlayWrite {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

pub struct FileComparison {
    pub comparison: Comparison,
    /// Overlay written next to the actual image; `None` when identical.
    pub overlay: Option<PathBuf>,
}

fn load(path: &Path) -> Result<RgbaImage, ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Compare an actual image file against its master.
///
/// When they differ, the actual image with every difference area outlined is
/// written to `<actual>.compared.png`, replacing an earlier overlay.
pub fn compare_files(
    master: &Path,
    actual: &Path,
    options: &CompareOptions,
) -> Result<FileComparison, SampleError> {
    let expected = match load(master) {
        Ok(img) => img,
        Err(ImageError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
            return Err(SampleError::MasterNotFound(master.to_path_buf()));
        }
        Err(source) => {
            return Err(SampleError::MasterUnreadable {
                path: master.to_path_buf(),
                source,
            });
        }
    };

    let actual_image = load(actual).map_err(|source| SampleError::ActualUnreadable {
        path: actual.to_path_buf(),
        source,
    })?;

    let comparison = Comparator::new(*options).compare(&expected, &actual_image)?;
    debug!(
        master = %master.display(),
        regions = comparison.map.len(),
        limit_reached = comparison.limit_reached,
        "compared"
    );

    let overlay = match draw_overlay(&actual_image, &comparison.map, DEFAULT_OUTLINE) {
        Some(image) => Some(write_overlay(actual, &image)?),
        None => None,
    };

    Ok(FileComparison {
        comparison,
        overlay,
    })
}

fn write_overlay(actual: &Path, image: &RgbaImage) -> Result<PathBuf, SampleError> {
    let path = store::compared_path(actual);
    let written = match std::fs::remove_file(&path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(ImageError::IoError(e)),
        _ => image.save_with_format(&path, ImageFormat::Png),
    };
    written.map_err(|source| SampleError::OverlayWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
