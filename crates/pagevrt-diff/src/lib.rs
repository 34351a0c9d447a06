use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "dimension mismatch: expected {expected_width}x{expected_height}, \
         actual {actual_width}x{actual_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

pub mod compare;
pub mod map;
pub mod overlay;
pub mod rect;
pub mod source;

pub use self::compare::{CompareOptions, Comparator, Comparison, Verdict};
pub use self::map::{DifferenceMap, Tolerance};
pub use self::overlay::{DEFAULT_OUTLINE, draw_overlay};
pub use self::rect::Rect;
pub use self::source::PixelSource;
