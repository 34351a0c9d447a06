use tracing::debug;

use crate::CompareError;
use crate::map::{DifferenceMap, Tolerance};
use crate::source::PixelSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Stop scanning once more than this many areas are closed at the end of a
    /// row. `0` scans the whole image.
    pub error_limit: u32,
    pub tolerance: Tolerance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Identical,
    Different,
}

#[derive(Debug)]
pub struct Comparison {
    pub verdict: Verdict,
    /// Rolled-up map. Incomplete when `limit_reached` is set.
    pub map: DifferenceMap,
    /// The error limit stopped the scan before the last row was checked.
    pub limit_reached: bool,
}

impl Comparison {
    fn finish(mut map: DifferenceMap, limit_reached: bool) -> Self {
        map.rollup();
        let verdict = if map.is_empty() {
            Verdict::Identical
        } else {
            Verdict::Different
        };
        Self {
            verdict,
            map,
            limit_reached,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.verdict == Verdict::Identical
    }
}

/// Exact pixel comparison driving a [`DifferenceMap`].
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Scan `expected` and `actual` row by row and map every mismatch.
    ///
    /// An image with no pixels on either side is identical by convention and
    /// is not scanned. Otherwise both sides must have the same dimensions.
    ///
    /// The error limit is checked once per completed row, so the closed area
    /// count can overshoot it within the row that trips it.
    pub fn compare<E, A>(&self, expected: &E, actual: &A) -> Result<Comparison, CompareError>
    where
        E: PixelSource,
        A: PixelSource<Pixel = E::Pixel>,
    {
        let map = DifferenceMap::new(self.options.tolerance);
        let (width, height) = expected.dimensions();
        let (actual_width, actual_height) = actual.dimensions();

        if width == 0 || height == 0 || actual_width == 0 || actual_height == 0 {
            return Ok(Comparison::finish(map, false));
        }

        if (width, height) != (actual_width, actual_height) {
            return Err(CompareError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                actual_width,
                actual_height,
            });
        }

        let (map, limit_reached) = self.scan(expected, actual, map);
        Ok(Comparison::finish(map, limit_reached))
    }

    fn scan<E, A>(&self, expected: &E, actual: &A, mut map: DifferenceMap) -> (DifferenceMap, bool)
    where
        E: PixelSource,
        A: PixelSource<Pixel = E::Pixel>,
    {
        let limit = self.options.error_limit as usize;
        let (width, height) = expected.dimensions();

        for y in 0..height {
            for x in 0..width {
                if expected.pixel(x, y) != actual.pixel(x, y) {
                    map.add_pixel(x, y);
                }
            }
            if limit > 0 && map.len() > limit {
                debug!(row = y, areas = map.len(), limit, "error limit reached");
                return (map, true);
            }
        }
        (map, false)
    }
}
