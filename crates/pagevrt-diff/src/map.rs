use crate::rect::Rect;

/// How far a new mismatch may sit from the open area and still extend it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    /// Pixels added on the left and right of the open area.
    pub horizontal: u32,
    /// Pixels added above and below the open area.
    pub vertical: u32,
}

impl Tolerance {
    pub const DEFAULT_HORIZONTAL: u32 = 4;
    pub const DEFAULT_VERTICAL: u32 = 1;
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            horizontal: Self::DEFAULT_HORIZONTAL,
            vertical: Self::DEFAULT_VERTICAL,
        }
    }
}

/// Accumulates mismatching pixels, fed in row-major order, into bounding areas.
///
/// One area is open at a time. A mismatch inside the open area's catch zone
/// (the open area inflated by the tolerance) grows it; any other mismatch
/// closes it and opens a new 1x1 area. Closed areas are kept in the order they
/// were closed and are never merged or reordered afterwards, so overlapping
/// areas are possible.
///
/// The catch zone is derived from the open area on every call and is never
/// stored.
#[derive(Debug, Clone, Default)]
pub struct DifferenceMap {
    areas: Vec<Rect>,
    open: Rect,
    tolerance: Tolerance,
}

impl DifferenceMap {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            areas: Vec::new(),
            open: Rect::default(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// The area currently absorbing mismatches. Empty before the first pixel
    /// and after [`rollup`](Self::rollup).
    pub fn open_area(&self) -> Rect {
        self.open
    }

    pub fn catch_area(&self) -> Rect {
        self.open
            .inflate(self.tolerance.horizontal, self.tolerance.vertical)
    }

    /// Record a mismatching pixel. Callers must visit pixels in row-major order.
    pub fn add_pixel(&mut self, x: u32, y: u32) {
        if self.catch_area().contains(x, y) {
            if !self.open.contains(x, y) {
                self.open = self.open.union(Rect::pixel(x, y));
            }
            return;
        }

        if !self.open.is_empty() {
            self.areas.push(self.open);
        }
        self.open = Rect::pixel(x, y);
    }

    /// Close the open area, if any. Calling it again without new pixels does nothing.
    pub fn rollup(&mut self) {
        let open = std::mem::take(&mut self.open);
        if !open.is_empty() {
            self.areas.push(open);
        }
    }

    /// Number of closed areas. The open area is not counted until rolled up.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Closed areas in the order they were closed.
    pub fn areas(&self) -> &[Rect] {
        &self.areas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> DifferenceMap {
        DifferenceMap::new(Tolerance {
            horizontal: 4,
            vertical: 1,
        })
    }

    #[test]
    fn fresh_map_is_empty() {
        let m = map();
        assert_eq!(m.len(), 0);
        assert!(m.open_area().is_empty());
        assert!(m.catch_area().is_empty());
    }

    #[test]
    fn single_pixel_becomes_one_area() {
        let mut m = map();
        m.add_pixel(3, 9);
        assert_eq!(m.len(), 0, "open area is not counted before rollup");
        m.rollup();
        assert_eq!(m.areas(), &[Rect::pixel(3, 9)]);
    }

    #[test]
    fn first_pixel_does_not_close_an_empty_area() {
        let mut m = map();
        m.add_pixel(0, 0);
        assert!(m.is_empty());
        assert_eq!(m.open_area(), Rect::pixel(0, 0));
    }

    #[test]
    fn catch_area_follows_open_area() {
        let mut m = map();
        m.add_pixel(10, 5);
        assert_eq!(m.catch_area(), Rect::new(6, 4, 9, 3));
        m.add_pixel(12, 5);
        assert_eq!(m.open_area(), Rect::new(10, 5, 3, 1));
        assert_eq!(m.catch_area(), Rect::new(6, 4, 11, 3));
    }

    #[test]
    fn nearby_pixels_on_a_row_merge() {
        let mut m = map();
        m.add_pixel(5, 2);
        m.add_pixel(8, 2);
        m.rollup();
        assert_eq!(m.areas(), &[Rect::pixel(5, 2).union(Rect::pixel(8, 2))]);
    }

    #[test]
    fn pixel_past_catch_zone_starts_new_area() {
        let mut m = map();
        m.add_pixel(5, 2);
        m.add_pixel(8, 2);
        // Open area spans x 5..9, its catch zone x 1..13: 12 still merges.
        m.add_pixel(12, 2);
        assert_eq!(m.len(), 0);
        m.add_pixel(17, 2);
        assert_eq!(m.len(), 1);
        m.rollup();
        assert_eq!(m.areas(), &[Rect::new(5, 2, 8, 1), Rect::pixel(17, 2)]);
    }

    #[test]
    fn pixel_below_extends_area() {
        let mut m = map();
        m.add_pixel(4, 0);
        m.add_pixel(5, 0);
        m.add_pixel(4, 1);
        m.add_pixel(5, 1);
        m.rollup();
        assert_eq!(m.areas(), &[Rect::new(4, 0, 2, 2)]);
    }

    #[test]
    fn pixel_two_rows_below_starts_new_area() {
        let mut m = map();
        m.add_pixel(4, 0);
        m.add_pixel(4, 2);
        m.rollup();
        assert_eq!(m.areas(), &[Rect::pixel(4, 0), Rect::pixel(4, 2)]);
    }

    #[test]
    fn pixel_inside_open_area_changes_nothing() {
        let mut m = map();
        m.add_pixel(2, 0);
        m.add_pixel(6, 0);
        m.add_pixel(2, 1);
        m.add_pixel(6, 1);
        let before = m.open_area();
        m.add_pixel(4, 1);
        assert_eq!(m.open_area(), before);
    }

    #[test]
    fn rollup_is_idempotent() {
        let mut m = map();
        m.add_pixel(1, 1);
        m.rollup();
        m.rollup();
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn rollup_on_fresh_map_is_noop() {
        let mut m = map();
        m.rollup();
        assert!(m.is_empty());
    }

    #[test]
    fn closed_areas_keep_scan_order_and_may_overlap() {
        let mut m = map();
        // A wide cluster on row 0 and a pixel far to the right on the same row.
        m.add_pixel(0, 0);
        m.add_pixel(4, 0);
        m.add_pixel(30, 0);
        // Back under the first cluster on row 1: outside the open area's zone.
        m.add_pixel(2, 1);
        m.rollup();
        assert_eq!(
            m.areas(),
            &[Rect::new(0, 0, 5, 1), Rect::pixel(30, 0), Rect::pixel(2, 1)]
        );
        assert!(m.areas().iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn zero_tolerance_only_merges_touching_pixels() {
        let mut m = DifferenceMap::new(Tolerance {
            horizontal: 0,
            vertical: 0,
        });
        m.add_pixel(0, 0);
        m.add_pixel(1, 0);
        m.rollup();
        assert_eq!(m.areas(), &[Rect::pixel(0, 0), Rect::pixel(1, 0)]);
    }
}
