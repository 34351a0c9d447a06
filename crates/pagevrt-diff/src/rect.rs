use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle. Right and bottom edges are exclusive.
///
/// Any rectangle with zero width or height is empty. `Rect::default()` is the
/// canonical empty value and never equals a real 1x1 area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The 1x1 rectangle covering pixel `(x, y)`.
    pub const fn pixel(x: u32, y: u32) -> Self {
        Self::new(x, y, 1, 1)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub const fn contains(&self, px: u32, py: u32) -> bool {
        !self.is_empty() && self.x <= px && px < self.right() && self.y <= py && py < self.bottom()
    }

    /// Smallest rectangle enclosing both. An empty side yields the other unchanged.
    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grow by `dx` on the left and right edges and `dy` on the top and bottom.
    ///
    /// Left/top edges clamp at 0. That clamp drops no point with non-negative
    /// coordinates, so `contains` behaves as for the unclamped rectangle.
    pub fn inflate(self, dx: u32, dy: u32) -> Rect {
        if self.is_empty() {
            return Rect::default();
        }
        let x = self.x.saturating_sub(dx);
        let y = self.y.saturating_sub(dy);
        Rect {
            x,
            y,
            width: self.right().saturating_add(dx) - x,
            height: self.bottom().saturating_add(dy) - y,
        }
    }
}
