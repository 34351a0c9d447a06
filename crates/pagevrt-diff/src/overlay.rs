use image::{Pixel, Rgba, RgbaImage};

use crate::map::DifferenceMap;
use crate::rect::Rect;

/// Translucent red.
pub const DEFAULT_OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 128]);

/// Copy of `actual` with every area of `map` outlined in `color`.
///
/// Returns `None` when the map holds no areas. The outline is one pixel wide
/// and runs along columns `x` and `x + width` and rows `y` and `y + height`,
/// so it frames the mismatching pixels. Parts outside the image are clipped.
pub fn draw_overlay(actual: &RgbaImage, map: &DifferenceMap, color: Rgba<u8>) -> Option<RgbaImage> {
    if map.is_empty() {
        return None;
    }

    let mut canvas = actual.clone();
    for area in map.areas() {
        outline(&mut canvas, *area, color);
    }
    Some(canvas)
}

fn outline(canvas: &mut RgbaImage, area: Rect, color: Rgba<u8>) {
    let (left, top) = (area.x, area.y);
    let (right, bottom) = (area.right(), area.bottom());

    for x in left..=right {
        blend(canvas, x, top, color);
        blend(canvas, x, bottom, color);
    }
    for y in top + 1..bottom {
        blend(canvas, left, y, color);
        blend(canvas, right, y, color);
    }
}

fn blend(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    if x < canvas.width() && y < canvas.height() {
        canvas.get_pixel_mut(x, y).blend(&color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Tolerance;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn map_of(pixels: &[(u32, u32)]) -> DifferenceMap {
        let mut m = DifferenceMap::new(Tolerance::default());
        for &(x, y) in pixels {
            m.add_pixel(x, y);
        }
        m.rollup();
        m
    }

    fn touched(img: &RgbaImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| **p != WHITE)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn empty_map_draws_nothing() {
        let actual = RgbaImage::from_pixel(4, 4, WHITE);
        assert!(draw_overlay(&actual, &DifferenceMap::default(), DEFAULT_OUTLINE).is_none());
    }

    #[test]
    fn single_pixel_is_framed() {
        let actual = RgbaImage::from_pixel(6, 6, WHITE);
        let out = draw_overlay(&actual, &map_of(&[(2, 2)]), DEFAULT_OUTLINE).unwrap();
        assert_eq!(touched(&out), vec![(2, 2), (3, 2), (2, 3), (3, 3)]);

        let p = out.get_pixel(2, 2);
        assert!(p[0] > 250, "{p:?}");
        assert!(p[1] < 200 && p[2] < 200, "outline should tint towards red: {p:?}");
        assert!(p[3] > 250, "{p:?}");
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let actual = RgbaImage::from_pixel(10, 10, WHITE);
        let m = map_of(&[(2, 2), (3, 2), (4, 2), (2, 3), (2, 4)]);
        assert_eq!(m.areas(), &[Rect::new(2, 2, 3, 3)]);

        let out = draw_overlay(&actual, &m, DEFAULT_OUTLINE).unwrap();
        assert_eq!(*out.get_pixel(3, 3), WHITE);
        assert_eq!(*out.get_pixel(4, 4), WHITE);
        assert_ne!(*out.get_pixel(5, 5), WHITE);
        assert_ne!(*out.get_pixel(2, 5), WHITE);
        assert_eq!(touched(&out).len(), 16);
    }

    #[test]
    fn outline_is_clipped_to_the_image() {
        let actual = RgbaImage::from_pixel(3, 3, WHITE);
        let out = draw_overlay(&actual, &map_of(&[(2, 2)]), DEFAULT_OUTLINE).unwrap();
        assert_eq!(touched(&out), vec![(2, 2)]);
    }

    #[test]
    fn original_image_is_not_modified() {
        let actual = RgbaImage::from_pixel(4, 4, WHITE);
        let _ = draw_overlay(&actual, &map_of(&[(1, 1)]), DEFAULT_OUTLINE);
        assert!(touched(&actual).is_empty());
    }
}
