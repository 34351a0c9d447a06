use std::ops::Deref;

use image::{ImageBuffer, Pixel};

/// Read-only view of a decoded raster image.
pub trait PixelSource {
    /// Colour value; two pixels match only when they compare equal.
    type Pixel: PartialEq;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Colour at `(x, y)`. Callers stay within `width()` x `height()`.
    fn pixel(&self, x: u32, y: u32) -> Self::Pixel;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl<P, C> PixelSource for ImageBuffer<P, C>
where
    P: Pixel + PartialEq,
    C: Deref<Target = [P::Subpixel]>,
{
    type Pixel = P;

    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn pixel(&self, x: u32, y: u32) -> P {
        *self.get_pixel(x, y)
    }
}
