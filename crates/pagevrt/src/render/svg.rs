use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::usvg::{self, Transform, fontdb};
use tiny_skia::Pixmap;

use super::{Document, RenderError, RenderSettings};

/// A single-page SVG document.
///
/// The source is kept as bytes and parsed per render so that settings such as
/// `dpi` apply to the parse.
pub struct SvgDocument {
    data: Vec<u8>,
    resources_dir: Option<PathBuf>,
    fontdb: Arc<fontdb::Database>,
}

impl SvgDocument {
    pub fn open(path: &Path, fontdb: Arc<fontdb::Database>) -> Result<Self, RenderError> {
        let data = std::fs::read(path)?;
        Ok(Self::from_data(data, path.parent().map(Path::to_path_buf), fontdb))
    }

    pub fn from_data(
        data: Vec<u8>,
        resources_dir: Option<PathBuf>,
        fontdb: Arc<fontdb::Database>,
    ) -> Self {
        Self {
            data,
            resources_dir,
            fontdb,
        }
    }

    fn rasterize(
        &self,
        width: u32,
        height: u32,
        settings: &RenderSettings,
    ) -> Result<Pixmap, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::UnsupportedDimensions { width, height });
        }

        let options = usvg::Options {
            resources_dir: self.resources_dir.clone(),
            dpi: settings.dpi,
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(&self.data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        // Fit the page into the requested resolution, centered.
        let svg_size = tree.size();
        let scale_x = width as f32 / svg_size.width();
        let scale_y = height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
        let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
        let [r, g, b, a] = settings.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Document for SvgDocument {
    fn page_count(&self) -> usize {
        1
    }

    fn render_page(
        &self,
        index: usize,
        width: u32,
        height: u32,
        settings: &RenderSettings,
    ) -> Result<RgbaImage, RenderError> {
        if index >= self.page_count() {
            return Err(RenderError::PageOutOfRange {
                index,
                count: self.page_count(),
            });
        }
        let pixmap = self.rasterize(width, height, settings)?;
        Ok(pixmap_to_rgba(&pixmap))
    }
}

/// Pixmaps hold premultiplied colour; images hold straight alpha.
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
