pub mod svg;

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use resvg::usvg::fontdb;
use thiserror::Error;

pub use self::svg::SvgDocument;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Unsupported document type: {0}")]
    UnsupportedFormat(String),

    #[error("Page {index} out of range (document has {count})")]
    PageOutOfRange { index: usize, count: usize },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings handed to the renderer for every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Fill behind the page, RGBA.
    pub background: [u8; 4],
    pub dpi: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            dpi: 96.0,
        }
    }
}

/// A paged document that can be rasterized one page at a time.
pub trait Document: Send {
    fn page_count(&self) -> usize;

    fn render_page(
        &self,
        index: usize,
        width: u32,
        height: u32,
        settings: &RenderSettings,
    ) -> Result<RgbaImage, RenderError>;
}

/// Opens documents and shares the font database between them.
pub struct Renderer {
    fontdb: Arc<fontdb::Database>,
}

impl Renderer {
    /// Renderer backed by the system fonts.
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::info!(font_count = fontdb.len(), "Loaded fonts for document rendering");
        Self::with_fontdb(fontdb)
    }

    pub fn with_fontdb(fontdb: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn open(&self, path: &Path) -> Result<Box<dyn Document>, RenderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(Box::new(SvgDocument::open(path, self.fontdb.clone())?)),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
