pub mod native;
pub mod poppler;
pub mod types;

use crate::error::Result;
use std::path::Path;

pub use types::{PageImage, PageTexts, ToolDiag};

/// Reads the embedded text layer, page by page, in page order.
pub trait TextLayer: Send + Sync {
    /// `pages` holds at most `max_pages` entries; `page_count` is always the full total.
    fn read_pages(&self, pdf: &[u8], max_pages: u32) -> Result<PageTexts>;
}

/// Renders pages `1..=last_page` of a PDF to image files under `out_dir`.
pub trait Rasterizer: Send + Sync {
    fn render_pages(&self, pdf: &Path, last_page: u32, out_dir: &Path) -> Result<Vec<PageImage>>;
}

/// Optical character recognition over a single page image.
pub trait Ocr: Send + Sync {
    fn image_to_text(&self, image: &Path, lang: Option<&str>) -> Result<String>;
}
