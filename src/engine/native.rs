use super::{PageTexts, TextLayer};
use crate::error::{BriefError, Result};
use lopdf::Document;
use tracing::debug;

/// Text-layer reader backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfTextLayer;

impl TextLayer for LopdfTextLayer {
    fn read_pages(&self, pdf: &[u8], max_pages: u32) -> Result<PageTexts> {
        let doc = Document::load_mem(pdf).map_err(|e| {
            BriefError::extraction_with_source(format!("failed to parse PDF: {e}"), e)
        })?;

        // BTreeMap keyed by 1-based page number, so iteration is page order.
        let page_map = doc.get_pages();
        let page_count = u32::try_from(page_map.len()).unwrap_or(u32::MAX);

        let mut pages = Vec::with_capacity(page_map.len().min(max_pages as usize));
        for page_number in page_map.keys().take(max_pages as usize) {
            let text = doc.extract_text(&[*page_number]).unwrap_or_else(|e| {
                debug!("no text layer on page {page_number}: {e}");
                String::new()
            });
            pages.push(text);
        }

        Ok(PageTexts { page_count, pages })
    }
}
