use crate::{
    clean,
    config::Config,
    document::Document,
    engine::{
        native::LopdfTextLayer,
        poppler::{PdftoppmRasterizer, TesseractOcr},
        Ocr, PageImage, Rasterizer, TextLayer,
    },
    error::{BriefError, Result},
    policy::{self, ExtractionStrategy},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Page texts joined by the configured page marker. May be empty.
    pub text: String,
    /// True page count of the document, regardless of the page cap.
    pub page_count: u32,
    pub pages_processed: u32,
    pub strategy: ExtractionStrategy,
    /// Pages whose OCR failed and were left empty (only with `ocr.skip_failed_pages`).
    pub skipped_pages: Vec<u32>,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn truncated(&self) -> bool {
        self.pages_processed < self.page_count
    }
}

pub struct Extractor {
    cfg: Config,
    text_layer: Box<dyn TextLayer>,
    rasterizer: Box<dyn Rasterizer>,
    ocr: Box<dyn Ocr>,
}

impl Extractor {
    pub fn new(
        cfg: &Config,
        text_layer: Box<dyn TextLayer>,
        rasterizer: Box<dyn Rasterizer>,
        ocr: Box<dyn Ocr>,
    ) -> Self {
        Self {
            cfg: cfg.clone(),
            text_layer,
            rasterizer,
            ocr,
        }
    }

    /// lopdf for the text layer, pdftoppm + tesseract for the OCR path.
    pub fn with_system_tools(cfg: &Config) -> Self {
        Self::new(
            cfg,
            Box::new(LopdfTextLayer),
            Box::new(PdftoppmRasterizer::new(cfg)),
            Box::new(TesseractOcr::new(cfg)),
        )
    }

    pub fn extract(&self, doc: &Document<'_>) -> Result<ExtractedText> {
        let name = doc.source_name();
        let data = doc.bytes()?;
        let max_pages = self.cfg.extraction.max_pages;

        let layer = self.text_layer.read_pages(&data, max_pages)?;
        let pages_processed = u32::try_from(layer.pages.len()).unwrap_or(u32::MAX);
        if layer.page_count > pages_processed {
            warn!(
                "{name}: page cap reached, reading {pages_processed} of {} pages",
                layer.page_count
            );
        }

        let text = self.assemble(&layer.pages);
        let strategy = policy::choose_extraction(&self.cfg, text.chars().count());
        info!(
            "extract {name} page_count={} text_layer_chars={} strategy={:?}",
            layer.page_count,
            text.chars().count(),
            strategy
        );

        let (text, skipped_pages) = match strategy {
            ExtractionStrategy::TextLayer => (text, Vec::new()),
            ExtractionStrategy::Ocr if pages_processed == 0 => (String::new(), Vec::new()),
            ExtractionStrategy::Ocr => self.ocr_document(doc, &data, pages_processed)?,
        };

        Ok(ExtractedText {
            text,
            page_count: layer.page_count,
            pages_processed,
            strategy,
            skipped_pages,
        })
    }

    fn assemble(&self, pages: &[String]) -> String {
        if self.cfg.extraction.normalize_text {
            let cleaned: Vec<String> = pages.iter().map(|p| clean::normalize_page(p)).collect();
            clean::join_pages(&cleaned, &self.cfg.extraction.page_marker)
        } else {
            clean::join_pages(pages, &self.cfg.extraction.page_marker)
        }
    }

    fn ocr_document(
        &self,
        doc: &Document<'_>,
        data: &[u8],
        last_page: u32,
    ) -> Result<(String, Vec<u32>)> {
        let scratch = tempfile::Builder::new().prefix("pdf-brief-ocr-").tempdir()?;

        let pdf_path: PathBuf = match doc {
            Document::Path(p) => p.to_path_buf(),
            Document::Bytes { .. } => {
                let p = scratch.path().join("input.pdf");
                std::fs::write(&p, data)?;
                p
            }
        };
        let images_dir = scratch.path().join("pages");
        std::fs::create_dir_all(&images_dir)?;

        let images = self
            .rasterizer
            .render_pages(&pdf_path, last_page, &images_dir)?;
        info!("ocr {} page images at {} dpi", images.len(), self.cfg.ocr.dpi);

        let results = self.recognize(&images);

        let mut pages = Vec::with_capacity(images.len());
        let mut skipped = Vec::new();
        for (img, res) in images.iter().zip(results) {
            match res {
                Ok(text) => pages.push(text),
                Err(err) if self.cfg.ocr.skip_failed_pages => {
                    warn!("OCR failed on page {}; leaving it empty: {err}", img.page_number);
                    skipped.push(img.page_number);
                    pages.push(String::new());
                }
                Err(err) => return Err(err),
            }
        }

        Ok((self.assemble(&pages), skipped))
    }

    /// Runs OCR in batches of `ocr.parallel_pages`; output order follows `images`.
    fn recognize(&self, images: &[PageImage]) -> Vec<Result<String>> {
        let lang = self.cfg.ocr.lang.as_deref();
        let batch = self.cfg.ocr.parallel_pages.max(1);
        let ocr: &dyn Ocr = self.ocr.as_ref();

        let mut results = Vec::with_capacity(images.len());
        for group in images.chunks(batch) {
            if group.len() == 1 {
                results.push(ocr.image_to_text(&group[0].path, lang));
                continue;
            }
            std::thread::scope(|s| {
                let handles: Vec<_> = group
                    .iter()
                    .map(|img| s.spawn(move || ocr.image_to_text(&img.path, lang)))
                    .collect();
                for h in handles {
                    results.push(
                        h.join()
                            .unwrap_or_else(|_| Err(BriefError::extraction("OCR worker panicked"))),
                    );
                }
            });
        }
        results
    }
}
