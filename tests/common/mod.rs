#![allow(dead_code)]

use pdf_brief::{
    engine::{Ocr, PageImage, PageTexts, Rasterizer, TextLayer},
    error::{BriefError, Result},
    summarize::Summarizer,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Respond = dyn Fn(usize, &str, usize) -> Result<String> + Send + Sync;

/// Summarizer double that records `(input chars, target_words)` per call.
#[derive(Clone)]
pub struct FakeSummarizer {
    calls: Arc<Mutex<Vec<(String, usize)>>>,
    respond: Arc<Respond>,
    pacing: Duration,
}

impl FakeSummarizer {
    /// `respond(call_index, text, target_words)`
    pub fn new(respond: impl Fn(usize, &str, usize) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(respond),
            pacing: Duration::ZERO,
        }
    }

    pub fn fixed(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_, _, _| Ok(reply.clone()))
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Summarizer for FakeSummarizer {
    fn name(&self) -> &str {
        "fake"
    }

    fn summarize(&self, text: &str, target_words: usize) -> Result<String> {
        let idx = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), target_words));
            calls.len() - 1
        };
        (self.respond)(idx, text, target_words)
    }

    fn pacing(&self) -> Duration {
        self.pacing
    }
}

#[derive(Clone, Default)]
pub struct FakeTextLayer {
    pub page_count: u32,
    pub pages: Vec<String>,
    pub fail: bool,
    pub max_pages_seen: Arc<Mutex<Vec<u32>>>,
}

impl FakeTextLayer {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            page_count: pages.len() as u32,
            pages,
            ..Default::default()
        }
    }
}

impl TextLayer for FakeTextLayer {
    fn read_pages(&self, _pdf: &[u8], max_pages: u32) -> Result<PageTexts> {
        self.max_pages_seen.lock().unwrap().push(max_pages);
        if self.fail {
            return Err(BriefError::extraction("failed to parse PDF: corrupt xref"));
        }
        Ok(PageTexts {
            page_count: self.page_count,
            pages: self.pages.iter().take(max_pages as usize).cloned().collect(),
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeRasterizer {
    pub renders: Arc<Mutex<Vec<u32>>>,
}

impl Rasterizer for FakeRasterizer {
    fn render_pages(&self, _pdf: &Path, last_page: u32, out_dir: &Path) -> Result<Vec<PageImage>> {
        self.renders.lock().unwrap().push(last_page);
        Ok((1..=last_page)
            .map(|n| PageImage {
                page_number: n,
                path: out_dir.join(format!("page-{n}.png")),
            })
            .collect())
    }
}

/// Answers with `pages[n - 1]` for `page-n.png`; pages listed in `failing` error out.
#[derive(Clone, Default)]
pub struct FakeOcr {
    pub pages: Vec<String>,
    pub failing: Vec<u32>,
    pub calls: Arc<Mutex<Vec<u32>>>,
}

impl FakeOcr {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Ocr for FakeOcr {
    fn image_to_text(&self, image: &Path, _lang: Option<&str>) -> Result<String> {
        let n: u32 = image
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.rsplit_once('-'))
            .and_then(|(_, n)| n.parse().ok())
            .expect("page image name");
        self.calls.lock().unwrap().push(n);
        if self.failing.contains(&n) {
            return Err(BriefError::extraction(format!("tesseract failed on page {n}")));
        }
        Ok(self.pages.get(n as usize - 1).cloned().unwrap_or_default())
    }
}

/// Roughly `len` characters of space-separated words.
pub fn words_text(len: usize) -> String {
    "lorem ipsum dolor sit amet, consectetur adipiscing elit. "
        .repeat(len / 40 + 1)
        .chars()
        .take(len)
        .collect()
}
