use crate::policy::{ExtractionStrategy, ReduceStrategy};
use serde::{Deserialize, Serialize};

/// Read-only statistics for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub source_name: String,
    pub page_count: u32,
    pub pages_processed: u32,
    pub extracted_chars: usize,
    pub summary_chars: usize,
    /// Wall-clock time of the reduce stage.
    pub elapsed_seconds: f64,
    pub extraction: ExtractionStrategy,
    pub reduce: ReduceStrategy,
    pub chunk_count: usize,
    pub failed_chunks: Vec<usize>,
    pub second_pass: bool,
    pub skipped_ocr_pages: Vec<u32>,
}
