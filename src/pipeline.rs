use crate::{
    config::{Config, SummaryMode},
    document::Document,
    error::{BriefError, Result},
    extract::Extractor,
    reduce::Reducer,
    report::RunStats,
    summarize::Summarizer,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

pub struct Pipeline {
    cfg: Config,
    extractor: Extractor,
    summarizer: Box<dyn Summarizer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub summary: String,
    pub stats: RunStats,
}

impl Pipeline {
    pub fn new(cfg: &Config, extractor: Extractor, summarizer: Box<dyn Summarizer>) -> Self {
        Self {
            cfg: cfg.clone(),
            extractor,
            summarizer,
        }
    }

    pub fn run(
        &self,
        doc: &Document<'_>,
        target_words: usize,
        mode: SummaryMode,
    ) -> Result<PipelineOutput> {
        let source_name = doc.source_name().into_owned();

        let extracted = self.extractor.extract(doc)?;
        if extracted.is_empty() {
            return Err(BriefError::EmptyDocument { source_name });
        }
        if extracted.truncated() {
            info!(
                "{source_name}: summarizing first {} of {} pages",
                extracted.pages_processed, extracted.page_count
            );
        }

        let started = Instant::now();
        let outcome = Reducer::new(&self.cfg, self.summarizer.as_ref()).reduce(
            &extracted.text,
            target_words,
            mode,
        )?;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        let stats = RunStats {
            source_name,
            page_count: extracted.page_count,
            pages_processed: extracted.pages_processed,
            extracted_chars: extracted.text.chars().count(),
            summary_chars: outcome.summary.chars().count(),
            elapsed_seconds,
            extraction: extracted.strategy,
            reduce: outcome.strategy,
            chunk_count: outcome.chunk_count,
            failed_chunks: outcome.failed_chunks,
            second_pass: outcome.second_pass,
            skipped_ocr_pages: extracted.skipped_pages,
        };
        info!(
            "done pages={} extracted_chars={} summary_chars={} elapsed={:.2}s",
            stats.page_count, stats.extracted_chars, stats.summary_chars, stats.elapsed_seconds
        );

        Ok(PipelineOutput {
            summary: outcome.summary,
            stats,
        })
    }
}
