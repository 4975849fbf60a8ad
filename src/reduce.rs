use crate::{
    chunk_plan,
    config::{Config, SummaryMode},
    error::{BriefError, Result},
    policy::{self, ReduceStrategy},
    summarize::{ExtractiveSummarizer, Summarizer},
    util::word_count,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceOutcome {
    pub summary: String,
    pub strategy: ReduceStrategy,
    pub chunk_count: usize,
    /// Indices of chunks dropped from the combination step.
    pub failed_chunks: Vec<usize>,
    /// Whether the combined partials were summarized once more.
    pub second_pass: bool,
    pub calls: usize,
}

pub struct Reducer<'s> {
    cfg: &'s Config,
    summarizer: &'s dyn Summarizer,
}

impl<'s> Reducer<'s> {
    pub fn new(cfg: &'s Config, summarizer: &'s dyn Summarizer) -> Self {
        Self { cfg, summarizer }
    }

    pub fn reduce(&self, text: &str, target_words: usize, mode: SummaryMode) -> Result<ReduceOutcome> {
        if target_words == 0 {
            return Err(BriefError::configuration("target_words must be > 0"));
        }

        let strategy = policy::choose_reduce(self.cfg, mode, text.chars().count());
        info!(
            "reduce strategy={:?} summarizer={} target_words={}",
            strategy,
            self.summarizer.name(),
            target_words
        );

        match strategy {
            ReduceStrategy::Extractive => {
                let local = ExtractiveSummarizer::new(self.cfg.reduce.extractive_max_sentences);
                let summary = local.summarize(text, target_words)?;
                Ok(single(summary, strategy, 0))
            }
            ReduceStrategy::SinglePass => {
                let summary = self.summarizer.summarize(text, target_words)?;
                if summary.trim().is_empty() {
                    return Err(BriefError::summarization("summarizer returned no content"));
                }
                Ok(single(summary, strategy, 1))
            }
            ReduceStrategy::MapReduce => self.map_reduce(text, target_words),
        }
    }

    fn map_reduce(&self, text: &str, target_words: usize) -> Result<ReduceOutcome> {
        let chunks = chunk_plan::split(
            text,
            self.cfg.chunking.chunk_size,
            self.cfg.chunking.overlap,
        )?;
        let total = chunks.len();
        let per_chunk = (target_words / total).max(1);
        let pacing = self.summarizer.pacing();

        let mut partials = Vec::with_capacity(total);
        let mut failed_chunks = Vec::new();
        let mut calls = 0;

        for chunk in &chunks {
            if calls > 0 && !pacing.is_zero() {
                std::thread::sleep(pacing);
            }
            info!(
                "chunk {}/{} chars={} words_budget={}",
                chunk.index + 1,
                total,
                chunk.char_len(),
                per_chunk
            );

            calls += 1;
            match self.summarizer.summarize(chunk.text, per_chunk) {
                Ok(s) if !s.trim().is_empty() => partials.push(s),
                Ok(_) => {
                    warn!("chunk {} returned an empty summary; excluded", chunk.index);
                    failed_chunks.push(chunk.index);
                }
                Err(err) => {
                    warn!("chunk {} failed; excluded: {err}", chunk.index);
                    failed_chunks.push(chunk.index);
                }
            }
        }

        if partials.is_empty() {
            return Err(BriefError::summarization(format!(
                "no content summarized: all {total} chunks failed"
            )));
        }

        let combined = partials.join(" ");
        let words = word_count(&combined);
        let limit = self.cfg.reduce.convergence_factor * target_words as f64;

        let (summary, second_pass) = if words as f64 > limit {
            info!("combined summary has {words} words (> {limit:.0}); summarizing once more");
            if !pacing.is_zero() {
                std::thread::sleep(pacing);
            }
            calls += 1;
            let condensed = self.summarizer.summarize(&combined, target_words)?;
            if condensed.trim().is_empty() {
                return Err(BriefError::summarization("summarizer returned no content"));
            }
            (condensed, true)
        } else {
            (combined, false)
        };

        Ok(ReduceOutcome {
            summary,
            strategy: ReduceStrategy::MapReduce,
            chunk_count: total,
            failed_chunks,
            second_pass,
            calls,
        })
    }
}

/// `calls` counts summarizer invocations only; the local extractive path makes none.
fn single(summary: String, strategy: ReduceStrategy, calls: usize) -> ReduceOutcome {
    ReduceOutcome {
        summary,
        strategy,
        chunk_count: 1,
        failed_chunks: Vec::new(),
        second_pass: false,
        calls,
    }
}
