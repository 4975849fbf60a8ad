//! The summarization capability the reducer drives.
//!
//! Every backend answers `summarize(text, target_words)` and may fail; the
//! reducer decides what a failure means (chunk exclusion or a final error).

pub mod chain;
pub mod extractive;
pub mod gemini;

use crate::config::{Config, SummaryMode};
use crate::error::{BriefError, Result};
use std::time::Duration;

pub use chain::ProviderChain;
pub use extractive::ExtractiveSummarizer;
pub use gemini::GeminiSummarizer;

pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    fn summarize(&self, text: &str, target_words: usize) -> Result<String>;

    /// Minimum pause between successive calls. Zero for local backends.
    fn pacing(&self) -> Duration {
        Duration::ZERO
    }
}

/// Builds the backend for `mode`. Model mode reads credentials here, so a
/// missing API key surfaces as a configuration error before any work starts.
pub fn from_config(cfg: &Config, mode: SummaryMode) -> Result<Box<dyn Summarizer>> {
    match mode {
        SummaryMode::Extractive => Ok(Box::new(ExtractiveSummarizer::new(
            cfg.reduce.extractive_max_sentences,
        ))),
        SummaryMode::Model => {
            if cfg.provider.kind != "gemini" {
                return Err(BriefError::configuration(format!(
                    "unsupported provider.kind: {}",
                    cfg.provider.kind
                )));
            }
            let providers = cfg
                .provider
                .models
                .iter()
                .map(|model| {
                    GeminiSummarizer::new(cfg, model).map(|g| Box::new(g) as Box<dyn Summarizer>)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Box::new(ProviderChain::new(providers)?))
        }
    }
}
