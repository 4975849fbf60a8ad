use super::Summarizer;
use crate::error::{BriefError, Result};
use std::time::Duration;
use tracing::warn;

/// Candidate providers tried in order on every call; the first success wins.
pub struct ProviderChain {
    name: String,
    providers: Vec<Box<dyn Summarizer>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn Summarizer>>) -> Result<Self> {
        if providers.is_empty() {
            return Err(BriefError::configuration("no summarization providers configured"));
        }
        let name = providers
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(" > ");
        Ok(Self { name, providers })
    }
}

impl Summarizer for ProviderChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn summarize(&self, text: &str, target_words: usize) -> Result<String> {
        let mut last_err = None;
        for provider in &self.providers {
            match provider.summarize(text, target_words) {
                Ok(summary) => return Ok(summary),
                Err(err) => {
                    warn!("provider {} failed: {err}", provider.name());
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| BriefError::summarization("no providers available")))
    }

    fn pacing(&self) -> Duration {
        self.providers
            .iter()
            .map(|p| p.pacing())
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
