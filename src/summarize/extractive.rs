use super::Summarizer;
use crate::error::{BriefError, Result};
use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence regex"));

/// Local, deterministic backend: the first N sentences of the text.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    max_sentences: usize,
}

impl ExtractiveSummarizer {
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    fn summarize(&self, text: &str, _target_words: usize) -> Result<String> {
        if text.trim().is_empty() {
            return Err(BriefError::summarization("no text to summarize"));
        }
        Ok(leading_sentences(text, self.max_sentences))
    }
}

/// Collapses whitespace, then keeps the first `max_sentences` sentences.
/// The result always ends in sentence punctuation.
pub fn leading_sentences(text: &str, max_sentences: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sentences: Vec<&str> = Vec::new();
    let mut last = 0;
    for m in SENTENCE_END.find_iter(&normalized) {
        if sentences.len() >= max_sentences {
            break;
        }
        let sentence = normalized[last..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last = m.end();
    }
    if sentences.len() < max_sentences {
        let rest = normalized[last..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }
    }

    let mut out = sentences.join(" ");
    if !out.is_empty() && !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}
