use crate::config::{Config, SummaryMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    /// Keep the embedded text layer.
    TextLayer,
    /// Drop the text layer and recognize rendered pages instead.
    Ocr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReduceStrategy {
    SinglePass,
    MapReduce,
    Extractive,
}

/// Whole-document decision: a text layer shorter than the threshold is
/// treated as a scan.
pub fn choose_extraction(cfg: &Config, text_layer_chars: usize) -> ExtractionStrategy {
    if text_layer_chars < cfg.extraction.ocr_threshold {
        ExtractionStrategy::Ocr
    } else {
        ExtractionStrategy::TextLayer
    }
}

pub fn choose_reduce(cfg: &Config, mode: SummaryMode, text_chars: usize) -> ReduceStrategy {
    match mode {
        SummaryMode::Extractive => ReduceStrategy::Extractive,
        SummaryMode::Model => {
            if cfg.reduce.map_reduce && text_chars >= cfg.reduce.large_doc_threshold {
                ReduceStrategy::MapReduce
            } else {
                ReduceStrategy::SinglePass
            }
        }
    }
}

/// Maps the 1 (shortest) to 5 (longest) length scale onto a word target.
pub fn target_words_for_level(level: u8) -> usize {
    match level {
        1 => 150,
        2 => 250,
        3 => 350,
        4 => 500,
        5 => 700,
        _ => 300,
    }
}
