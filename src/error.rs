//! Error kinds surfaced by the extraction and summarization core.
//!
//! Per-chunk summarization failures never show up here on their own: the
//! reducer drops them and only reports [`BriefError::Summarization`] once
//! every chunk has failed.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BriefError>;

#[derive(Debug, Error)]
pub enum BriefError {
    /// The document could not be parsed, rasterized or recognized.
    #[error("extraction failed: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Extraction worked but produced no text, even after OCR.
    #[error("document yielded no extractable text: {source_name}")]
    EmptyDocument { source_name: String },

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BriefError {
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            source: None,
        }
    }

    pub fn extraction_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Extraction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn summarization(message: impl Into<String>) -> Self {
        Self::Summarization(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
