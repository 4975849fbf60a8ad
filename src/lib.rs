//! PDF to bounded-length summary: text recovery with an OCR fallback,
//! overlap-aware chunking, and map-reduce summarization over a pluggable
//! summarizer.

pub mod chunk_plan;
pub mod clean;
pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod policy;
pub mod reduce;
pub mod report;
pub mod summarize;
pub mod util;

pub use document::Document;
pub use error::{BriefError, Result};
pub use pipeline::{Pipeline, PipelineOutput};
