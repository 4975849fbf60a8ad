use crate::error::BriefError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: Extraction,
    #[serde(default)]
    pub ocr: Ocr,
    #[serde(default)]
    pub chunking: Chunking,
    #[serde(default)]
    pub reduce: Reduce,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub security: Security,
    #[serde(default)]
    pub limits: Limits,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// Rejects settings the core cannot run with.
    pub fn validate(&self) -> std::result::Result<(), BriefError> {
        if self.chunking.chunk_size == 0 {
            return Err(BriefError::configuration("chunking.chunk_size must be > 0"));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(BriefError::configuration(format!(
                "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.overlap, self.chunking.chunk_size
            )));
        }
        if self.reduce.convergence_factor < 1.0 {
            return Err(BriefError::configuration(format!(
                "reduce.convergence_factor must be >= 1.0, got {}",
                self.reduce.convergence_factor
            )));
        }
        if self.reduce.extractive_max_sentences == 0 {
            return Err(BriefError::configuration(
                "reduce.extractive_max_sentences must be > 0",
            ));
        }
        if self.ocr.parallel_pages == 0 {
            return Err(BriefError::configuration("ocr.parallel_pages must be >= 1"));
        }
        if self.reduce.mode == SummaryMode::Model && self.provider.models.is_empty() {
            return Err(BriefError::configuration(
                "provider.models is empty but reduce.mode = \"model\"",
            ));
        }
        Ok(())
    }
}

/// Which summarization backend the reducer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Hosted generative model, chunked map-reduce for long inputs.
    Model,
    /// Local leading-sentence extraction, no model call.
    Extractive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Extraction {
    pub ocr_threshold: usize,
    pub max_pages: u32,
    pub page_marker: String,
    pub normalize_text: bool,
}
impl Default for Extraction {
    fn default() -> Self {
        Self {
            ocr_threshold: 200,
            max_pages: 50,
            page_marker: "\n===PAGE===\n".into(),
            normalize_text: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Ocr {
    pub dpi: u32,
    pub lang: Option<String>,
    pub pdftoppm_exe: String,
    pub tesseract_exe: String,
    pub timeout_seconds: u64,
    pub parallel_pages: usize,
    pub skip_failed_pages: bool,
}
impl Default for Ocr {
    fn default() -> Self {
        Self {
            dpi: 200,
            lang: None,
            pdftoppm_exe: "pdftoppm".into(),
            tesseract_exe: "tesseract".into(),
            timeout_seconds: 120,
            parallel_pages: 1,
            skip_failed_pages: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Chunking {
    pub chunk_size: usize,
    pub overlap: usize,
}
impl Default for Chunking {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Reduce {
    pub mode: SummaryMode,
    pub large_doc_threshold: usize,
    pub convergence_factor: f64,
    pub map_reduce: bool,
    pub extractive_max_sentences: usize,
    pub default_target_words: usize,
}
impl Default for Reduce {
    fn default() -> Self {
        Self {
            mode: SummaryMode::Model,
            large_doc_threshold: 5000,
            convergence_factor: 1.2,
            map_reduce: true,
            extractive_max_sentences: 5,
            default_target_words: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    pub kind: String,
    pub endpoint: String,
    pub models: Vec<String>,
    pub api_key_env: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub input_char_limit: usize,
    pub call_delay_ms: u64,
    pub timeout_seconds: u64,
    pub prompt: String,
}
impl Default for Provider {
    fn default() -> Self {
        Self {
            kind: "gemini".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            models: vec!["gemini-2.0-flash".into(), "gemini-1.5-flash".into()],
            api_key_env: "GEMINI_API_KEY".into(),
            temperature: 0.3,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1000,
            input_char_limit: 10_000,
            call_delay_ms: 500,
            timeout_seconds: 120,
            prompt: DEFAULT_PROMPT.into(),
        }
    }
}

pub const DEFAULT_PROMPT: &str = "Write a concise, informative summary of the text below.
Capture the main points and the most important ideas.
If the text is technical, focus on the core concepts and conclusions.

Use at most {max_length} words.

Text to summarize:
{text}
";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "pdf-brief.log".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Security {
    pub reject_url_inputs: bool,
    pub require_pdf_extension: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
            require_pdf_extension: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_input_file_bytes: u64,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_file_bytes: 200 * 1024 * 1024,
        }
    }
}
