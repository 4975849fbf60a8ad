use crate::{
    chunk_plan::ChunkPlan,
    config::{Config, SummaryMode},
    document::Document,
    engine::poppler::tool_diag,
    extract::Extractor,
    pipeline::Pipeline,
    policy::{self, ReduceStrategy},
    summarize,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "pdf-brief")]
#[command(about = "Summarize PDFs (text layer or OCR, chunked map-reduce summarization)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./pdf-brief.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check external OCR tools and provider credentials.
    Doctor {},
    /// Extract text and report how it was obtained.
    Extract {
        #[arg(long)]
        input: PathBuf,
        /// Also print the extracted text.
        #[arg(long)]
        print_text: bool,
    },
    /// Show the chunk plan and reduce strategy without summarizing.
    Plan {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        mode: Option<SummaryMode>,
    },
    Run {
        #[arg(long)]
        input: PathBuf,
        /// Target summary length in words.
        #[arg(long)]
        words: Option<usize>,
        /// Length level from 1 (shortest) to 5 (longest).
        #[arg(long, conflicts_with = "words", value_parser = clap::value_parser!(u8).range(1..=5))]
        length: Option<u8>,
        #[arg(long, value_enum)]
        mode: Option<SummaryMode>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let mut cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let mode_override = match &args.cmd {
        Command::Plan { mode, .. } | Command::Run { mode, .. } => *mode,
        _ => None,
    };
    if let Some(mode) = mode_override {
        cfg.reduce.mode = mode;
    }
    cfg.validate()?;

    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Extract { input, print_text } => extract(&cfg, input, *print_text),
        Command::Plan { input, .. } => plan(&cfg, input),
        Command::Run {
            input,
            words,
            length,
            ..
        } => {
            let target_words = match (words, length) {
                (Some(w), _) => *w,
                (None, Some(level)) => policy::target_words_for_level(*level),
                (None, None) => cfg.reduce.default_target_words,
            };
            run(&cfg, input, target_words)
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["pdf-brief.toml", "pdf-brief.example.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the JSON result, so log lines go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            ensure_dir(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let api_key_set = std::env::var(&cfg.provider.api_key_env)
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false);
    let report = serde_json::json!({
        "tools": [
            tool_diag("pdftoppm", &cfg.ocr.pdftoppm_exe, "-v"),
            tool_diag("tesseract", &cfg.ocr.tesseract_exe, "--version"),
        ],
        "provider": {
            "kind": cfg.provider.kind,
            "models": cfg.provider.models,
            "api_key_env": cfg.provider.api_key_env,
            "api_key_set": api_key_set,
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn extract(cfg: &Config, input: &Path, print_text: bool) -> Result<()> {
    validate_input(cfg, input)?;
    let extractor = Extractor::with_system_tools(cfg);
    let extracted = extractor
        .extract(&Document::from_path(input))
        .with_context(|| format!("extracting {}", input.display()))?;

    let mut out = serde_json::json!({
        "input": input,
        "page_count": extracted.page_count,
        "pages_processed": extracted.pages_processed,
        "strategy": extracted.strategy,
        "chars": extracted.text.chars().count(),
        "skipped_pages": extracted.skipped_pages,
    });
    if print_text {
        out["text"] = serde_json::Value::String(extracted.text);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn plan(cfg: &Config, input: &Path) -> Result<()> {
    validate_input(cfg, input)?;
    let extractor = Extractor::with_system_tools(cfg);
    let extracted = extractor
        .extract(&Document::from_path(input))
        .with_context(|| format!("extracting {}", input.display()))?;

    let strategy = policy::choose_reduce(cfg, cfg.reduce.mode, extracted.text.chars().count());
    let chunk_plan = if strategy == ReduceStrategy::MapReduce {
        Some(ChunkPlan::from_config(cfg, &extracted.text)?)
    } else {
        None
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": input,
            "page_count": extracted.page_count,
            "extraction": extracted.strategy,
            "reduce": strategy,
            "chunk_plan": chunk_plan,
        }))?
    );
    Ok(())
}

fn run(cfg: &Config, input: &Path, target_words: usize) -> Result<()> {
    validate_input(cfg, input)?;

    let summarizer = summarize::from_config(cfg, cfg.reduce.mode)?;
    info!(
        "input={} mode={:?} summarizer={} target_words={}",
        input.display(),
        cfg.reduce.mode,
        summarizer.name(),
        target_words
    );
    let pipeline = Pipeline::new(cfg, Extractor::with_system_tools(cfg), summarizer);

    let started = now_rfc3339();
    let output = pipeline
        .run(&Document::from_path(input), target_words, cfg.reduce.mode)
        .with_context(|| format!("summarizing {}", input.display()))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": input,
            "started": started,
            "finished": now_rfc3339(),
            "summary": output.summary,
            "stats": output.stats,
        }))?
    );
    Ok(())
}

fn validate_input(cfg: &Config, input: &Path) -> Result<()> {
    let input_str = input.display().to_string();

    if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
        return Err(anyhow!("URL inputs are disabled: {input_str}"));
    }

    let meta = std::fs::metadata(input)
        .with_context(|| format!("input does not exist: {}", input.display()))?;
    if meta.len() > cfg.limits.max_input_file_bytes {
        return Err(anyhow!(
            "input exceeds max_input_file_bytes ({} > {})",
            meta.len(),
            cfg.limits.max_input_file_bytes
        ));
    }

    match input.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => {}
        Some(_) if cfg.security.require_pdf_extension => {
            return Err(anyhow!("input is not a PDF: {}", input.display()));
        }
        _ => warn!("input has no .pdf extension; assuming PDF: {}", input.display()),
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}
