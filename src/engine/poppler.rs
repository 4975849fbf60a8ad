//! Subprocess backends: `pdftoppm` for page rendering, `tesseract` for OCR.

use super::{Ocr, PageImage, Rasterizer, ToolDiag};
use crate::config::Config;
use crate::error::{BriefError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct PdftoppmRasterizer {
    exe: PathBuf,
    dpi: u32,
    timeout: Duration,
}

impl PdftoppmRasterizer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            exe: PathBuf::from(&cfg.ocr.pdftoppm_exe),
            dpi: cfg.ocr.dpi,
            timeout: Duration::from_secs(cfg.ocr.timeout_seconds),
        }
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn render_pages(&self, pdf: &Path, last_page: u32, out_dir: &Path) -> Result<Vec<PageImage>> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg(last_page.to_string())
            .arg(pdf)
            .arg(out_dir.join("page"));

        let output = run_tool(cmd, "pdftoppm", self.timeout)?;
        if !output.status.success() {
            return Err(BriefError::extraction(format!(
                "pdftoppm failed on {}: {}",
                pdf.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        collect_page_images(out_dir)
    }
}

/// pdftoppm names pages `page-1.png` or `page-001.png` depending on page
/// count, so the number after the last '-' is parsed rather than guessed.
pub fn collect_page_images(dir: &Path) -> Result<Vec<PageImage>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        let number = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.rsplit_once('-'))
            .and_then(|(_, n)| n.parse::<u32>().ok());
        if let Some(page_number) = number {
            images.push(PageImage { page_number, path });
        }
    }
    images.sort_by_key(|img| img.page_number);

    if images.is_empty() {
        return Err(BriefError::extraction("pdftoppm produced no page images"));
    }
    Ok(images)
}

pub struct TesseractOcr {
    exe: PathBuf,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(cfg: &Config) -> Self {
        Self {
            exe: PathBuf::from(&cfg.ocr.tesseract_exe),
            timeout: Duration::from_secs(cfg.ocr.timeout_seconds),
        }
    }
}

impl Ocr for TesseractOcr {
    fn image_to_text(&self, image: &Path, lang: Option<&str>) -> Result<String> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg(image).arg("stdout");
        if let Some(lang) = lang {
            cmd.arg("-l").arg(lang);
        }

        let output = run_tool(cmd, "tesseract", self.timeout)?;
        if !output.status.success() {
            return Err(BriefError::extraction(format!(
                "tesseract failed on {}: {}",
                image.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).replace('\x0c', ""))
    }
}

/// Probes an external tool by asking it for its version.
pub fn tool_diag(name: &str, exe: &str, version_flag: &str) -> ToolDiag {
    let out = Command::new(exe)
        .arg(version_flag)
        .stdin(Stdio::null())
        .output();
    match out {
        Ok(o) => {
            // pdftoppm prints its version on stderr, tesseract on stdout.
            let text = if o.stdout.is_empty() { o.stderr } else { o.stdout };
            let version = String::from_utf8_lossy(&text)
                .lines()
                .next()
                .map(|l| l.trim().to_string());
            ToolDiag {
                name: name.to_string(),
                exe: exe.to_string(),
                available: o.status.success(),
                version,
                error: None,
            }
        }
        Err(e) => ToolDiag {
            name: name.to_string(),
            exe: exe.to_string(),
            available: false,
            version: None,
            error: Some(e.to_string()),
        },
    }
}

fn run_tool(mut cmd: Command, name: &str, timeout: Duration) -> Result<Output> {
    debug!("{name} run {:?} timeout={:?}", cmd, timeout);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| BriefError::extraction_with_source(format!("spawning {name}"), e))?;

    if timeout.is_zero() {
        return child
            .wait_with_output()
            .map_err(|e| BriefError::extraction_with_source(format!("waiting for {name}"), e));
    }
    wait_with_timeout(&mut child, name, timeout)
}

fn wait_with_timeout(child: &mut Child, name: &str, timeout: Duration) -> Result<Output> {
    // Drain pipes while waiting; a chatty child must never block on a full buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let join = |handle: std::thread::JoinHandle<std::io::Result<Vec<u8>>>| -> Result<Vec<u8>> {
        handle
            .join()
            .map_err(|_| BriefError::extraction(format!("{name} pipe reader panicked")))?
            .map_err(BriefError::from)
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            let stdout = join(stdout_thread)?;
            let stderr = join(stderr_thread)?;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("{name} timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait()?;
            let stderr = join(stderr_thread)?;
            let _ = join(stdout_thread);
            return Err(BriefError::extraction(format!(
                "{name} exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
