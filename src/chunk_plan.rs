use crate::{
    config::Config,
    error::{BriefError, Result},
};
use serde::Serialize;

/// Characters a chunk may end in front of.
pub const BOUNDARY_CHARS: [char; 6] = [' ', '\n', '.', ',', ';', ':'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk<'a> {
    pub index: usize,
    pub start: usize, // byte offset, inclusive
    pub end: usize,   // byte offset, exclusive
    /// Leading characters repeated from the previous chunk.
    pub overlap: usize,
    #[serde(skip)]
    pub text: &'a str,
}

impl Chunk<'_> {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkPlan<'a> {
    pub text_chars: usize,
    pub chunk_size: usize,
    pub overlap: usize,
    pub chunks: Vec<Chunk<'a>>,
}

impl<'a> ChunkPlan<'a> {
    pub fn from_config(cfg: &Config, text: &'a str) -> Result<Self> {
        let chunks = split(text, cfg.chunking.chunk_size, cfg.chunking.overlap)?;
        Ok(ChunkPlan {
            text_chars: text.chars().count(),
            chunk_size: cfg.chunking.chunk_size,
            overlap: cfg.chunking.overlap,
            chunks,
        })
    }
}

/// Splits `text` into overlapping windows of at most `chunk_size` characters.
///
/// A window's right edge is walked back onto a [`BOUNDARY_CHARS`] character
/// when one exists inside the window's new content; otherwise the raw cut
/// is kept. Each following window starts `overlap` characters before the
/// previous end and always strictly after the previous start.
///
/// The walk-back stops at the previous chunk's end, so a window whose only
/// boundary lies in the overlap region is cut raw, possibly mid-word.
pub fn split(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk<'_>>> {
    if chunk_size == 0 {
        return Err(BriefError::configuration("chunk_size must be > 0"));
    }
    if overlap >= chunk_size {
        return Err(BriefError::configuration(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    if n <= chunk_size {
        return Ok(vec![Chunk {
            index: 0,
            start: 0,
            end: text.len(),
            overlap: 0,
            text,
        }]);
    }

    // offsets[i] is the byte offset of char i; offsets[n] == text.len()
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut prev_end = 0usize;
    loop {
        let mut end = start + chunk_size;
        if end >= n {
            end = n;
        } else {
            // Never walk back into text the previous chunk already ended on.
            let floor = start.max(prev_end);
            let raw = end;
            while end > floor && !BOUNDARY_CHARS.contains(&chars[end]) {
                end -= 1;
            }
            if end == floor {
                end = raw;
            }
        }

        chunks.push(Chunk {
            index: chunks.len(),
            start: offsets[start],
            end: offsets[end],
            overlap: prev_end.saturating_sub(start),
            text: &text[offsets[start]..offsets[end]],
        });

        if end == n {
            break;
        }
        prev_end = end;
        start = end.saturating_sub(overlap).max(start + 1);
    }

    Ok(chunks)
}
