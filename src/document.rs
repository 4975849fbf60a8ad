use crate::error::{BriefError, Result};
use std::borrow::Cow;
use std::path::Path;

/// A PDF handed in by the caller. The core only borrows it for extraction.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    Path(&'a Path),
    Bytes { name: &'a str, data: &'a [u8] },
}

impl<'a> Document<'a> {
    pub fn from_path(path: &'a Path) -> Self {
        Document::Path(path)
    }

    pub fn from_bytes(name: &'a str, data: &'a [u8]) -> Self {
        Document::Bytes { name, data }
    }

    /// Name used in logs and error messages only.
    pub fn source_name(&self) -> Cow<'a, str> {
        match *self {
            Document::Path(p) => Cow::Owned(p.display().to_string()),
            Document::Bytes { name, .. } => Cow::Borrowed(name),
        }
    }

    pub fn bytes(&self) -> Result<Cow<'a, [u8]>> {
        match *self {
            Document::Path(p) => {
                let data = std::fs::read(p).map_err(|e| {
                    BriefError::extraction_with_source(format!("reading {}", p.display()), e)
                })?;
                Ok(Cow::Owned(data))
            }
            Document::Bytes { data, .. } => Ok(Cow::Borrowed(data)),
        }
    }
}
