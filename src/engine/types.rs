use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTexts {
    pub page_count: u32,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub page_number: u32, // 1-based
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDiag {
    pub name: String,
    pub exe: String,
    pub available: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
