use unicode_normalization::UnicodeNormalization;

/// Normalizes one page of text-layer or OCR output.
pub fn normalize_page(raw: &str) -> String {
    let s = raw.replace("\r\n", "\n").nfkc().collect::<String>();
    let s = strip_control_chars(&s);
    s.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_control_chars(s: &str) -> String {
    // Newlines and tabs carry layout; everything else in Cc goes.
    s.chars()
        .filter(|&ch| ch == '\n' || ch == '\t' || !ch.is_control())
        .collect()
}

/// Concatenates pages in order with `marker` between them, trimming the result.
/// All-blank input yields an empty string rather than a run of bare markers.
pub fn join_pages(pages: &[String], marker: &str) -> String {
    if pages.iter().all(|p| p.trim().is_empty()) {
        return String::new();
    }
    pages.join(marker).trim().to_string()
}
