mod common;

use common::{words_text, FakeOcr, FakeRasterizer, FakeSummarizer, FakeTextLayer};
use pdf_brief::{
    config::{Config, SummaryMode},
    document::Document,
    error::BriefError,
    extract::Extractor,
    policy::{ExtractionStrategy, ReduceStrategy},
    Pipeline,
};

const PDF: &[u8] = b"%PDF-1.7 fake";

fn pipeline(cfg: &Config, layer: FakeTextLayer, ocr: FakeOcr, fake: &FakeSummarizer) -> Pipeline {
    let extractor = Extractor::new(cfg, Box::new(layer), Box::new(FakeRasterizer::default()), Box::new(ocr));
    Pipeline::new(cfg, extractor, Box::new(fake.clone()))
}

#[test]
fn blank_document_stops_before_summarizing() {
    let cfg = Config::default();
    let fake = FakeSummarizer::fixed("never");
    let layer = FakeTextLayer::new(vec![String::new(), "  ".into()]);
    let ocr = FakeOcr::new(vec![String::new(), "\n".into()]);
    let p = pipeline(&cfg, layer, ocr.clone(), &fake);

    let err = p
        .run(&Document::from_bytes("blank.pdf", PDF), 300, SummaryMode::Model)
        .unwrap_err();

    assert!(matches!(err, BriefError::EmptyDocument { .. }));
    assert_eq!(ocr.call_count(), 2);
    assert_eq!(fake.call_count(), 0);
}

#[test]
fn long_digital_document_reports_stats() {
    let cfg = Config::default();
    let fake = FakeSummarizer::new(|i, _, _| Ok(format!("point {i}.")));
    let pages: Vec<String> = (0..4).map(|_| words_text(2000)).collect();
    let p = pipeline(&cfg, FakeTextLayer::new(pages), FakeOcr::default(), &fake);

    let out = p
        .run(&Document::from_bytes("report.pdf", PDF), 300, SummaryMode::Model)
        .unwrap();

    let stats = &out.stats;
    assert_eq!(stats.source_name, "report.pdf");
    assert_eq!(stats.page_count, 4);
    assert_eq!(stats.extraction, ExtractionStrategy::TextLayer);
    assert_eq!(stats.reduce, ReduceStrategy::MapReduce);
    assert!(stats.extracted_chars > 8000);
    assert_eq!(stats.summary_chars, out.summary.chars().count());
    assert_eq!(stats.chunk_count, fake.call_count());
    assert!(stats.elapsed_seconds >= 0.0);
    assert!(out.summary.starts_with("point 0."));
}

#[test]
fn scanned_document_is_summarized_from_ocr_text() {
    let cfg = Config::default();
    let fake = FakeSummarizer::fixed("A scanned memo about budgets.");
    let layer = FakeTextLayer::new(vec![String::new()]);
    let ocr = FakeOcr::new(vec!["Memo. The budget for next year is approved.".into()]);
    let p = pipeline(&cfg, layer, ocr, &fake);

    let out = p
        .run(&Document::from_bytes("memo.pdf", PDF), 150, SummaryMode::Model)
        .unwrap();

    assert_eq!(out.stats.extraction, ExtractionStrategy::Ocr);
    assert_eq!(out.stats.reduce, ReduceStrategy::SinglePass);
    assert_eq!(fake.calls()[0].0, "Memo. The budget for next year is approved.");
    assert_eq!(out.summary, "A scanned memo about budgets.");
}

#[test]
fn extractive_run_needs_no_model() {
    let cfg = Config::default();
    let fake = FakeSummarizer::fixed("unused");
    let layer = FakeTextLayer::new(vec![
        "First finding.   Second finding.\nThird finding. Fourth finding. Fifth finding. Sixth finding. ".repeat(4),
    ]);
    let p = pipeline(&cfg, layer, FakeOcr::default(), &fake);

    let out = p
        .run(&Document::from_bytes("notes.pdf", PDF), 300, SummaryMode::Extractive)
        .unwrap();

    assert_eq!(
        out.summary,
        "First finding. Second finding. Third finding. Fourth finding. Fifth finding."
    );
    assert_eq!(fake.call_count(), 0);
}

#[test]
fn total_summarization_failure_surfaces() {
    let cfg = Config::default();
    let fake = FakeSummarizer::new(|_, _, _| Err(BriefError::summarization("HTTP 503")));
    let pages: Vec<String> = (0..3).map(|_| words_text(3000)).collect();
    let p = pipeline(&cfg, FakeTextLayer::new(pages), FakeOcr::default(), &fake);

    let err = p
        .run(&Document::from_bytes("doc.pdf", PDF), 300, SummaryMode::Model)
        .unwrap_err();
    assert!(matches!(err, BriefError::Summarization(_)));
}
