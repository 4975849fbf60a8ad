use pdf_brief::{
    config::{Config, SummaryMode},
    policy::{choose_extraction, choose_reduce, target_words_for_level, ExtractionStrategy, ReduceStrategy},
};

#[test]
fn short_text_layer_means_ocr() {
    let cfg = Config::default();
    assert_eq!(choose_extraction(&cfg, 0), ExtractionStrategy::Ocr);
    assert_eq!(choose_extraction(&cfg, 199), ExtractionStrategy::Ocr);
    assert_eq!(choose_extraction(&cfg, 200), ExtractionStrategy::TextLayer);
}

#[test]
fn large_documents_go_through_map_reduce() {
    let cfg = Config::default();
    assert_eq!(choose_reduce(&cfg, SummaryMode::Model, 4999), ReduceStrategy::SinglePass);
    assert_eq!(choose_reduce(&cfg, SummaryMode::Model, 5000), ReduceStrategy::MapReduce);
    assert_eq!(
        choose_reduce(&cfg, SummaryMode::Extractive, 100_000),
        ReduceStrategy::Extractive
    );
}

#[test]
fn map_reduce_can_be_disabled() {
    let mut cfg = Config::default();
    cfg.reduce.map_reduce = false;
    assert_eq!(choose_reduce(&cfg, SummaryMode::Model, 100_000), ReduceStrategy::SinglePass);
}

#[test]
fn length_levels_map_to_word_targets() {
    let targets: Vec<usize> = (1..=5).map(target_words_for_level).collect();
    assert_eq!(targets, vec![150, 250, 350, 500, 700]);
    assert_eq!(target_words_for_level(9), 300);
}
