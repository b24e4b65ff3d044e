//! End-to-end interpretation against a real downloaded model.
//!
//! Ignored by default: the first run downloads the DistilBERT MNLI export
//! into the configured model directory and needs network access. Run with
//! `cargo test -p prism-core --test end_to_end -- --ignored`.

use prism_core::{Config, ExplanationEngine, InterpretationRequest, ModelLoader};

#[tokio::test]
#[ignore = "Requires network access and downloads model weights"]
async fn distilbert_interprets_the_default_example() {
    let config = Config::default();
    let loader = ModelLoader::new(&config);

    let model = loader
        .load("typeform/distilbert-base-uncased-mnli")
        .await
        .expect("model download and load");

    let mut engine = ExplanationEngine::new(model, &config.interpret.hypothesis_template);
    let request = InterpretationRequest::new(
        config.interpret.default_text.clone(),
        config.interpret.candidate_labels.clone(),
    )
    .with_batch_size(config.interpret.batch_size);

    let result = engine.interpret(&request).expect("interpretation");

    assert!(
        config
            .interpret
            .candidate_labels
            .contains(&result.predicted_label),
        "predicted '{}' is not a candidate",
        result.predicted_label
    );
    assert_eq!(result.scores.len(), config.interpret.candidate_labels.len());
    let total: f32 = result.scores.iter().map(|s| s.score).sum();
    assert!((total - 1.0).abs() < 1e-3, "scores sum to {total}");

    assert!(!result.attributions.is_empty());
    assert!(
        result
            .attributions
            .iter()
            .any(|a| a.token.to_lowercase().contains("toyota")),
        "attributions should cover the input tokens"
    );

    let html = result
        .visualization_html
        .as_deref()
        .expect("visualization document");
    assert!(html.contains(&result.predicted_label));

    assert_eq!(loader.cached_count().await, 1);
}
