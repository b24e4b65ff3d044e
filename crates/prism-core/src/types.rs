//! Core data types for the Prism interpretation pipeline.
//!
//! These types represent a single interpretation request and the result of
//! running it through classification and attribution.

use serde::{Deserialize, Serialize};

/// A single interpretation request: classify a text against candidate labels
/// and explain the chosen label with per-token attributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationRequest {
    /// The text to classify and explain
    pub text: String,

    /// Candidate labels for zero-shot classification
    pub candidate_labels: Vec<String>,

    /// Label to attribute. When `None`, the predicted label is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,

    /// Sub-batch size for the attribution forward passes
    pub batch_size: usize,
}

impl InterpretationRequest {
    /// Create a request with the default sub-batch size of 2.
    pub fn new(text: impl Into<String>, candidate_labels: Vec<String>) -> Self {
        Self {
            text: text.into(),
            candidate_labels,
            target_label: None,
            batch_size: 2,
        }
    }

    /// Attribute an explicit label instead of the predicted one.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_label = Some(target.into());
        self
    }

    /// Override the attribution sub-batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// A candidate label with its normalized entailment score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    /// The candidate label
    pub label: String,

    /// Normalized score in 0.0..=1.0; scores across all candidates sum to 1
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// One premise token with its occlusion attribution.
///
/// Positive scores mean the token supported the target label (masking it
/// lowered the score); negative scores mean it argued against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenAttribution {
    /// Token text as produced by the tokenizer (may carry subword markers)
    pub token: String,

    /// Signed attribution: target score with the token present minus the
    /// score with it masked
    pub score: f32,
}

impl TokenAttribution {
    pub fn new(token: impl Into<String>, score: f32) -> Self {
        Self {
            token: token.into(),
            score,
        }
    }
}

/// The complete output of one interpretation.
///
/// Produced as a unit: predicted label, per-label scores, attributions, and
/// the rendered visualization either all succeed together or the whole
/// interpretation fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationResult {
    /// Identifier of the model that produced this result
    pub model: String,

    /// The classified text (after any presentation-layer truncation)
    pub text: String,

    /// Highest-scoring candidate label
    pub predicted_label: String,

    /// All candidate labels with normalized scores, descending
    pub scores: Vec<LabelScore>,

    /// The label the attributions explain
    pub attribution_target: String,

    /// Per-token attributions in premise token order
    pub attributions: Vec<TokenAttribution>,

    /// Self-contained HTML fragment visualizing the attributions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization_html: Option<String>,
}

impl InterpretationResult {
    /// The `k` tokens with the largest absolute attribution, descending.
    pub fn top_attributions(&self, k: usize) -> Vec<&TokenAttribution> {
        let mut ranked: Vec<&TokenAttribution> = self.attributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .abs()
                .partial_cmp(&a.score.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(k);
        ranked
    }
}
