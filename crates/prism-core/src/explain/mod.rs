//! Zero-shot classification with occlusion-based token attribution.
//!
//! Classification follows the NLI formulation: each candidate label becomes
//! a hypothesis sentence, every premise/hypothesis pair is scored by the
//! model, and the per-pair entailment probabilities are normalized across
//! labels. Attribution then measures each premise token's contribution to
//! the target label by masking it and re-scoring: attribution = score with
//! the token present minus score with it occluded. Occlusion variants run
//! in sub-batches so peak memory stays bounded on small machines.

mod math;
pub mod visualize;

use crate::error::InterpretError;
use crate::model::{NliModel, PairEncoding};
use crate::types::{InterpretationRequest, InterpretationResult, LabelScore, TokenAttribution};

/// Runs interpretations against one loaded model.
///
/// The engine is deterministic for a fixed model and request, and retains
/// only the most recent successful result for re-display.
pub struct ExplanationEngine<M: NliModel> {
    model: M,
    hypothesis_template: String,
    last_result: Option<InterpretationResult>,
}

impl<M: NliModel> ExplanationEngine<M> {
    /// Create an engine over `model` with a hypothesis template containing a
    /// `{}` placeholder for the label.
    pub fn new(model: M, hypothesis_template: impl Into<String>) -> Self {
        Self {
            model,
            hypothesis_template: hypothesis_template.into(),
            last_result: None,
        }
    }

    /// The model this engine interprets with.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The most recent successful result, if any. A failed interpretation
    /// leaves the previous result in place.
    pub fn last_result(&self) -> Option<&InterpretationResult> {
        self.last_result.as_ref()
    }

    /// Classify the text, attribute the target label, and render the
    /// visualization. Produced as a unit: any failure drops the whole
    /// interpretation.
    pub fn interpret(
        &mut self,
        request: &InterpretationRequest,
    ) -> Result<InterpretationResult, InterpretError> {
        self.validate(request)?;

        let scores = self.classify(&request.text, &request.candidate_labels)?;
        let predicted_label = scores[0].label.clone();
        let attribution_target = request
            .target_label
            .clone()
            .unwrap_or_else(|| predicted_label.clone());

        tracing::debug!(
            "Classified against {} labels, predicted '{}', attributing '{}'",
            scores.len(),
            predicted_label,
            attribution_target
        );

        let attributions =
            self.attribute(&request.text, &attribution_target, request.batch_size)?;

        let mut result = InterpretationResult {
            model: self.model.identifier().to_string(),
            text: request.text.clone(),
            predicted_label,
            scores,
            attribution_target,
            attributions,
            visualization_html: None,
        };
        result.visualization_html = Some(visualize::render_html(&result));

        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Reject malformed requests before any model work.
    fn validate(&self, request: &InterpretationRequest) -> Result<(), InterpretError> {
        if request.text.trim().is_empty() {
            return Err(InterpretError::Input("text must not be empty".into()));
        }
        if request.candidate_labels.is_empty() {
            return Err(InterpretError::Input(
                "candidate labels must not be empty".into(),
            ));
        }
        if request
            .candidate_labels
            .iter()
            .any(|label| label.trim().is_empty())
        {
            return Err(InterpretError::Input(
                "candidate labels must not contain empty entries".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for label in &request.candidate_labels {
            if !seen.insert(label.as_str()) {
                return Err(InterpretError::Input(format!(
                    "candidate labels must be distinct: '{label}' appears twice"
                )));
            }
        }
        if request.batch_size == 0 {
            return Err(InterpretError::Input("batch size must be at least 1".into()));
        }
        if let Some(target) = &request.target_label {
            if !request.candidate_labels.contains(target) {
                return Err(InterpretError::Input(format!(
                    "target label '{target}' is not among the candidate labels"
                )));
            }
        }
        if !self.hypothesis_template.contains("{}") {
            return Err(InterpretError::Input(
                "hypothesis template must contain a {} placeholder".into(),
            ));
        }
        Ok(())
    }

    fn hypothesis(&self, label: &str) -> String {
        self.hypothesis_template.replacen("{}", label, 1)
    }

    /// Score every candidate label, normalized and sorted descending.
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<LabelScore>, InterpretError> {
        let mut encodings = Vec::with_capacity(candidate_labels.len());
        for label in candidate_labels {
            let hypothesis = self.hypothesis(label);
            encodings.push(self.model.encode(text, &hypothesis)?);
        }

        let logits = self.model.predict(&encodings)?;
        if logits.len() != candidate_labels.len() {
            return Err(self.inference_error(format!(
                "Expected {} logit rows, got {}",
                candidate_labels.len(),
                logits.len()
            )));
        }

        let mut raw = Vec::with_capacity(logits.len());
        for row in &logits {
            raw.push(self.entailment_probability(row)?);
        }
        math::normalize_in_place(&mut raw);

        let mut scores: Vec<LabelScore> = candidate_labels
            .iter()
            .zip(raw)
            .map(|(label, score)| LabelScore::new(label.clone(), score))
            .collect();
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(scores)
    }

    /// Occlusion attribution of the target label over premise tokens.
    fn attribute(
        &self,
        text: &str,
        target_label: &str,
        batch_size: usize,
    ) -> Result<Vec<TokenAttribution>, InterpretError> {
        let hypothesis = self.hypothesis(target_label);
        let pair = self.model.encode(text, &hypothesis)?;
        if pair.premise_indices.is_empty() {
            return Err(InterpretError::Tokenization {
                message: "text produced no premise tokens".to_string(),
            });
        }

        let base_rows = self.model.predict(std::slice::from_ref(&pair))?;
        let base = match base_rows.first() {
            Some(row) => self.entailment_probability(row)?,
            None => return Err(self.inference_error("Base pass produced no logits".into())),
        };

        let mask_id = self.model.mask_token_id();
        let slots: Vec<usize> = (0..pair.premise_indices.len()).collect();
        let mut occluded = Vec::with_capacity(slots.len());

        for chunk in slots.chunks(batch_size) {
            let batch: Vec<PairEncoding> = chunk
                .iter()
                .map(|&slot| pair.occlude(slot, mask_id))
                .collect();
            let rows = self.model.predict(&batch)?;
            if rows.len() != batch.len() {
                return Err(self.inference_error(format!(
                    "Expected {} logit rows, got {}",
                    batch.len(),
                    rows.len()
                )));
            }
            for row in &rows {
                occluded.push(self.entailment_probability(row)?);
            }
            tracing::debug!("Occlusion progress: {}/{}", occluded.len(), slots.len());
        }

        Ok(pair
            .premise_tokens()
            .iter()
            .zip(occluded)
            .map(|(token, score)| TokenAttribution::new(*token, base - score))
            .collect())
    }

    /// Per-pair entailment probability: softmax over the logits row, then
    /// the entailment column.
    fn entailment_probability(&self, row: &[f32]) -> Result<f32, InterpretError> {
        let index = self.model.entailment_index();
        math::softmax(row).get(index).copied().ok_or_else(|| {
            self.inference_error(format!(
                "Entailment index {index} out of range for {} classes",
                row.len()
            ))
        })
    }

    fn inference_error(&self, message: String) -> InterpretError {
        InterpretError::Inference {
            identifier: self.model.identifier().to_string(),
            message,
        }
    }
}
