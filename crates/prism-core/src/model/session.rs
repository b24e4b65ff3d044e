//! ONNX Runtime session wrapper for MNLI sequence classification.
//!
//! Loads an exported classifier graph and runs padded premise/hypothesis
//! batches through it. Exports differ in their declared inputs (DistilBERT
//! takes `input_ids` + `attention_mask`, BERT-family models also want
//! `token_type_ids`), so the wrapper detects the input set from model
//! metadata and feeds only what the graph declares.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::{InterpretError, ModelError};

/// Wraps an ONNX Runtime session for NLI classification.
///
/// `Session::run` takes `&mut self`, hence the `Mutex` around it.
#[derive(Debug)]
pub struct NliSession {
    session: Mutex<Session>,
    identifier: String,
    has_attention_mask: bool,
    has_token_type_ids: bool,
}

/// A batch of encoded pairs padded to a common length, flattened row-major.
#[derive(Debug, Clone)]
pub struct PaddedBatch {
    /// Number of pairs in the batch
    pub rows: usize,

    /// Common padded sequence length
    pub seq_len: usize,

    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

impl NliSession {
    /// Load the classifier graph from an ONNX file.
    pub fn load(identifier: &str, model_path: &Path) -> Result<Self, ModelError> {
        let session = Session::builder()
            .map_err(|e| ModelError::Load {
                identifier: identifier.to_string(),
                message: format!("ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| ModelError::Load {
                identifier: identifier.to_string(),
                message: format!("could not load classifier graph: {e}"),
            })?;

        // Detect the declared input set from model metadata.
        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        let has_attention_mask = input_names.iter().any(|n| n == "attention_mask");
        let has_token_type_ids = input_names.iter().any(|n| n == "token_type_ids");

        tracing::debug!(
            "Loaded NLI classifier from {:?} (inputs: {:?}, outputs: {:?})",
            model_path,
            input_names,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            identifier: identifier.to_string(),
            has_attention_mask,
            has_token_type_ids,
        })
    }

    /// Run the classifier over a padded batch.
    ///
    /// Returns one logits row per pair in batch order.
    pub fn logits(&self, batch: &PaddedBatch) -> Result<Vec<Vec<f32>>, InterpretError> {
        if batch.rows == 0 {
            return Ok(vec![]);
        }

        let shape = vec![batch.rows as i64, batch.seq_len as i64];

        let ids_value = Value::from_array((shape.clone(), batch.input_ids.clone()))
            .map_err(|e| self.inference_error(format!("Failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| self.inference_error(format!("Session lock poisoned: {e}")))?;

        let outputs = match (self.has_attention_mask, self.has_token_type_ids) {
            (true, true) => {
                let mask_value = Value::from_array((shape.clone(), batch.attention_mask.clone()))
                    .map_err(|e| {
                    self.inference_error(format!("Failed to create attention mask tensor: {e}"))
                })?;
                let type_value = Value::from_array((shape, batch.token_type_ids.clone()))
                    .map_err(|e| {
                        self.inference_error(format!("Failed to create type id tensor: {e}"))
                    })?;
                session.run(ort::inputs![
                    "input_ids" => ids_value,
                    "attention_mask" => mask_value,
                    "token_type_ids" => type_value,
                ])
            }
            (true, false) => {
                let mask_value = Value::from_array((shape, batch.attention_mask.clone()))
                    .map_err(|e| {
                        self.inference_error(format!("Failed to create attention mask tensor: {e}"))
                    })?;
                session.run(ort::inputs![
                    "input_ids" => ids_value,
                    "attention_mask" => mask_value,
                ])
            }
            (false, _) => session.run(ort::inputs!["input_ids" => ids_value]),
        }
        .map_err(|e| self.inference_error(format!("ONNX inference failed: {e}")))?;

        // Classification exports name the score tensor "logits"; fall back to
        // the first output for graphs that rename it.
        let logits = outputs
            .iter()
            .find(|(name, _)| *name == "logits")
            .or_else(|| outputs.iter().next())
            .ok_or_else(|| self.inference_error("Model produced no outputs".to_string()))?;

        let (shape, data) = logits
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| self.inference_error(format!("Failed to extract logits tensor: {e}")))?;

        let num_classes = match shape.len() {
            2 => shape[1] as usize,
            1 => data.len() / batch.rows,
            _ => {
                return Err(
                    self.inference_error(format!("Unexpected logits shape: {:?}", shape))
                );
            }
        };
        if num_classes == 0 || data.len() < batch.rows * num_classes {
            return Err(self.inference_error(format!(
                "Logits tensor too small: {} values for {} rows",
                data.len(),
                batch.rows
            )));
        }

        Ok(data
            .chunks(num_classes)
            .take(batch.rows)
            .map(|row| row.to_vec())
            .collect())
    }

    fn inference_error(&self, message: String) -> InterpretError {
        InterpretError::Inference {
            identifier: self.identifier.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_batch_layout_is_row_major() {
        // Two rows padded to length 4; verify the flattening convention the
        // session relies on.
        let batch = PaddedBatch {
            rows: 2,
            seq_len: 4,
            input_ids: vec![101, 7, 8, 102, 101, 9, 102, 0],
            attention_mask: vec![1, 1, 1, 1, 1, 1, 1, 0],
            token_type_ids: vec![0; 8],
        };

        assert_eq!(batch.input_ids.len(), batch.rows * batch.seq_len);
        assert_eq!(&batch.input_ids[4..], &[101, 9, 102, 0]);
        assert_eq!(batch.attention_mask[7], 0);
    }
}
