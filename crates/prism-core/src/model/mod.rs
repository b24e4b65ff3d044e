//! Model capability seam and its ONNX Runtime implementation.
//!
//! The explanation engine talks to models through the [`NliModel`] trait:
//! encode a premise/hypothesis pair, score a batch of encoded pairs, and
//! expose the head's entailment index plus the mask token used for
//! occlusion. [`LoadedModel`] backs the trait with an ONNX session and a
//! Hugging Face tokenizer; tests substitute stubs.

mod head;
mod session;

pub use head::HeadConfig;
pub use session::{NliSession, PaddedBatch};

use std::path::Path;
use std::sync::Arc;

use tokenizers::Tokenizer;

use crate::error::{InterpretError, ModelError};
use crate::registry;

/// One tokenized premise/hypothesis pair.
///
/// `premise_indices` are the positions of premise content tokens inside
/// `input_ids` (special and hypothesis tokens excluded). Occlusion operates
/// on these positions only.
#[derive(Debug, Clone)]
pub struct PairEncoding {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub type_ids: Vec<u32>,
    pub tokens: Vec<String>,
    pub premise_indices: Vec<usize>,
}

impl PairEncoding {
    /// Number of tokens in the encoded pair.
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Premise content tokens in text order.
    pub fn premise_tokens(&self) -> Vec<&str> {
        self.premise_indices
            .iter()
            .map(|&i| self.tokens[i].as_str())
            .collect()
    }

    /// Copy of this encoding with the `slot`-th premise token replaced by
    /// `mask_id`. The attention mask is untouched: the masked position stays
    /// visible, its content is what disappears.
    pub fn occlude(&self, slot: usize, mask_id: u32) -> PairEncoding {
        let mut occluded = self.clone();
        let position = occluded.premise_indices[slot];
        occluded.input_ids[position] = mask_id;
        occluded
    }
}

/// The capability a model must provide to be interpreted.
///
/// Object-safe so sessions can also hold models behind `Arc`.
pub trait NliModel {
    /// Public identifier, used in results and error messages.
    fn identifier(&self) -> &str;

    /// Encode a premise/hypothesis pair with special tokens.
    fn encode(&self, premise: &str, hypothesis: &str) -> Result<PairEncoding, InterpretError>;

    /// Score a batch of encoded pairs. Returns one logits row per pair, in
    /// batch order. An empty batch returns an empty result.
    fn predict(&self, batch: &[PairEncoding]) -> Result<Vec<Vec<f32>>, InterpretError>;

    /// Index of the entailment class in each logits row.
    fn entailment_index(&self) -> usize;

    /// Token id used to occlude premise tokens.
    fn mask_token_id(&self) -> u32;
}

impl<M: NliModel + ?Sized> NliModel for Arc<M> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }

    fn encode(&self, premise: &str, hypothesis: &str) -> Result<PairEncoding, InterpretError> {
        (**self).encode(premise, hypothesis)
    }

    fn predict(&self, batch: &[PairEncoding]) -> Result<Vec<Vec<f32>>, InterpretError> {
        (**self).predict(batch)
    }

    fn entailment_index(&self) -> usize {
        (**self).entailment_index()
    }

    fn mask_token_id(&self) -> u32 {
        (**self).mask_token_id()
    }
}

/// A fully constructed model: ONNX session, tokenizer, and head metadata.
///
/// Built by the loader from a model's local directory and shared behind
/// `Arc` through the cache.
#[derive(Debug)]
pub struct LoadedModel {
    identifier: String,
    session: NliSession,
    tokenizer: Tokenizer,
    entailment: usize,
    pad_id: u32,
    mask_id: u32,
}

impl LoadedModel {
    /// Load session, tokenizer, and head config from `model_dir`.
    ///
    /// Expects `model.onnx`, `tokenizer.json`, and `config.json` inside.
    pub fn load(identifier: &str, model_dir: &Path) -> Result<Self, ModelError> {
        let graph_path = model_dir.join(registry::MODEL_LOCAL_NAME);
        let tokenizer_path = model_dir.join(registry::TOKENIZER_LOCAL_NAME);
        let head_path = model_dir.join(registry::HEAD_CONFIG_LOCAL_NAME);

        for path in [&graph_path, &tokenizer_path, &head_path] {
            if !path.exists() {
                return Err(ModelError::FileNotFound { path: path.clone() });
            }
        }

        let session = NliSession::load(identifier, &graph_path)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| ModelError::Load {
            identifier: identifier.to_string(),
            message: format!("Failed to load tokenizer: {e}"),
        })?;

        let head = HeadConfig::from_file(&head_path)?;
        let entailment = head.entailment_index().ok_or_else(|| ModelError::Load {
            identifier: identifier.to_string(),
            message: "config.json does not name an entailment class".to_string(),
        })?;

        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .unwrap_or(0);
        let mask_id = tokenizer
            .token_to_id("[MASK]")
            .or_else(|| tokenizer.token_to_id("<mask>"))
            .or_else(|| tokenizer.token_to_id("[UNK]"))
            .unwrap_or(pad_id);

        tracing::debug!(
            "Loaded model '{}' (entailment {}, contradiction {:?}, pad {}, mask {})",
            identifier,
            entailment,
            head.contradiction_index(),
            pad_id,
            mask_id
        );

        Ok(Self {
            identifier: identifier.to_string(),
            session,
            tokenizer,
            entailment,
            pad_id,
            mask_id,
        })
    }

    /// Pad a batch of encodings to a common length for one session run.
    fn pad_batch(&self, batch: &[PairEncoding]) -> PaddedBatch {
        let rows = batch.len();
        let seq_len = batch.iter().map(PairEncoding::len).max().unwrap_or(0);

        let mut input_ids = Vec::with_capacity(rows * seq_len);
        let mut attention_mask = Vec::with_capacity(rows * seq_len);
        let mut token_type_ids = Vec::with_capacity(rows * seq_len);

        for pair in batch {
            let pad = seq_len - pair.len();
            input_ids.extend(pair.input_ids.iter().map(|&id| id as i64));
            input_ids.extend(std::iter::repeat(self.pad_id as i64).take(pad));
            attention_mask.extend(pair.attention_mask.iter().map(|&m| m as i64));
            attention_mask.extend(std::iter::repeat(0i64).take(pad));
            token_type_ids.extend(pair.type_ids.iter().map(|&t| t as i64));
            token_type_ids.extend(std::iter::repeat(0i64).take(pad));
        }

        PaddedBatch {
            rows,
            seq_len,
            input_ids,
            attention_mask,
            token_type_ids,
        }
    }
}

impl NliModel for LoadedModel {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn encode(&self, premise: &str, hypothesis: &str) -> Result<PairEncoding, InterpretError> {
        let encoding = self
            .tokenizer
            .encode((premise, hypothesis), true)
            .map_err(|e| InterpretError::Tokenization {
                message: e.to_string(),
            })?;

        let premise_indices: Vec<usize> = encoding
            .get_sequence_ids()
            .iter()
            .enumerate()
            .filter_map(|(i, seq)| (*seq == Some(0)).then_some(i))
            .collect();

        Ok(PairEncoding {
            input_ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            type_ids: encoding.get_type_ids().to_vec(),
            tokens: encoding.get_tokens().to_vec(),
            premise_indices,
        })
    }

    fn predict(&self, batch: &[PairEncoding]) -> Result<Vec<Vec<f32>>, InterpretError> {
        if batch.is_empty() {
            return Ok(vec![]);
        }
        self.session.logits(&self.pad_batch(batch))
    }

    fn entailment_index(&self) -> usize {
        self.entailment
    }

    fn mask_token_id(&self) -> u32 {
        self.mask_id
    }
}
