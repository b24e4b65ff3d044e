//! Static registry of supported zero-shot classification models.
//!
//! The registry is a fixed table: each entry pairs a public model identifier
//! with its human-readable description and the remote files needed to run it
//! locally (ONNX export, tokenizer, head config). Lookup never touches the
//! network or the filesystem.

use serde_json::{Map, Value};

/// One supported model: public identifier plus the files that back it.
///
/// `identifier` is the upstream model id shown to users. The ONNX export and
/// companion files are fetched from `weights_repo`, which carries the
/// community ONNX conversion when the upstream repo ships PyTorch weights
/// only.
#[derive(Debug)]
pub struct ModelDescriptor {
    /// Public model identifier (e.g. "typeform/distilbert-base-uncased-mnli")
    pub identifier: &'static str,

    /// Human-readable description shown in the selection menu
    pub description: &'static str,

    /// Hugging Face repo holding the ONNX export and companion files
    pub weights_repo: &'static str,

    /// Path of the ONNX graph inside `weights_repo`
    pub weights_remote_path: &'static str,

    /// BLAKE3 checksum of the ONNX graph, when pinned
    pub weights_blake3: Option<&'static str>,
}

/// One file a model needs locally.
#[derive(Debug)]
pub struct ModelFile {
    /// Path inside the descriptor's `weights_repo`
    pub remote_path: &'static str,

    /// Filename inside the model's local directory
    pub local_name: &'static str,

    /// BLAKE3 checksum, when pinned
    pub blake3: Option<&'static str>,
}

/// Local filenames inside each model directory.
pub const MODEL_LOCAL_NAME: &str = "model.onnx";
pub const TOKENIZER_LOCAL_NAME: &str = "tokenizer.json";
pub const HEAD_CONFIG_LOCAL_NAME: &str = "config.json";

const MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        identifier: "typeform/distilbert-base-uncased-mnli",
        description: "DistilBERT model finetuned on MNLI. The model is not case-sensitive.",
        weights_repo: "Xenova/distilbert-base-uncased-mnli",
        weights_remote_path: "onnx/model.onnx",
        weights_blake3: None,
    },
    ModelDescriptor {
        identifier: "typeform/squeezebert-mnli",
        description: "",
        weights_repo: "Xenova/squeezebert-mnli",
        weights_remote_path: "onnx/model.onnx",
        weights_blake3: None,
    },
];

impl ModelDescriptor {
    /// All files this model needs locally, in download order.
    pub fn files(&self) -> [ModelFile; 3] {
        [
            ModelFile {
                remote_path: self.weights_remote_path,
                local_name: MODEL_LOCAL_NAME,
                blake3: self.weights_blake3,
            },
            ModelFile {
                remote_path: "tokenizer.json",
                local_name: TOKENIZER_LOCAL_NAME,
                blake3: None,
            },
            ModelFile {
                remote_path: "config.json",
                local_name: HEAD_CONFIG_LOCAL_NAME,
                blake3: None,
            },
        ]
    }

    /// Filesystem-safe directory name for this model.
    pub fn local_dir_name(&self) -> String {
        self.identifier.replace('/', "--")
    }
}

/// All registered models in declaration order (drives the selection menu).
pub fn all() -> &'static [ModelDescriptor] {
    MODELS
}

/// Look up a model by its public identifier.
pub fn find(identifier: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|m| m.identifier == identifier)
}

/// Public identifiers in declaration order.
pub fn identifiers() -> Vec<&'static str> {
    MODELS.iter().map(|m| m.identifier).collect()
}

/// Identifier-to-description map for the model overview display.
pub fn descriptions() -> Value {
    let mut map = Map::new();
    for model in MODELS {
        map.insert(
            model.identifier.to_string(),
            Value::String(model.description.to_string()),
        );
    }
    Value::Object(map)
}
