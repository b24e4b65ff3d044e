//! Sub-configuration structs with defaults matching the demo setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the `[general]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where downloaded model files live
    pub model_dir: PathBuf,

    /// Maximum number of loaded models kept resident at once.
    /// Loading past capacity evicts the oldest entry.
    pub cache_capacity: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.prism/models"),
            cache_capacity: 1,
        }
    }
}

/// Settings for the `[interpret]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretConfig {
    /// Maximum accepted text length in characters. Longer input is truncated
    /// at the presentation layer before it reaches the engine.
    pub max_text_chars: usize,

    /// Sub-batch size for attribution forward passes
    pub batch_size: usize,

    /// Hypothesis template for zero-shot classification.
    /// `{}` is replaced by each candidate label.
    pub hypothesis_template: String,

    /// Candidate labels offered in the session
    pub candidate_labels: Vec<String>,

    /// Text pre-filled in the session input prompt
    pub default_text: String,
}

impl Default for InterpretConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 850,
            batch_size: 2,
            hypothesis_template: "this text is about {}".to_string(),
            candidate_labels: vec![
                "technology".to_string(),
                "sport".to_string(),
                "space".to_string(),
                "politics".to_string(),
                "medical".to_string(),
                "historical".to_string(),
                "graphics".to_string(),
                "food".to_string(),
                "entertainment".to_string(),
            ],
            default_text: "Toyota is to slash worldwide vehicle production by 40% in \
                           September because of the global microchip shortage."
                .to_string(),
        }
    }
}

/// Settings for the `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format for one-shot results, "json" or "jsonl"
    pub format: String,

    /// Indent JSON output for reading
    pub pretty: bool,

    /// Include the HTML visualization blob in JSON output
    pub include_html: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
            include_html: false,
        }
    }
}

/// Settings for the `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum severity to log: error, warn, info, debug, or trace
    pub level: String,

    /// Log style, human-readable "pretty" or structured "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
