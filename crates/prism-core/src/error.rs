//! Error types for the Prism interpretation pipeline.
//!
//! Each enum covers one stage and carries the context a caller needs (model
//! identifiers, file paths, the specific issue). Four failure families reach
//! callers: configuration (unknown model, bad config), resource (download or
//! load), inference (forward pass), and input (request validation).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism operations.
///
/// The stage enums already produce self-describing messages, so their
/// variants forward `Display` unchanged.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration loading or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Model resolution, download, or load errors
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Interpretation errors (validation, tokenization, inference)
    #[error(transparent)]
    Interpret(#[from] InterpretError),

    /// I/O failures outside the more specific variants
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Result serialization failed
    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Could not read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The config file is not valid TOML
    #[error("Config file is not valid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range or inconsistent
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Model resolution and loading errors.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Identifier is not in the registry. Raised before any I/O happens.
    #[error("Unknown model '{identifier}'. Run `prism models list` to see available models.")]
    UnknownModel { identifier: String },

    /// Fetching a model file from the remote repository failed
    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// A downloaded file failed BLAKE3 verification
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A required model file is missing on disk
    #[error("Model file not found: {path}. Run `prism models download` first.")]
    FileNotFound { path: PathBuf },

    /// Building the runtime session or tokenizer from local files failed
    #[error("Failed to load model '{identifier}': {message}")]
    Load { identifier: String, message: String },

    /// I/O failure while fetching or verifying model files
    #[error("IO error during model fetch: {0}")]
    Io(#[from] std::io::Error),
}

/// Interpretation errors, organized by phase.
#[derive(Error, Debug)]
pub enum InterpretError {
    /// Request validation failed before any model work
    #[error("Invalid input: {0}")]
    Input(String),

    /// Encoding the premise/hypothesis pair failed
    #[error("Tokenization failed: {message}")]
    Tokenization { message: String },

    /// The forward pass failed
    #[error("Inference failed for model '{identifier}': {message}")]
    Inference { identifier: String, message: String },
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;

/// Convenience type alias for model loading results.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Convenience type alias for interpretation results.
pub type InterpretResult<T> = std::result::Result<T, InterpretError>;
