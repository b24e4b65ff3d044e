//! Prism Core - Zero-shot classification interpretation library.
//!
//! Prism classifies free text against a set of candidate labels using a
//! pretrained NLI model and explains the prediction with per-token
//! attributions plus a rendered visualization. Everything the CLI does goes
//! through this crate: model resolution ([`registry`]), download and caching
//! ([`loader`]), inference and occlusion attribution ([`explain`]), and the
//! serializable result types ([`types`]).
//!
//! ```rust,ignore
//! use prism_core::{Config, ExplanationEngine, InterpretationRequest, ModelLoader};
//!
//! # #[tokio::main]
//! # async fn main() -> prism_core::Result<()> {
//! let config = Config::load()?;
//! let model = ModelLoader::new(&config)
//!     .load("typeform/distilbert-base-uncased-mnli")
//!     .await?;
//!
//! let mut engine = ExplanationEngine::new(model, &config.interpret.hypothesis_template);
//! let request = InterpretationRequest::new(
//!     "Toyota is to slash worldwide vehicle production.",
//!     config.interpret.candidate_labels.clone(),
//! );
//! println!("Predicted: {}", engine.interpret(&request)?.predicted_label);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod explain;
pub mod loader;
pub mod memory;
pub mod model;
pub mod output;
pub mod registry;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, InterpretError, ModelError, PrismError, Result};
pub use explain::ExplanationEngine;
pub use loader::{ModelCache, ModelLoader};
pub use model::{LoadedModel, NliModel, PairEncoding};
pub use output::{OutputFormat, OutputWriter};
pub use types::{InterpretationRequest, InterpretationResult, LabelScore, TokenAttribution};

/// Crate version, taken from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_comes_from_cargo() {
        assert!(VERSION.starts_with(char::is_numeric));
    }

    #[test]
    fn test_registry_models_resolve_through_public_api() {
        for identifier in registry::identifiers() {
            assert!(registry::find(identifier).is_some());
        }
    }
}
