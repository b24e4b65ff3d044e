//! Classification head metadata parsed from a model's `config.json`.
//!
//! MNLI checkpoints disagree on label naming and order: some ship
//! `{"entailment": 0, ...}`, others `{"0": "ENTAILMENT", ...}` with different
//! index assignments. The entailment index is resolved by case-insensitive
//! prefix match over both maps instead of trusting a fixed position.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;

/// Label maps from the checkpoint's `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    pub id2label: HashMap<String, String>,
    pub label2id: HashMap<String, u32>,
}

impl HeadConfig {
    /// Parse `config.json` at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ModelError::Load {
            identifier: path.display().to_string(),
            message: format!("Failed to read head config: {e}"),
        })?;
        serde_json::from_str(&contents).map_err(|e| ModelError::Load {
            identifier: path.display().to_string(),
            message: format!("Failed to parse head config: {e}"),
        })
    }

    /// Index of the entailment class in the logits row, if the config
    /// names one.
    pub fn entailment_index(&self) -> Option<usize> {
        self.class_index("entail")
    }

    /// Index of the contradiction class, if named.
    pub fn contradiction_index(&self) -> Option<usize> {
        self.class_index("contradict")
    }

    fn class_index(&self, prefix: &str) -> Option<usize> {
        if let Some((_, &id)) = self
            .label2id
            .iter()
            .find(|(label, _)| label.to_lowercase().starts_with(prefix))
        {
            return Some(id as usize);
        }
        self.id2label
            .iter()
            .find(|(_, label)| label.to_lowercase().starts_with(prefix))
            .and_then(|(id, _)| id.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_lowercase_label2id() {
        let config: HeadConfig = serde_json::from_str(
            r#"{"label2id": {"contradiction": 0, "neutral": 1, "entailment": 2}}"#,
        )
        .unwrap();
        assert_eq!(config.entailment_index(), Some(2));
        assert_eq!(config.contradiction_index(), Some(0));
    }

    #[test]
    fn resolves_uppercase_id2label() {
        let config: HeadConfig = serde_json::from_str(
            r#"{"id2label": {"0": "ENTAILMENT", "1": "NEUTRAL", "2": "CONTRADICTION"}}"#,
        )
        .unwrap();
        assert_eq!(config.entailment_index(), Some(0));
        assert_eq!(config.contradiction_index(), Some(2));
    }

    #[test]
    fn label2id_wins_over_id2label() {
        let config: HeadConfig = serde_json::from_str(
            r#"{
                "label2id": {"entailment": 2},
                "id2label": {"0": "entailment"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.entailment_index(), Some(2));
    }

    #[test]
    fn missing_labels_yield_none() {
        let config: HeadConfig = serde_json::from_str(r#"{"hidden_size": 768}"#).unwrap();
        assert_eq!(config.entailment_index(), None);
    }

    #[test]
    fn from_file_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = HeadConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
