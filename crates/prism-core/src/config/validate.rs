//! Range and consistency checks applied after deserialization.

use crate::error::ConfigError;

use super::Config;

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

impl Config {
    /// Reject configs with out-of-range or inconsistent values.
    ///
    /// Checks run in section order and stop at the first violation, so the
    /// error always names a single offending key.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.general.cache_capacity == 0 {
            return Err(invalid("general.cache_capacity must be > 0"));
        }

        let interpret = &self.interpret;
        if interpret.max_text_chars == 0 {
            return Err(invalid("interpret.max_text_chars must be > 0"));
        }
        if interpret.batch_size == 0 {
            return Err(invalid("interpret.batch_size must be > 0"));
        }
        if !interpret.hypothesis_template.contains("{}") {
            return Err(invalid(
                "interpret.hypothesis_template must contain a {} placeholder",
            ));
        }
        if interpret.candidate_labels.is_empty() {
            return Err(invalid("interpret.candidate_labels must not be empty"));
        }
        let has_blank = interpret
            .candidate_labels
            .iter()
            .any(|label| label.trim().is_empty());
        if has_blank {
            return Err(invalid(
                "interpret.candidate_labels must not contain empty labels",
            ));
        }

        match self.output.format.as_str() {
            "json" | "jsonl" => {}
            other => {
                return Err(invalid(format!(
                    "output.format must be \"json\" or \"jsonl\", got \"{other}\""
                )));
            }
        }

        Ok(())
    }
}
