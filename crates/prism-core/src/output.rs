//! JSON output for interpretation results.
//!
//! One-shot runs write their result to stdout or a file, either as a single
//! JSON document or as one object per line for log-style appending.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::InterpretationResult;

/// How results are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single JSON document
    Json,
    /// Newline-delimited JSON, one result per line
    JsonLines,
}

/// Serializes interpretation results to JSON or JSONL.
///
/// `pretty` only applies to the JSON format; JSONL stays one compact
/// object per line so appended files remain parseable.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single result followed by a newline.
    pub fn write(&mut self, result: &InterpretationResult) -> io::Result<()> {
        let pretty = self.pretty && self.format == OutputFormat::Json;
        let json = to_json(result, pretty).map_err(io::Error::other)?;
        writeln!(self.writer, "{json}")
    }

    /// Flush buffered output to the destination.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Serialize an item to a JSON string.
pub fn to_json<T: Serialize>(item: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterpretationResult, LabelScore, TokenAttribution};

    fn sample_result() -> InterpretationResult {
        InterpretationResult {
            model: "typeform/distilbert-base-uncased-mnli".to_string(),
            text: "toyota cuts production".to_string(),
            predicted_label: "technology".to_string(),
            scores: vec![LabelScore::new("technology", 1.0)],
            attribution_target: "technology".to_string(),
            attributions: vec![TokenAttribution::new("toyota", 0.2)],
            visualization_html: None,
        }
    }

    #[test]
    fn test_write_json_compact() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);

        writer.write(&sample_result()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"predicted_label\":\"technology\""));
        assert_eq!(output.trim().lines().count(), 1);
    }

    #[test]
    fn test_write_json_pretty_is_multiline() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, true);

        writer.write(&sample_result()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_write_jsonl_ignores_pretty() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);

        writer.write(&sample_result()).unwrap();
        writer.write(&sample_result()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.trim().lines().count(), 2);
    }

    #[test]
    fn test_to_json_round_trips() {
        let json = to_json(&sample_result(), false).unwrap();
        let parsed: InterpretationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, "typeform/distilbert-base-uncased-mnli");
    }
}
