//! The `prism interpret` command: one-shot classification with attribution.
//!
//! Scripting-friendly counterpart of the interactive session: the result goes
//! to stdout (or `--output`) as JSON, the visualization optionally to a file.

use anyhow::Context;
use clap::{Args, ValueEnum};
use prism_core::{
    memory, registry, Config, ExplanationEngine, InterpretationRequest, ModelLoader,
    OutputFormat as CoreOutputFormat, OutputWriter,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Flags for one-shot interpretation. Unset values fall back to the config.
#[derive(Args, Debug)]
pub struct InterpretArgs {
    /// Text to classify (default: the configured example text)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Model identifier (default: first registered model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Comma-separated candidate labels (default: the configured list)
    #[arg(short, long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Label to attribute (default: the predicted label)
    #[arg(long)]
    pub target: Option<String>,

    /// Sub-batch size for attribution forward passes
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Result serialization format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write the HTML visualization document to this path
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Embed the HTML visualization in the JSON result
    #[arg(long)]
    pub include_html: bool,
}

/// Serialization formats accepted by `--format`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// A single JSON document
    Json,
    /// Newline-delimited JSON
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Execute the interpret command.
pub async fn execute(args: InterpretArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    let identifier = match &args.model {
        Some(id) => id.clone(),
        None => registry::all()
            .first()
            .context("model registry is empty")?
            .identifier
            .to_string(),
    };
    let request = build_request(&args, &config);

    let loader = ModelLoader::new(&config);
    let model = loader.load(&identifier).await?;

    memory::log_usage();
    let mut engine = ExplanationEngine::new(model, &config.interpret.hypothesis_template);
    let mut result = engine.interpret(&request)?;

    if let Some(html_path) = &args.html {
        let html = result.visualization_html.as_deref().unwrap_or_default();
        std::fs::write(html_path, html)?;
        tracing::info!("Visualization written to {:?}", html_path);
    }

    if !args.include_html && !config.output.include_html {
        result.visualization_html = None;
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = OutputWriter::new(
                BufWriter::new(file),
                args.format.into(),
                config.output.pretty,
            );
            writer.write(&result)?;
            writer.flush()?;
            tracing::info!("Output written to {:?}", path);
        }
        None => match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Jsonl => println!("{}", serde_json::to_string(&result)?),
        },
    }

    Ok(())
}

/// Assemble the engine request from CLI arguments and config defaults.
///
/// Over-long text is truncated here so the engine never sees it.
fn build_request(args: &InterpretArgs, config: &Config) -> InterpretationRequest {
    let raw_text = args
        .text
        .clone()
        .unwrap_or_else(|| config.interpret.default_text.clone());

    let max_chars = config.interpret.max_text_chars;
    let text = match super::truncate_chars(&raw_text, max_chars) {
        Some(truncated) => {
            tracing::warn!("Input text exceeds {max_chars} characters and was truncated");
            truncated
        }
        None => raw_text,
    };

    let labels = if args.labels.is_empty() {
        config.interpret.candidate_labels.clone()
    } else {
        args.labels.clone()
    };

    let mut request = InterpretationRequest::new(text, labels)
        .with_batch_size(args.batch_size.unwrap_or(config.interpret.batch_size));
    if let Some(target) = &args.target {
        request = request.with_target(target.clone());
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> InterpretArgs {
        InterpretArgs {
            text: None,
            model: None,
            labels: Vec::new(),
            target: None,
            batch_size: None,
            output: None,
            format: OutputFormat::Json,
            html: None,
            include_html: false,
        }
    }

    #[test]
    fn build_request_falls_back_to_config_defaults() {
        let config = Config::default();
        let request = build_request(&bare_args(), &config);

        assert_eq!(request.text, config.interpret.default_text);
        assert_eq!(request.candidate_labels.len(), 9);
        assert_eq!(request.batch_size, 2);
        assert!(request.target_label.is_none());
    }

    #[test]
    fn build_request_honors_explicit_arguments() {
        let config = Config::default();
        let mut args = bare_args();
        args.text = Some("a short note".to_string());
        args.labels = vec!["food".to_string(), "sport".to_string()];
        args.target = Some("sport".to_string());
        args.batch_size = Some(8);

        let request = build_request(&args, &config);

        assert_eq!(request.text, "a short note");
        assert_eq!(request.candidate_labels, vec!["food", "sport"]);
        assert_eq!(request.target_label.as_deref(), Some("sport"));
        assert_eq!(request.batch_size, 8);
    }

    #[test]
    fn build_request_truncates_over_long_text() {
        let config = Config::default();
        let mut args = bare_args();
        args.text = Some("x".repeat(2000));

        let request = build_request(&args, &config);

        assert_eq!(
            request.text.chars().count(),
            config.interpret.max_text_chars
        );
    }

    #[test]
    fn output_format_maps_to_core() {
        assert!(matches!(
            CoreOutputFormat::from(OutputFormat::Json),
            CoreOutputFormat::Json
        ));
        assert!(matches!(
            CoreOutputFormat::from(OutputFormat::Jsonl),
            CoreOutputFormat::JsonLines
        ));
    }
}
