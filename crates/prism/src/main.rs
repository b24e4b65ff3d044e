//! Prism CLI - Zero-shot text classification with token attribution.
//!
//! Run `prism` with no arguments for the guided session: pick a model, type a
//! text, and read the explanation. The subcommands cover the same ground for
//! scripting:
//!
//! ```bash
//! prism interpret --text "Toyota is to slash worldwide vehicle production"
//! prism models download
//! prism config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Prism - Zero-shot text classification with token attribution.
#[derive(Parser, Debug)]
#[command(name = "prism", author, version, about, propagate_version = true)]
struct Cli {
    /// Verbose logging (forces level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON instead of human-readable lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands. Bare invocation starts the interactive session.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a text and explain the prediction (one-shot)
    Interpret(cli::interpret::InterpretArgs),

    /// Manage models (download, list, etc.)
    Models(cli::models::ModelsArgs),

    /// Show, locate, or initialize the config file
    Config(cli::config::ConfigArgs),
}

/// Load the user config, falling back to defaults on any error.
///
/// Runs before logging is set up, so the failure path warns on stderr
/// directly instead of through tracing.
fn load_config_or_default() -> prism_core::Config {
    prism_core::Config::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Using default configuration. Check your config file with `prism config path`."
        );
        prism_core::Config::default()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silence the tokenizers fork-safety warning before any tokenizer loads.
    std::env::set_var("TOKENIZERS_PARALLELISM", "false");

    let cli = Cli::parse();
    let config = load_config_or_default();
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);

    match cli.command {
        Some(Commands::Interpret(args)) => cli::interpret::execute(args).await,
        Some(Commands::Models(args)) => cli::models::execute(args).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None => cli::session::run(&config).await,
    }
}
