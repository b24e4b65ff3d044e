//! Tracing setup for the CLI.
//!
//! Log lines go to stderr so stdout stays clean for JSON results. `RUST_LOG`
//! wins when set; otherwise the level comes from the config file, with
//! `--verbose` forcing debug.

use prism_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber from config values merged with the CLI
/// flags. Call once, before any tracing output.
pub fn init_from_config(config: &Config, verbose: bool, json_logs: bool) {
    let level = resolve_level(&config.logging.level, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_logs || config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Map the configured level to a filter directive. `--verbose` forces debug;
/// an unrecognized value falls back to info.
fn resolve_level(configured: &str, verbose: bool) -> &'static str {
    if verbose {
        return "debug";
    }
    match configured {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_forces_debug() {
        assert_eq!(resolve_level("error", true), "debug");
    }

    #[test]
    fn configured_level_passes_through() {
        assert_eq!(resolve_level("warn", false), "warn");
        assert_eq!(resolve_level("trace", false), "trace");
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(resolve_level("loud", false), "info");
    }
}
