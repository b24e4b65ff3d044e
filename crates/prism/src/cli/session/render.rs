//! Terminal rendering of interpretation results.
//!
//! The HTML document is the full visualization; these renderers give an
//! in-terminal view of the same data: score listing plus a token heat strip
//! colored by attribution sign and magnitude.

use console::Style;
use prism_core::{InterpretationResult, TokenAttribution};

const BAR_WIDTH: usize = 24;

/// Tokens at or above this share of the strongest attribution render bold.
const STRONG_THRESHOLD: f32 = 0.6;

/// Tokens below this share render dimmed as near-neutral.
const NEUTRAL_THRESHOLD: f32 = 0.15;

/// Print the predicted label, the full score listing, and the token heat strip.
pub fn print_result(result: &InterpretationResult) {
    let bold = Style::new().for_stderr().bold();
    let green = Style::new().for_stderr().green();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!(
        "  {} {}",
        bold.apply_to("Predicted label:"),
        green.apply_to(&result.predicted_label)
    );
    if result.attribution_target != result.predicted_label {
        eprintln!(
            "  {} {}",
            bold.apply_to("Attributed label:"),
            result.attribution_target
        );
    }
    eprintln!();
    eprint!("{}", scores_table(result));
    eprintln!();
    eprintln!(
        "  {}",
        dim.apply_to("Token contributions toward the attributed label:")
    );
    eprintln!();
    eprintln!("{}", heat_strip(&result.attributions));
    eprintln!();
    eprintln!(
        "  {}",
        dim.apply_to("green supports the label, red argues against; bold is strongest")
    );
    eprintln!();
}

/// Dump the attribution map as pretty JSON for inspection.
pub fn print_raw_json(result: &InterpretationResult) {
    let dim = Style::new().for_stderr().dim();
    match prism_core::output::to_json(&result.attributions, true) {
        Ok(json) => {
            eprintln!();
            eprintln!("{}", dim.apply_to("─".repeat(50)));
            eprintln!("{json}");
            eprintln!("{}", dim.apply_to("─".repeat(50)));
            eprintln!();
        }
        Err(e) => print_error(&format!("Failed to serialize attributions: {e}")),
    }
}

/// Render an error message without leaving the session.
pub fn print_error(message: &str) {
    let err = Style::new().for_stderr().red();
    eprintln!();
    eprintln!("  {} {message}", err.apply_to("✘"));
    eprintln!();
}

/// One line per candidate label, descending score, with a proportional bar.
/// The predicted label carries the `▸` marker.
fn scores_table(result: &InterpretationResult) -> String {
    let mut out = String::new();
    for entry in &result.scores {
        let bar_len = (entry.score.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
        let marker = if entry.label == result.predicted_label {
            "▸"
        } else {
            " "
        };
        out.push_str(&format!(
            "  {} {:<16} {:>6.3}  {}\n",
            marker,
            entry.label,
            entry.score,
            "█".repeat(bar_len)
        ));
    }
    out
}

/// Space-joined tokens, each styled by its attribution.
fn heat_strip(attributions: &[TokenAttribution]) -> String {
    let max_abs = attributions
        .iter()
        .map(|a| a.score.abs())
        .fold(0.0_f32, f32::max);

    let pieces: Vec<String> = attributions
        .iter()
        .map(|attribution| styled_token(&attribution.token, attribution.score, max_abs))
        .collect();

    format!("  {}", pieces.join(" "))
}

/// Style one token: green for supporting, red for opposing, dim for
/// near-neutral, bold when close to the strongest attribution.
fn styled_token(token: &str, score: f32, max_abs: f32) -> String {
    let strength = if max_abs > f32::EPSILON {
        score.abs() / max_abs
    } else {
        0.0
    };

    let style = if strength < NEUTRAL_THRESHOLD {
        Style::new().for_stderr().dim()
    } else if score > 0.0 {
        if strength >= STRONG_THRESHOLD {
            Style::new().for_stderr().green().bold()
        } else {
            Style::new().for_stderr().green()
        }
    } else if strength >= STRONG_THRESHOLD {
        Style::new().for_stderr().red().bold()
    } else {
        Style::new().for_stderr().red()
    };

    style.apply_to(token).to_string()
}
