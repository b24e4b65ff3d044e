//! Prompt styling and the session banner.
//!
//! One shared `ColorfulTheme` keeps every prompt in the session visually
//! consistent. Everything renders to stderr; stdout stays reserved for data.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Theme applied to every session prompt: magenta accents for the prompt
/// marker and the active selection, green for confirmed values.
pub fn prism_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().magenta(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().dim(),
        active_item_prefix: style("❯".to_string()).for_stderr().magenta(),
        active_item_style: Style::new().for_stderr().magenta(),
        success_prefix: style("✔".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().dim(),
        error_prefix: style("✘".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Print the entry banner with the crate version, framed in a rounded box.
pub fn print_banner() {
    let lines = [
        format!("Prism v{}", prism_core::VERSION),
        "Zero-shot classification, explained token by token".to_string(),
    ];
    let inner = lines.iter().map(|line| line.len()).max().unwrap_or(0) + 4;
    let accent = Style::new().for_stderr().magenta();

    eprintln!();
    eprintln!("{}", accent.apply_to(format!("  ╭{:─<inner$}╮", "")));
    for line in &lines {
        eprintln!("{}", accent.apply_to(format!("  │{line:^inner$}│")));
    }
    eprintln!("{}", accent.apply_to(format!("  ╰{:─<inner$}╯", "")));
    eprintln!();
}
