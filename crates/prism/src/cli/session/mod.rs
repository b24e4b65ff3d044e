//! Guided interactive session for bare `prism` invocation.
//!
//! The session is a state machine driven by prompt selections, one handler
//! per state:
//!
//! ```text
//! Idle → ModelSelected → Interpreting → ResultDisplayed → Idle
//! ```
//!
//! A failure while interpreting is rendered as a message and drops the
//! session back to `Idle`; the process keeps running. There are no retries.

mod render;
mod theme;

use console::Style;
use dialoguer::{Input, Select};
use prism_core::{
    memory, registry, Config, ExplanationEngine, InterpretationRequest, InterpretationResult,
    ModelLoader,
};
use std::path::PathBuf;

/// Map a prompt result to `Ok(Some(value))`, with Ctrl+C and terminal
/// disconnects collapsed to `Ok(None)` so callers can treat an interrupt as
/// "back out of this flow". Other I/O failures stay errors.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented in the `Idle` state.
const MENU_ITEMS: &[&str] = &["Interpret text", "Model descriptions", "Exit"];

/// Session states. Each variant carries what its handler needs.
enum SessionState {
    /// Main menu; nothing selected.
    Idle,
    /// A model is picked; collecting the attribution target and the text.
    ModelSelected { identifier: String },
    /// Request assembled; about to load the model and run.
    Interpreting {
        identifier: String,
        request: InterpretationRequest,
    },
    /// A result is on screen; offering follow-up actions.
    ResultDisplayed {
        identifier: String,
        result: InterpretationResult,
    },
}

/// Entry point for the interactive session (bare `prism` invocation).
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let mut session = Session {
        loader: ModelLoader::new(config),
        config: config.clone(),
    };
    session.run().await
}

struct Session {
    loader: ModelLoader,
    config: Config,
}

impl Session {
    /// Drive the state machine until the user exits.
    async fn run(&mut self) -> anyhow::Result<()> {
        let mut state = SessionState::Idle;
        loop {
            state = match state {
                SessionState::Idle => match self.handle_idle()? {
                    Some(next) => next,
                    None => break,
                },
                SessionState::ModelSelected { identifier } => {
                    self.handle_model_selected(identifier)?
                }
                SessionState::Interpreting {
                    identifier,
                    request,
                } => self.handle_interpreting(identifier, request).await,
                SessionState::ResultDisplayed { identifier, result } => {
                    self.handle_result(identifier, result)?
                }
            };
        }
        Ok(())
    }

    /// Idle: main menu. Returns `None` when the user leaves the session.
    fn handle_idle(&self) -> anyhow::Result<Option<SessionState>> {
        let theme = theme::prism_theme();

        loop {
            let selection = Select::with_theme(&theme)
                .with_prompt("What would you like to do?")
                .items(MENU_ITEMS)
                .default(0)
                .interact_opt()?;

            match selection {
                Some(0) => match self.select_model(&theme)? {
                    Some(identifier) => {
                        return Ok(Some(SessionState::ModelSelected { identifier }))
                    }
                    None => continue, // Esc back to the menu
                },
                Some(1) => {
                    show_model_descriptions();
                    continue;
                }
                Some(2) | None => return Ok(None), // Exit or Ctrl+C / Esc
                _ => unreachable!(),
            }
        }
    }

    /// ModelSelected: collect the attribution target and the text; Enter on
    /// the text prompt submits. Esc anywhere cancels back to Idle.
    fn handle_model_selected(&self, identifier: String) -> anyhow::Result<SessionState> {
        let theme = theme::prism_theme();
        let labels = &self.config.interpret.candidate_labels;

        // Attribution target: the predicted label by default, or one of the
        // fixed candidate categories.
        let mut target_items = vec!["Predicted label (default)".to_string()];
        target_items.extend(labels.iter().cloned());

        let target_choice = Select::with_theme(&theme)
            .with_prompt("Attribute which label?")
            .items(&target_items)
            .default(0)
            .interact_opt()?;

        let target_label = match target_choice {
            Some(0) => None,
            Some(index) => Some(labels[index - 1].clone()),
            None => return Ok(SessionState::Idle),
        };

        // Text entry, pre-filled with the configured example.
        let Some(raw_text) = handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Text to interpret")
                .default(self.config.interpret.default_text.clone())
                .interact_text(),
        )?
        else {
            return Ok(SessionState::Idle);
        };

        let max_chars = self.config.interpret.max_text_chars;
        let text = match super::truncate_chars(&raw_text, max_chars) {
            Some(truncated) => {
                let warn = Style::new().for_stderr().yellow();
                eprintln!(
                    "  {}",
                    warn.apply_to(format!(
                        "Text exceeds {max_chars} characters; the rest is ignored."
                    ))
                );
                truncated
            }
            None => raw_text,
        };

        if text.trim().is_empty() {
            let warn = Style::new().for_stderr().yellow();
            eprintln!("  {}", warn.apply_to("Nothing to interpret."));
            return Ok(SessionState::Idle);
        }

        let mut request = InterpretationRequest::new(text, labels.clone())
            .with_batch_size(self.config.interpret.batch_size);
        if let Some(target) = target_label {
            request = request.with_target(target);
        }

        Ok(SessionState::Interpreting {
            identifier,
            request,
        })
    }

    /// Interpreting: log memory, load the model (a cache hit is instant, a
    /// different identifier evicts and downloads as needed), run the engine.
    /// Failures render as messages and drop back to Idle.
    async fn handle_interpreting(
        &mut self,
        identifier: String,
        request: InterpretationRequest,
    ) -> SessionState {
        memory::log_usage();

        let spinner = indicatif::ProgressBar::new_spinner();
        spinner.set_message(format!("Loading {identifier}..."));
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));

        let model = match self.loader.load(&identifier).await {
            Ok(model) => model,
            Err(e) => {
                spinner.finish_and_clear();
                render::print_error(&format!("Failed to load {identifier}: {e}"));
                return SessionState::Idle;
            }
        };

        spinner.set_message("Interpreting...");
        let mut engine = ExplanationEngine::new(model, &self.config.interpret.hypothesis_template);
        let outcome = engine.interpret(&request);
        spinner.finish_and_clear();

        match outcome {
            Ok(result) => SessionState::ResultDisplayed { identifier, result },
            Err(e) => {
                render::print_error(&format!("Interpretation failed: {e}"));
                SessionState::Idle
            }
        }
    }

    /// ResultDisplayed: render the result, then offer follow-up actions.
    /// Re-interpreting or switching models goes back through ModelSelected.
    fn handle_result(
        &self,
        identifier: String,
        result: InterpretationResult,
    ) -> anyhow::Result<SessionState> {
        let theme = theme::prism_theme();

        render::print_result(&result);

        let items = &[
            "Interpret more text (same model)",
            "Switch model",
            "Show raw attribution JSON",
            "Save HTML visualization",
            "Back to main menu",
        ];

        loop {
            let selection = Select::with_theme(&theme)
                .with_prompt("What next?")
                .items(items)
                .default(0)
                .interact_opt()?;

            match selection {
                Some(0) => return Ok(SessionState::ModelSelected { identifier }),
                Some(1) => match self.select_model(&theme)? {
                    Some(next) => return Ok(SessionState::ModelSelected { identifier: next }),
                    None => continue,
                },
                Some(2) => {
                    render::print_raw_json(&result);
                    continue;
                }
                Some(3) => {
                    self.save_visualization(&theme, &result)?;
                    continue;
                }
                Some(4) | None => return Ok(SessionState::Idle),
                _ => unreachable!(),
            }
        }
    }

    /// Model selection prompt over the registry, in declaration order.
    /// Returns `None` on Esc / Ctrl+C.
    fn select_model(
        &self,
        theme: &dialoguer::theme::ColorfulTheme,
    ) -> anyhow::Result<Option<String>> {
        let items: Vec<String> = registry::all()
            .iter()
            .map(|descriptor| {
                let mut item = if descriptor.description.is_empty() {
                    descriptor.identifier.to_string()
                } else {
                    format!("{} - {}", descriptor.identifier, descriptor.description)
                };
                if !self.loader.is_downloaded(descriptor) {
                    item.push_str("  [will download on first use]");
                }
                item
            })
            .collect();

        let selection = Select::with_theme(theme)
            .with_prompt("Which model?")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|index| registry::all()[index].identifier.to_string()))
    }

    /// Prompt for a path and write the HTML visualization document there.
    fn save_visualization(
        &self,
        theme: &dialoguer::theme::ColorfulTheme,
        result: &InterpretationResult,
    ) -> anyhow::Result<()> {
        let Some(html) = result.visualization_html.as_deref() else {
            render::print_error("No visualization available for this result.");
            return Ok(());
        };

        let Some(raw_path) = handle_interrupt(
            Input::<String>::with_theme(theme)
                .with_prompt("Save HTML to")
                .default("./interpretation.html".to_string())
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let path = PathBuf::from(shellexpand::tilde(&raw_path).into_owned());
        match std::fs::write(&path, html) {
            Ok(()) => {
                let done = Style::new().for_stderr().green();
                eprintln!(
                    "  {}",
                    done.apply_to(format!("Saved to {}", path.display()))
                );
            }
            Err(e) => render::print_error(&format!("Failed to write {}: {e}", path.display())),
        }
        Ok(())
    }
}

/// Print the registry's identifier-to-description map as pretty JSON,
/// the model overview the session offers from the main menu.
fn show_model_descriptions() {
    let dim = Style::new().for_stderr().dim();
    eprintln!();
    match serde_json::to_string_pretty(&registry::descriptions()) {
        Ok(json) => {
            eprintln!("{}", dim.apply_to("─".repeat(50)));
            eprintln!("{json}");
            eprintln!("{}", dim.apply_to("─".repeat(50)));
        }
        Err(e) => render::print_error(&format!("Failed to render descriptions: {e}")),
    }
    eprintln!();
}
