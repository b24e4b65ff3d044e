//! The `prism models` command for managing NLI models.

use clap::{Args, Subcommand};
use prism_core::loader::fetch;
use prism_core::registry::{self, ModelDescriptor};
use prism_core::{Config, ModelLoader};

#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download model files (ONNX graph + tokenizer + head config)
    Download {
        /// Download a single model by identifier (default: all registered models)
        #[arg(long)]
        model: Option<String>,

        /// Re-download files that are already present
        #[arg(long)]
        force: bool,
    },

    /// List registered models and their install status
    List,

    /// Print the model directory location
    Path,
}

pub async fn execute(args: ModelsArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let loader = ModelLoader::new(&config);

    match args.command {
        ModelsCommand::Download { model, force } => {
            let targets = download_targets(model.as_deref())?;
            tracing::info!(
                "Downloading {} model(s) to {:?}",
                targets.len(),
                config.model_dir()
            );

            let client = reqwest::Client::new();
            for descriptor in targets {
                let dir = loader.model_dir(descriptor);

                if force {
                    remove_model_files(descriptor, &dir)?;
                } else if loader.is_downloaded(descriptor) {
                    tracing::info!("{} already installed at {:?}", descriptor.identifier, dir);
                    continue;
                }

                tracing::info!("Downloading {}...", descriptor.identifier);
                fetch::ensure_model_files(&client, descriptor, &dir).await?;
            }

            tracing::info!("Model files are up to date.");
        }

        ModelsCommand::List => {
            let model_dir = config.model_dir();

            println!("Registered models in {}:\n", model_dir.display());

            for descriptor in registry::all() {
                let status = install_status(&loader, descriptor);
                println!("  - {:<42} {}", descriptor.identifier, status);
                if !descriptor.description.is_empty() {
                    println!("      {}", descriptor.description);
                }
            }

            println!("\nRun `prism models download` to fetch missing files.");
        }

        ModelsCommand::Path => {
            println!("{}", config.model_dir().display());
        }
    }

    Ok(())
}

/// Resolve which registry entries a download request covers.
fn download_targets(identifier: Option<&str>) -> anyhow::Result<Vec<&'static ModelDescriptor>> {
    match identifier {
        Some(id) => {
            let descriptor = registry::find(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown model '{}'. Registered models:\n{}",
                    id,
                    registry::identifiers()
                        .iter()
                        .map(|known| format!("  - {known}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            })?;
            Ok(vec![descriptor])
        }
        None => Ok(registry::all().iter().collect()),
    }
}

/// Install status of one model: ready, partial, or not installed.
fn install_status(loader: &ModelLoader, descriptor: &ModelDescriptor) -> &'static str {
    if loader.is_downloaded(descriptor) {
        return "ready";
    }
    let dir = loader.model_dir(descriptor);
    let any_present = descriptor
        .files()
        .iter()
        .any(|file| dir.join(file.local_name).exists());
    if any_present {
        "partial"
    } else {
        "not installed"
    }
}

/// Delete a model's local files so `--force` re-downloads them.
fn remove_model_files(descriptor: &ModelDescriptor, dir: &std::path::Path) -> anyhow::Result<()> {
    for file in descriptor.files() {
        let path = dir.join(file.local_name);
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed {:?}", path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader_with_root(dir: &std::path::Path) -> ModelLoader {
        let mut config = Config::default();
        config.general.model_dir = dir.to_path_buf();
        ModelLoader::new(&config)
    }

    #[test]
    fn download_targets_default_covers_registry() {
        let targets = download_targets(None).unwrap();
        assert_eq!(targets.len(), registry::all().len());
    }

    #[test]
    fn download_targets_single_known_model() {
        let targets = download_targets(Some("typeform/squeezebert-mnli")).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].identifier, "typeform/squeezebert-mnli");
    }

    #[test]
    fn download_targets_unknown_model_lists_alternatives() {
        let err = download_targets(Some("facebook/bart-large-mnli")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unknown model"));
        assert!(message.contains("typeform/distilbert-base-uncased-mnli"));
    }

    #[test]
    fn install_status_not_installed_when_dir_missing() {
        let root = tempfile::tempdir().unwrap();
        let loader = loader_with_root(root.path());
        let descriptor = registry::find("typeform/squeezebert-mnli").unwrap();
        assert_eq!(install_status(&loader, descriptor), "not installed");
    }

    #[test]
    fn install_status_partial_with_some_files() {
        let root = tempfile::tempdir().unwrap();
        let loader = loader_with_root(root.path());
        let descriptor = registry::find("typeform/squeezebert-mnli").unwrap();

        let dir = loader.model_dir(descriptor);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(registry::TOKENIZER_LOCAL_NAME), b"stub").unwrap();

        assert_eq!(install_status(&loader, descriptor), "partial");
    }

    #[test]
    fn install_status_ready_with_all_files() {
        let root = tempfile::tempdir().unwrap();
        let loader = loader_with_root(root.path());
        let descriptor = registry::find("typeform/squeezebert-mnli").unwrap();

        let dir = loader.model_dir(descriptor);
        std::fs::create_dir_all(&dir).unwrap();
        for file in descriptor.files() {
            std::fs::write(dir.join(file.local_name), b"stub").unwrap();
        }

        assert_eq!(install_status(&loader, descriptor), "ready");
    }

    #[test]
    fn remove_model_files_clears_existing() {
        let root = tempfile::tempdir().unwrap();
        let loader = loader_with_root(root.path());
        let descriptor = registry::find("typeform/squeezebert-mnli").unwrap();

        let dir = loader.model_dir(descriptor);
        std::fs::create_dir_all(&dir).unwrap();
        for file in descriptor.files() {
            std::fs::write(dir.join(file.local_name), b"stub").unwrap();
        }

        remove_model_files(descriptor, &dir).unwrap();
        assert_eq!(install_status(&loader, descriptor), "not installed");
    }
}
