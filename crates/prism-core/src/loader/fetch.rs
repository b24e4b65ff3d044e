//! Streaming download of model files with integrity verification.
//!
//! Files are fetched from the Hugging Face CDN straight to disk. When a
//! BLAKE3 checksum is pinned in the registry the download is verified and a
//! corrupt file is removed so the next run re-downloads it.

use std::fs::File;
use std::path::Path;

use blake3::Hasher as Blake3Hasher;

use crate::error::ModelError;
use crate::registry::ModelDescriptor;

/// Progress is logged roughly every this many bytes.
const PROGRESS_STEP_BYTES: u64 = 50 * 1024 * 1024;

/// Build the download URL for a file inside a Hugging Face repo.
pub fn file_url(repo: &str, remote_path: &str) -> String {
    format!("https://huggingface.co/{repo}/resolve/main/{remote_path}")
}

fn download_err(url: &str, message: impl Into<String>) -> ModelError {
    ModelError::Download {
        url: url.to_string(),
        message: message.into(),
    }
}

/// Ensure all of a model's files exist in `model_dir`, downloading the
/// missing ones. Files already on disk are skipped.
pub async fn ensure_model_files(
    client: &reqwest::Client,
    descriptor: &ModelDescriptor,
    model_dir: &Path,
) -> Result<(), ModelError> {
    for file in descriptor.files() {
        let dest = model_dir.join(file.local_name);
        if dest.exists() {
            tracing::debug!("{} already exists at {:?}", file.local_name, dest);
            continue;
        }

        std::fs::create_dir_all(model_dir)?;

        let url = file_url(descriptor.weights_repo, file.remote_path);
        tracing::info!("Downloading {} for {}...", file.local_name, descriptor.identifier);
        tracing::info!("  {} -> {:?}", url, dest);

        download_file(client, &url, &dest, file.blake3).await?;

        let written = std::fs::metadata(&dest)?.len();
        tracing::info!(
            "  Done: {} ({:.1} MB)",
            file.local_name,
            written as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(())
}

/// Stream a single URL to `dest`, verifying against `expected_blake3`
/// when a checksum is pinned.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    expected_blake3: Option<&str>,
) -> Result<(), ModelError> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| download_err(url, e.to_string()))?;

    let total_size = response.content_length();
    if let Some(total) = total_size {
        tracing::info!("  Size: {:.1} MB", total as f64 / (1024.0 * 1024.0));
    }

    let mut file = tokio::io::BufWriter::new(tokio::fs::File::create(dest).await?);
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut next_report = PROGRESS_STEP_BYTES;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_err(url, format!("Stream interrupted: {e}")))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if downloaded >= next_report {
            next_report += PROGRESS_STEP_BYTES;
            match total_size {
                Some(total) => {
                    tracing::info!("  {:.0}% downloaded", downloaded as f64 / total as f64 * 100.0)
                }
                None => {
                    tracing::info!("  {:.1} MB downloaded", downloaded as f64 / (1024.0 * 1024.0))
                }
            }
        }
    }

    file.flush().await?;

    if let Some(expected) = expected_blake3 {
        verify_blake3(dest, expected)?;
    }

    Ok(())
}

/// BLAKE3 hash of a file's contents.
pub fn content_hash(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut hasher = Blake3Hasher::new();
    hasher.update_reader(file)?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Compare a file against its pinned BLAKE3 checksum, deleting the file on
/// mismatch so the next run re-downloads it.
pub fn verify_blake3(path: &Path, expected: &str) -> Result<(), ModelError> {
    let actual = content_hash(path)?;

    if actual != expected {
        let _ = std::fs::remove_file(path);
        return Err(ModelError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }

    tracing::debug!("  Checksum ok ({}…)", &actual[..16]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn file_url_format() {
        assert_eq!(
            file_url("Xenova/distilbert-base-uncased-mnli", "onnx/model.onnx"),
            "https://huggingface.co/Xenova/distilbert-base-uncased-mnli/resolve/main/onnx/model.onnx"
        );
    }

    #[test]
    fn content_hash_matches_in_memory_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_file(dir.path(), "blob.bin", b"hello prism");

        let streamed = content_hash(&path).unwrap();
        let direct = blake3::hash(b"hello prism").to_hex().to_string();
        assert_eq!(streamed, direct);
    }

    #[test]
    fn checksum_match_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_file(dir.path(), "verify_ok", b"hello prism");
        let expected = content_hash(&path).unwrap();

        assert!(verify_blake3(&path, &expected).is_ok());
        assert!(path.exists(), "verified file must be left in place");
    }

    #[test]
    fn checksum_mismatch_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_file(dir.path(), "verify_bad", b"hello prism");
        let wrong = "0".repeat(64);

        match verify_blake3(&path, &wrong) {
            Err(ModelError::ChecksumMismatch { expected, .. }) => {
                assert_eq!(expected, wrong);
            }
            other => panic!("expected checksum mismatch, got {other:?}"),
        }
        assert!(!path.exists(), "mismatched file must be removed");
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = verify_blake3(Path::new("/nonexistent/model.onnx"), &"0".repeat(64));
        assert!(matches!(result, Err(ModelError::Io(_))));
    }
}
