// Fetches the sentence embedding model used by the `onnx` backend.
//
// Files land in <model_dir>/all-MiniLM-L6-v2/. The default model_dir is the
// platform data directory (~/.local/share/atsgauge/models/ on Linux). Each
// file is streamed to a `.part` sibling and renamed once complete, so an
// interrupted download never leaves a truncated model behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

const HF_REPO_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

const MODEL_SUBDIR: &str = "all-MiniLM-L6-v2";

/// One file of the model bundle.
struct ModelFile {
    /// Path inside the HuggingFace repo
    remote: &'static str,
    /// File name inside the local model directory
    local: &'static str,
    /// Human hint printed before the download starts
    size_hint: Option<&'static str>,
}

const MODEL_FILES: [ModelFile; 2] = [
    ModelFile {
        remote: "tokenizer.json",
        local: "tokenizer.json",
        size_hint: None,
    },
    ModelFile {
        remote: "onnx/model.onnx",
        local: "model.onnx",
        size_hint: Some("~90 MB"),
    },
];

pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("atsgauge")
        .join("models")
}

/// Directory holding the embedding model inside `base`.
pub fn embedding_model_dir(base: &Path) -> PathBuf {
    base.join(MODEL_SUBDIR)
}

/// True when every file of the model bundle is on disk.
pub fn embedding_files_present(base: &Path) -> bool {
    let dir = embedding_model_dir(base);
    MODEL_FILES.iter().all(|f| dir.join(f.local).exists())
}

/// Download the model bundle into `base`, skipping files already present.
pub async fn download_model(base: &Path) -> Result<()> {
    let dir = embedding_model_dir(base);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nSentence embedding model ({MODEL_SUBDIR}):");

    let client = reqwest::Client::new();
    for file in &MODEL_FILES {
        let dest = dir.join(file.local);
        if dest.exists() {
            info!(file = file.local, "Model file already present, skipping");
            println!("  {} (already exists)", file.local);
            continue;
        }

        match file.size_hint {
            Some(hint) => println!("  Downloading {} ({hint})...", file.local),
            None => println!("  Downloading {}...", file.local),
        }
        let url = format!("{HF_REPO_URL}/{}", file.remote);
        fetch_to(&client, &url, &dest).await?;
    }

    Ok(())
}

/// Stream `url` into `dest` with a progress bar.
async fn fetch_to(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {url}", response.status());
    }

    let pb = progress_bar(response.content_length());
    let partial = dest.with_extension("part");
    let mut out = std::fs::File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed while reading {url}"))?
    {
        out.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    out.flush()?;
    drop(out);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;
    pb.finish_and_clear();

    info!(url, bytes = written, dest = %dest.display(), "Downloaded model file");
    Ok(())
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(size) => ProgressBar::new(size).with_style(
            ProgressStyle::default_bar()
                .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("valid template")
                .progress_chars("=> "),
        ),
        None => ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("    {spinner} {bytes}")
                .expect("valid template"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_atsgauge() {
        let path = default_model_dir();
        assert!(path.ends_with("atsgauge/models"), "got {}", path.display());
    }

    #[test]
    fn test_model_dir_is_named_after_model() {
        let base = PathBuf::from("/tmp/ats-models");
        assert_eq!(embedding_model_dir(&base), base.join("all-MiniLM-L6-v2"));
    }

    #[test]
    fn test_files_present_requires_every_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!embedding_files_present(dir.path()));

        let model_dir = embedding_model_dir(dir.path());
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("tokenizer.json"), b"{}").unwrap();
        assert!(!embedding_files_present(dir.path()));

        std::fs::write(model_dir.join("model.onnx"), b"onnx").unwrap();
        assert!(embedding_files_present(dir.path()));
    }

    #[test]
    fn test_partial_file_is_a_sibling() {
        let dest = PathBuf::from("/m/all-MiniLM-L6-v2/model.onnx");
        assert_eq!(
            dest.with_extension("part"),
            PathBuf::from("/m/all-MiniLM-L6-v2/model.part")
        );
    }
}
