use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use atsgauge::config::{self, EmbeddingBackend};
use atsgauge::embedding::{EmbeddingProvider, HashedNgramEmbedder, UnavailableProvider};
use atsgauge::pipeline::rank::{self, ResumeInput};

/// atsgauge: score a resume against a job description the way an ATS would.
///
/// Combines keyword coverage, TF-IDF similarity and embedding similarity into
/// one 0-100 score with missing keywords and improvement suggestions.
#[derive(Parser)]
#[command(name = "atsgauge", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one resume against one job description
    Score {
        /// Plain-text resume
        #[arg(long)]
        resume: PathBuf,

        /// Plain-text job description
        #[arg(long)]
        job: PathBuf,

        /// Print the report as JSON instead of a colored summary
        #[arg(long)]
        json: bool,

        /// Also write a Markdown report to this path
        #[arg(long)]
        report: Option<String>,

        /// Skip the semantic layer (scores in degraded mode)
        #[arg(long)]
        no_semantic: bool,
    },

    /// Rank several resumes against one job description
    Rank {
        /// Plain-text job description
        #[arg(long)]
        job: PathBuf,

        /// Resume files to rank
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Number of resumes to score in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Show the keywords extracted from a job description
    Keywords {
        /// Plain-text job description
        #[arg(long)]
        job: PathBuf,

        /// Maximum keywords to show (default: ATS_MAX_KEYWORDS or 25)
        #[arg(long)]
        max: Option<usize>,
    },

    /// Print the effective scoring configuration as JSON
    Config,

    /// Download the ONNX sentence embedding model (~90 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("atsgauge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            resume,
            job,
            json,
            report,
            no_semantic,
        } => {
            let config = config::Config::load()?;
            let provider: Box<dyn EmbeddingProvider> = if no_semantic {
                Box::new(UnavailableProvider)
            } else {
                config.require_embedder()?;
                create_provider(&config)?
            };

            let resume_text = read_text(&resume)?;
            let jd_text = read_text(&job)?;

            let result =
                atsgauge::score(&resume_text, &jd_text, &config.scoring, provider.as_ref()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                atsgauge::output::terminal::display_report(&result);
            }

            if let Some(path) = report {
                let written = atsgauge::output::markdown::generate_report(
                    &result,
                    &display_name(&resume),
                    &display_name(&job),
                    &path,
                )?;
                if !json {
                    println!("{}", format!("Markdown report saved to: {written}").bold());
                }
            }
        }

        Commands::Rank {
            job,
            resumes,
            concurrency,
        } => {
            let config = config::Config::load()?;
            config.require_embedder()?;
            let provider = create_provider(&config)?;

            let jd_text = read_text(&job)?;
            let inputs = resumes
                .iter()
                .map(|path| -> Result<ResumeInput> {
                    Ok(ResumeInput::new(display_name(path), read_text(path)?))
                })
                .collect::<Result<Vec<_>>>()?;

            println!(
                "Ranking {} resumes against {} ({} concurrent)...",
                inputs.len(),
                display_name(&job),
                concurrency
            );

            let ranked =
                rank::rank_resumes(&jd_text, inputs, &config.scoring, provider.as_ref(), concurrency)
                    .await?;
            atsgauge::output::terminal::display_ranking(&ranked);
        }

        Commands::Keywords { job, max } => {
            let config = config::Config::load()?;
            let jd_text = read_text(&job)?;
            let document =
                atsgauge::text::normalize(&jd_text, atsgauge::DocumentRole::JobDescription)?;
            let keywords = atsgauge::keywords::extract_keywords(
                &document,
                max.unwrap_or(config.scoring.max_keywords),
            )?;
            atsgauge::output::terminal::display_keywords(&keywords);
        }

        Commands::Config => {
            let config = config::Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config.scoring)?);
            println!();
            println!("{}", format!("Embedder: {}", config.embedder.as_str()).dimmed());
            if let Some(path) = &config.config_file {
                println!("{}", format!("Loaded from: {}", path.display()).dimmed());
            }
        }

        Commands::DownloadModel => {
            let config = config::Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX embedding model...");
            println!("  Destination: {}", model_dir.display());

            atsgauge::embedding::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("Set ATS_EMBEDDER=onnx to use it for semantic scoring.");
        }
    }

    Ok(())
}

/// Create an embedding provider based on the configured backend.
fn create_provider(config: &config::Config) -> Result<Box<dyn EmbeddingProvider>> {
    match config.embedder {
        EmbeddingBackend::Hashed => {
            info!("Using built-in hashed n-gram embedder");
            Ok(Box::new(HashedNgramEmbedder::default()))
        }
        EmbeddingBackend::Onnx => load_onnx(config),
        EmbeddingBackend::Http => {
            let url = config
                .embedding_url
                .clone()
                .context("ATS_EMBEDDING_URL not set")?;
            info!(url = %url, model = %config.embedding_model, "Using remote embedding endpoint");
            Ok(Box::new(atsgauge::embedding::http::HttpEmbedder::new(
                url,
                Some(config.embedding_api_key.clone()),
                config.embedding_model.clone(),
                config.embedding_rps,
            )?))
        }
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(config: &config::Config) -> Result<Box<dyn EmbeddingProvider>> {
    let dir = atsgauge::embedding::download::embedding_model_dir(&config.model_dir);
    let embedder = atsgauge::embedding::onnx::OnnxEmbedder::load(&dir)?;
    info!("Using local ONNX sentence embedder");
    Ok(Box::new(embedder))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_config: &config::Config) -> Result<Box<dyn EmbeddingProvider>> {
    anyhow::bail!(
        "ATS_EMBEDDER=onnx but the 'onnx' feature is not compiled in.\n\
         Rebuild with: cargo build --features onnx"
    )
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// File name for display, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
