//! askbase CLI
//!
//! Query a running server, inspect corpus files, and precompute embeddings.

use std::path::PathBuf;

use askbase::corpus::{list_columns, DEFAULT_COLUMN};
use askbase::server::{AskRequest, AskResponse, ErrorBody};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// askbase CLI - client and maintenance tool
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a running server a question
    Ask {
        /// Question text
        query: String,

        /// Server base URL
        #[arg(short, long, default_value = "http://127.0.0.1:5001")]
        url: String,
    },

    /// List the columns of a parquet corpus file
    Columns {
        /// Corpus file
        #[arg(default_value = "data/data/corpus/corpus.parquet")]
        corpus: PathBuf,
    },

    /// Compute and save corpus embeddings ahead of starting the server
    Embed {
        /// Corpus file
        #[arg(long, default_value = "data/data/corpus/corpus.parquet")]
        corpus: PathBuf,

        /// Text column
        #[arg(long, default_value = DEFAULT_COLUMN)]
        column: String,

        /// Output embeddings file
        #[arg(long, default_value = "knowledge_base_embeddings.npy")]
        embeddings: PathBuf,

        /// Embedding model
        #[arg(long, default_value = askbase::embedder::DEFAULT_MODEL)]
        model: String,

        /// Passages per encode call
        #[arg(long, default_value_t = 256)]
        batch_size: usize,

        /// Overwrite an existing embeddings file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("askbase=info".parse()?))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Ask { query, url } => ask(&url, query).await,
        Command::Columns { corpus } => {
            println!("Inspecting file: {}", corpus.display());
            for name in list_columns(&corpus)? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Embed {
            corpus,
            column,
            embeddings,
            model,
            batch_size,
            force,
        } => {
            tokio::task::spawn_blocking(move || {
                embed(corpus, &column, embeddings, model, batch_size, force)
            })
            .await?
        }
    }
}

async fn ask(url: &str, query: String) -> anyhow::Result<()> {
    let endpoint = format!("{}/ask", url.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&AskRequest { query })
        .send()
        .await?;

    if response.status().is_success() {
        let body: AskResponse = response.json().await?;
        println!("{}", body.answer);
        Ok(())
    } else {
        let status = response.status();
        let body: ErrorBody = response.json().await?;
        anyhow::bail!("Server returned {}: {}", status, body.error)
    }
}

#[cfg(feature = "fastembed")]
fn embed(
    corpus: PathBuf,
    column: &str,
    embeddings: PathBuf,
    model: String,
    batch_size: usize,
    force: bool,
) -> anyhow::Result<()> {
    use askbase::{BatchOptions, Corpus, EmbeddingStore, FastEmbedder, FastEmbedderConfig};

    let store = EmbeddingStore::new(embeddings)
        .with_batch_options(BatchOptions::default().with_batch_size(batch_size).with_progress(true));
    if store.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to recompute",
            store.path().display()
        );
    }

    let corpus = Corpus::load(&corpus, column)?;
    let embedder = FastEmbedder::new(FastEmbedderConfig::default().with_model(model))?;
    let matrix = store.compute_and_persist(&corpus, &embedder)?;

    println!(
        "Saved {} x {} embeddings to {}",
        matrix.len(),
        matrix.dimension(),
        store.path().display()
    );
    Ok(())
}

#[cfg(not(feature = "fastembed"))]
fn embed(
    _corpus: PathBuf,
    _column: &str,
    _embeddings: PathBuf,
    _model: String,
    _batch_size: usize,
    _force: bool,
) -> anyhow::Result<()> {
    anyhow::bail!("askbase-cli was built without the `fastembed` feature")
}
