//! askbase Server Binary
//!
//! Loads the knowledge base, then answers `POST /ask` over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use askbase::embedder::DEFAULT_MODEL;
use askbase::{AppContext, Config, FastEmbedder, FastEmbedderConfig, Server};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// askbase Server - semantic question answering
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Port number
    #[arg(short, long, default_value_t = 5001)]
    port: u16,

    /// Parquet corpus file
    #[arg(long, default_value = "data/data/corpus/corpus.parquet")]
    corpus: PathBuf,

    /// Text column in the corpus file
    #[arg(long, default_value = "doc")]
    column: String,

    /// Precomputed embeddings (.npy); computed and saved if missing
    #[arg(long, default_value = "knowledge_base_embeddings.npy")]
    embeddings: PathBuf,

    /// Embedding model
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Model download cache directory
    #[arg(long)]
    model_cache: Option<PathBuf>,

    /// Passages per encode call when computing embeddings
    #[arg(long, default_value_t = 256)]
    batch_size: usize,

    /// Hide the progress bar while computing embeddings
    #[arg(long)]
    no_progress: bool,

    /// Skip the warm-up encode before serving
    #[arg(long)]
    no_warmup: bool,

    /// Re-encode N passages at startup and fail if stored embeddings look stale
    #[arg(long, default_value_t = 0)]
    verify_embeddings: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("askbase=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = Config::default()
        .with_bind(&args.bind)
        .with_port(args.port)
        .with_corpus(args.corpus, args.column)
        .with_embeddings(args.embeddings)
        .with_model(args.model)
        .with_batch_size(args.batch_size)
        .with_progress(!args.no_progress)
        .with_warm_up(!args.no_warmup)
        .with_verify_samples(args.verify_embeddings);
    config.model_cache = args.model_cache;

    let mut embedder_config = FastEmbedderConfig::default().with_model(config.model.clone());
    if let Some(dir) = &config.model_cache {
        embedder_config = embedder_config.with_cache_dir(dir.clone());
    }

    info!("Loading model and knowledge base...");
    let startup_config = config.clone();
    let context = tokio::task::spawn_blocking(move || -> askbase::Result<AppContext> {
        let embedder = Arc::new(FastEmbedder::new(embedder_config)?);
        AppContext::bootstrap(&startup_config, embedder)
    })
    .await??;

    Server::new(config, context).run().await?;

    Ok(())
}
