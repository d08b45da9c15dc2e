//! Text Embedders
//!
//! A pretrained text-to-vector function, used in batch mode to embed the
//! corpus once and in single mode to embed each incoming query.

#[cfg(feature = "fastembed")]
mod onnx;
#[cfg(test)]
pub(crate) mod testing;

#[cfg(feature = "fastembed")]
pub use onnx::{FastEmbedder, FastEmbedderConfig, SUPPORTED_MODELS};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::{Error, Result};
use crate::vector::EmbeddingMatrix;

/// Default model, matching the reference deployment
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Deterministic text-to-vector mapping
pub trait Embedder: Send + Sync {
    /// Embed a single text
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving order
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Width of every vector this embedder returns
    fn dimension(&self) -> usize;

    /// Model name/identifier
    fn model_name(&self) -> &str;
}

/// Options for embedding a whole corpus
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Passages per encode call
    pub batch_size: usize,
    /// Draw a terminal progress bar
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 256,
            show_progress: false,
        }
    }
}

impl BatchOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Embed every passage, one row per passage in corpus order
pub fn embed_corpus<S: AsRef<str>>(
    embedder: &dyn Embedder,
    passages: &[S],
    options: &BatchOptions,
) -> Result<EmbeddingMatrix> {
    let progress = if options.show_progress {
        let bar = ProgressBar::new(passages.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} passages ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut rows = Vec::with_capacity(passages.len());
    for chunk in passages.chunks(options.batch_size.max(1)) {
        let texts: Vec<&str> = chunk.iter().map(|s| s.as_ref()).collect();
        let vectors = embedder.encode_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::embedding(format!(
                "model returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        rows.extend(vectors);
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    let matrix = EmbeddingMatrix::from_rows(rows)?;
    info!(
        "Embedded {} passages with {} ({}d)",
        matrix.len(),
        embedder.model_name(),
        matrix.dimension()
    );
    Ok(matrix)
}

/// Run one throwaway encode so the first request does not pay for lazy setup
pub fn warm_up(embedder: &dyn Embedder) -> Result<()> {
    let vector = embedder.encode("warm up")?;
    if vector.len() != embedder.dimension() {
        return Err(Error::ModelDimension {
            stored: vector.len(),
            model: embedder.dimension(),
        });
    }
    Ok(())
}
