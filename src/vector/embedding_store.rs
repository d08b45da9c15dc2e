//! Embedding Store
//!
//! Cache-or-compute handling of the precomputed corpus embedding artifact.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::matrix::EmbeddingMatrix;
use super::similarity::cosine_similarity;
use crate::corpus::Corpus;
use crate::embedder::{embed_corpus, BatchOptions, Embedder};
use crate::error::{Error, Result};
use crate::persistence::npy;

/// Minimum similarity between a stored row and a fresh encoding in [`EmbeddingStore::verify`]
pub const VERIFY_THRESHOLD: f32 = 0.99;

/// Embedding artifact on disk
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    path: PathBuf,
    batch: BatchOptions,
}

impl EmbeddingStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            batch: BatchOptions::default(),
        }
    }

    /// Batch settings used when the artifact has to be computed
    pub fn with_batch_options(mut self, batch: BatchOptions) -> Self {
        self.batch = batch;
        self
    }

    /// Artifact location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the artifact exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the artifact if present, otherwise compute and persist it
    ///
    /// An existing artifact is trusted as-is. If the corpus changed but the
    /// file did not, the stale matrix is returned; only a row-count or
    /// dimension mismatch is detected. Use [`EmbeddingStore::verify`] to opt
    /// into a content check.
    pub fn load_or_compute(&self, corpus: &Corpus, embedder: &dyn Embedder) -> Result<EmbeddingMatrix> {
        let matrix = if self.exists() {
            info!("Loading existing embeddings from {}", self.path.display());
            self.load()?
        } else {
            info!(
                "Embeddings file {} not found, computing {} passages (this can take minutes)",
                self.path.display(),
                corpus.len()
            );
            self.compute_and_persist(corpus, embedder)?
        };

        check_alignment(&matrix, corpus, embedder)?;
        Ok(matrix)
    }

    /// Read the artifact without any corpus checks
    pub fn load(&self) -> Result<EmbeddingMatrix> {
        npy::load(&self.path)
    }

    /// Embed the whole corpus and write the artifact, replacing any existing file
    pub fn compute_and_persist(&self, corpus: &Corpus, embedder: &dyn Embedder) -> Result<EmbeddingMatrix> {
        let matrix = embed_corpus(embedder, corpus.passages(), &self.batch)?;
        npy::save(&self.path, &matrix)?;
        info!("Saved embeddings to {}", self.path.display());
        Ok(matrix)
    }

    /// Re-encode up to `samples` evenly spaced passages and compare with stored rows
    pub fn verify(
        matrix: &EmbeddingMatrix,
        corpus: &Corpus,
        embedder: &dyn Embedder,
        samples: usize,
    ) -> Result<()> {
        check_alignment(matrix, corpus, embedder)?;

        let rows = sample_rows(corpus.len(), samples);
        for &row in &rows {
            let fresh = embedder.encode(corpus.text_at(row)?)?;
            let stored = matrix.row(row).ok_or(Error::IndexOutOfRange {
                index: row,
                len: matrix.len(),
            })?;
            let similarity = cosine_similarity(&fresh, stored).unwrap_or(0.0);
            if similarity < VERIFY_THRESHOLD {
                warn!(row, similarity, "Stored embedding differs from fresh encoding");
                return Err(Error::StaleEmbeddings { row, similarity });
            }
        }

        info!("Verified {} stored embeddings against the model", rows.len());
        Ok(())
    }
}

/// Row count must equal corpus length and width must equal the model's
pub fn check_alignment(matrix: &EmbeddingMatrix, corpus: &Corpus, embedder: &dyn Embedder) -> Result<()> {
    if matrix.len() != corpus.len() {
        return Err(Error::RowCountMismatch {
            rows: matrix.len(),
            passages: corpus.len(),
        });
    }
    if matrix.dimension() != embedder.dimension() {
        return Err(Error::ModelDimension {
            stored: matrix.dimension(),
            model: embedder.dimension(),
        });
    }
    Ok(())
}

fn sample_rows(len: usize, samples: usize) -> Vec<usize> {
    if samples >= len {
        return (0..len).collect();
    }
    (0..samples).map(|i| i * len / samples).collect()
}
