//! Error types for askbase

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the knowledge base or answering a query
#[derive(Debug, Error)]
pub enum Error {
    /// Corpus file does not exist
    #[error("Corpus file not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    /// Corpus file exists but could not be decoded
    #[error("Failed to read corpus {}: {source}", .path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    /// Expected text column is absent
    #[error("Column '{column}' not found in corpus (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Column exists but does not hold text
    #[error("Column '{column}' is not a text column ({dtype})")]
    NotTextColumn { column: String, dtype: String },

    /// A passage cell is null
    #[error("Column '{column}' has a null value at row {row}")]
    NullPassage { column: String, row: usize },

    /// Corpus has no passages
    #[error("Corpus is empty")]
    EmptyCorpus,

    /// Passage lookup outside the corpus
    #[error("Passage index {index} out of range for corpus of {len} passages")]
    IndexOutOfRange { index: usize, len: usize },

    /// Embedding rows do not line up with corpus passages
    #[error("Embedding matrix has {rows} rows but corpus has {passages} passages")]
    RowCountMismatch { rows: usize, passages: usize },

    /// A matrix row has a different width than the rest
    #[error("Embedding row {row} has dimension {actual}, expected {expected}")]
    RowDimension {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Flat buffer length does not equal rows * dimension
    #[error("Buffer of {len} values cannot form a {rows}x{dimension} matrix")]
    Shape {
        rows: usize,
        dimension: usize,
        len: usize,
    },

    /// Stored embeddings and the embedder disagree on width
    #[error("Embedding dimension {stored} does not match model dimension {model}")]
    ModelDimension { stored: usize, model: usize },

    /// Query vector width differs from the matrix
    #[error("Query dimension {actual} does not match embedding dimension {expected}")]
    QueryDimension { expected: usize, actual: usize },

    /// Scan over a matrix with no rows
    #[error("Embedding matrix is empty")]
    EmptyMatrix,

    /// Query vector has zero magnitude
    #[error("Query embedding has zero norm")]
    ZeroNormQuery,

    /// Corpus vector has zero magnitude
    #[error("Embedding row {0} has zero norm")]
    ZeroNormRow(usize),

    /// Similarity came out NaN or infinite
    #[error("Non-finite similarity score at row {0}")]
    NonFiniteScore(usize),

    /// Stored embedding artifact failed opt-in verification
    #[error("Stored embedding for passage {row} looks stale (similarity {similarity:.4} to a fresh encoding)")]
    StaleEmbeddings { row: usize, similarity: f32 },

    /// Malformed embedding artifact
    #[error("Invalid embedding file {}: {reason}", .path.display())]
    Artifact { path: PathBuf, reason: String },

    /// Model loading error
    #[error("Model error: {0}")]
    Model(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an artifact format error
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Artifact {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
