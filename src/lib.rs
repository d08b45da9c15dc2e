//! askbase - semantic question answering over a small knowledge base
//!
//! Loads a fixed corpus and its precomputed sentence embeddings once, then
//! answers each query with the single most similar passage by brute-force
//! cosine similarity.

pub mod corpus;
pub mod embedder;
pub mod error;
pub mod knowledge;
pub mod metrics;
pub mod persistence;
pub mod server;
pub mod vector;

pub use corpus::Corpus;
pub use embedder::{BatchOptions, Embedder};
pub use error::{Error, Result};
pub use knowledge::{Answer, KnowledgeBase};
pub use metrics::Metrics;
pub use server::{AppContext, Config, Server};
pub use vector::{best_match, EmbeddingMatrix, EmbeddingStore};

#[cfg(feature = "fastembed")]
pub use embedder::{FastEmbedder, FastEmbedderConfig};
