//! Vector Module
//!
//! Embedding storage, cosine similarity and best-match retrieval.

mod embedding_store;
mod matrix;
mod retriever;
mod similarity;

pub use embedding_store::{check_alignment, EmbeddingStore, VERIFY_THRESHOLD};
pub use matrix::EmbeddingMatrix;
pub use retriever::{best_match, scan, Match};
pub use similarity::{cosine_similarity, dot_product, magnitude};
