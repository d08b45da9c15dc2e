//! Application Context
//!
//! Everything a request handler needs, built once at startup and shared
//! read-only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::config::Config;
use crate::corpus::Corpus;
use crate::embedder::{warm_up, BatchOptions, Embedder};
use crate::error::{Error, Result};
use crate::knowledge::{Answer, KnowledgeBase};
use crate::metrics::Metrics;
use crate::vector::EmbeddingStore;

/// Loaded knowledge base, embedder and request metrics
pub struct AppContext {
    knowledge: KnowledgeBase,
    embedder: Arc<dyn Embedder>,
    metrics: Metrics,
    started_at: DateTime<Utc>,
}

impl AppContext {
    /// Pair a knowledge base with the embedder that produced it
    pub fn new(knowledge: KnowledgeBase, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if knowledge.dimension() != embedder.dimension() {
            return Err(Error::ModelDimension {
                stored: knowledge.dimension(),
                model: embedder.dimension(),
            });
        }
        Ok(Self {
            knowledge,
            embedder,
            metrics: Metrics::new(),
            started_at: Utc::now(),
        })
    }

    /// Startup sequence: load corpus, load or compute embeddings, optionally
    /// verify them, then optionally warm the model
    ///
    /// Blocking. Any error means the service must not start.
    pub fn bootstrap(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let corpus = Corpus::load(&config.corpus_path, &config.text_column)?;

        let batch = BatchOptions::default()
            .with_batch_size(config.batch_size)
            .with_progress(config.show_progress);
        let store = EmbeddingStore::new(&config.embeddings_path).with_batch_options(batch);
        let embeddings = store.load_or_compute(&corpus, embedder.as_ref())?;

        if config.verify_samples > 0 {
            EmbeddingStore::verify(&embeddings, &corpus, embedder.as_ref(), config.verify_samples)?;
        }

        let knowledge = KnowledgeBase::new(corpus, embeddings)?;

        if config.warm_up {
            warm_up(embedder.as_ref())?;
        }

        info!(
            "Knowledge base ready: {} passages, {}d, model {}",
            knowledge.len(),
            knowledge.dimension(),
            embedder.model_name()
        );

        Self::new(knowledge, embedder)
    }

    /// Embed `query` and return the most similar passage
    pub fn ask(&self, query: &str) -> Result<Answer> {
        let vector = self.embedder.encode(query)?;
        self.knowledge.answer(&vector)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::testing::KeywordEmbedder;
    use crate::vector::EmbeddingMatrix;

    #[test]
    fn test_ask_returns_closest_passage() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let corpus = Corpus::from_passages(vec![
            "The sky is blue.".to_string(),
            "Cats are mammals.".to_string(),
            "Water boils at 100C.".to_string(),
        ])
        .unwrap();
        let rows = corpus
            .passages()
            .iter()
            .map(|p| embedder.encode(p).unwrap())
            .collect();
        let kb = KnowledgeBase::new(corpus, EmbeddingMatrix::from_rows(rows).unwrap()).unwrap();
        let ctx = AppContext::new(kb, embedder).unwrap();

        assert_eq!(ctx.ask("What color is the sky?").unwrap().text, "The sky is blue.");
        assert_eq!(ctx.ask("Do cats count as mammals?").unwrap().index, 1);
    }

    #[test]
    fn test_model_dimension_mismatch() {
        let corpus = Corpus::from_passages(vec!["a".to_string()]).unwrap();
        let kb = KnowledgeBase::new(corpus, EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0]]).unwrap())
            .unwrap();
        assert!(matches!(
            AppContext::new(kb, Arc::new(KeywordEmbedder::default())),
            Err(Error::ModelDimension { stored: 2, model: 4 })
        ));
    }
}
