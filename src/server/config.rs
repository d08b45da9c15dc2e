//! Server Configuration

use std::path::PathBuf;

use crate::corpus::DEFAULT_COLUMN;
use crate::embedder::DEFAULT_MODEL;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub bind: String,

    /// Port number
    pub port: u16,

    /// Parquet corpus file
    pub corpus_path: PathBuf,

    /// Text column inside the corpus file
    pub text_column: String,

    /// Precomputed embeddings (`.npy`), created if absent
    pub embeddings_path: PathBuf,

    /// Embedding model name
    pub model: String,

    /// Model download cache (fastembed default if unset)
    pub model_cache: Option<PathBuf>,

    /// Passages per encode call when computing embeddings
    pub batch_size: usize,

    /// Progress bar while computing embeddings
    pub show_progress: bool,

    /// Encode once before accepting requests
    pub warm_up: bool,

    /// Passages to re-encode and compare against stored embeddings (0 = trust the file)
    pub verify_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5001,
            corpus_path: PathBuf::from("data/data/corpus/corpus.parquet"),
            text_column: DEFAULT_COLUMN.to_string(),
            embeddings_path: PathBuf::from("knowledge_base_embeddings.npy"),
            model: DEFAULT_MODEL.to_string(),
            model_cache: None,
            batch_size: 256,
            show_progress: true,
            warm_up: true,
            verify_samples: 0,
        }
    }
}

impl Config {
    /// Create a new config with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create a new config with custom bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Corpus file and the column holding passage text
    pub fn with_corpus(mut self, path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        self.corpus_path = path.into();
        self.text_column = column.into();
        self
    }

    pub fn with_embeddings(mut self, path: impl Into<PathBuf>) -> Self {
        self.embeddings_path = path.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_warm_up(mut self, warm_up: bool) -> Self {
        self.warm_up = warm_up;
        self
    }

    /// Opt into re-encoding `samples` passages at startup to catch stale embeddings
    pub fn with_verify_samples(mut self, samples: usize) -> Self {
        self.verify_samples = samples;
        self
    }

    /// `bind:port` listen address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.addr(), "0.0.0.0:5001");
        assert_eq!(config.text_column, "doc");
        assert_eq!(config.model, "all-MiniLM-L6-v2");
        assert_eq!(config.verify_samples, 0);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_bind("127.0.0.1")
            .with_port(8080)
            .with_corpus("kb.parquet", "text")
            .with_verify_samples(5);
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.corpus_path, PathBuf::from("kb.parquet"));
        assert_eq!(config.text_column, "text");
        assert_eq!(config.verify_samples, 5);
    }
}
