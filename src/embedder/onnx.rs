//! ONNX sentence embeddings via fastembed

use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use super::{Embedder, DEFAULT_MODEL};
use crate::error::{Error, Result};

/// Model names accepted by [`FastEmbedder`]
pub const SUPPORTED_MODELS: &[&str] = &[
    "all-MiniLM-L6-v2",
    "all-MiniLM-L12-v2",
    "bge-small-en-v1.5",
    "bge-base-en-v1.5",
];

/// FastEmbedder configuration
#[derive(Debug, Clone)]
pub struct FastEmbedderConfig {
    /// Model name, one of [`SUPPORTED_MODELS`]
    pub model: String,
    /// Where downloaded model files are cached (fastembed default if unset)
    pub cache_dir: Option<PathBuf>,
    /// Show the model download progress bar
    pub show_download_progress: bool,
}

impl Default for FastEmbedderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            cache_dir: None,
            show_download_progress: true,
        }
    }
}

impl FastEmbedderConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}

/// Sentence embedding model running on ONNX Runtime
pub struct FastEmbedder {
    model: TextEmbedding,
    name: String,
    dimension: usize,
}

impl FastEmbedder {
    /// Load (downloading on first use) the configured model
    pub fn new(config: FastEmbedderConfig) -> Result<Self> {
        let kind = resolve_model(&config.model)?;

        let mut options =
            InitOptions::new(kind).with_show_download_progress(config.show_download_progress);
        if let Some(dir) = &config.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }

        info!("Loading embedding model {}", config.model);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| Error::model(format!("Failed to load {}: {}", config.model, e)))?;

        // Get dimension by encoding test string
        let probe = model
            .embed(vec!["test"], None)
            .map_err(|e| Error::model(format!("Failed to encode test string: {}", e)))?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(Error::model(format!("{} produced an empty embedding", config.model)));
        }

        info!("Loaded {} ({}d)", config.model, dimension);

        Ok(Self {
            model,
            name: config.model,
            dimension,
        })
    }
}

impl Embedder for FastEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.model
            .embed(vec![text], None)
            .map_err(|e| Error::embedding(format!("Failed to encode text: {}", e)))?
            .pop()
            .ok_or_else(|| Error::embedding("model returned no vector"))
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.model
            .embed(texts.to_vec(), Some(texts.len()))
            .map_err(|e| Error::embedding(format!("Failed to encode texts: {}", e)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    match name {
        "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        other => Err(Error::model(format!(
            "Unknown model '{}' (supported: {})",
            other,
            SUPPORTED_MODELS.join(", ")
        ))),
    }
}
