//! Deterministic embedder for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use super::Embedder;
use crate::error::Result;

/// Keyword groups, one vector axis each
const TOPICS: &[&[&str]] = &[
    &["sky", "blue", "color", "colour"],
    &["cat", "cats", "mammal", "mammals"],
    &["water", "boil", "boils", "100c"],
];

/// Counts topic keywords; a small bias axis keeps every vector non-zero
#[derive(Debug, Default)]
pub(crate) struct KeywordEmbedder {
    batch_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub(crate) fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::Relaxed)
    }
}

impl Embedder for KeywordEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; TOPICS.len() + 1];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            for (axis, keywords) in TOPICS.iter().enumerate() {
                if keywords.contains(&word.as_str()) {
                    vector[axis] += 1.0;
                }
            }
        }
        vector[TOPICS.len()] = 0.1;
        Ok(vector)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::Relaxed);
        texts.iter().map(|text| self.encode(text)).collect()
    }

    fn dimension(&self) -> usize {
        TOPICS.len() + 1
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}
