//! Shared fixtures for integration tests

use std::sync::Arc;

use askbase::{AppContext, Corpus, Embedder, EmbeddingMatrix, KnowledgeBase, Result};

pub const PASSAGES: &[&str] = &["The sky is blue.", "Cats are mammals.", "Water boils at 100C."];

const TOPICS: &[&[&str]] = &[
    &["sky", "blue", "color"],
    &["cat", "cats", "mammal", "mammals"],
    &["water", "boil", "boils", "100c"],
];

/// Counts topic keywords plus a constant bias axis
#[derive(Debug, Default)]
pub struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; TOPICS.len() + 1];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
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

    fn dimension(&self) -> usize {
        TOPICS.len() + 1
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Context over the three sample passages
pub fn sample_context() -> AppContext {
    let embedder = Arc::new(KeywordEmbedder);
    let rows = PASSAGES
        .iter()
        .map(|p| embedder.encode(p).unwrap())
        .collect();
    let corpus = Corpus::from_passages(PASSAGES.iter().map(|p| p.to_string()).collect()).unwrap();
    let kb = KnowledgeBase::new(corpus, EmbeddingMatrix::from_rows(rows).unwrap()).unwrap();
    AppContext::new(kb, embedder).unwrap()
}
