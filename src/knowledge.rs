//! Knowledge Base
//!
//! A corpus paired with its embedding matrix, row for row.

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::vector::{scan, EmbeddingMatrix};

/// Best passage for a query
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Position of the passage in the corpus
    pub index: usize,
    /// Cosine similarity between query and passage
    pub score: f32,
    /// Passage text
    pub text: String,
}

/// Corpus and embeddings with `embeddings.len() == corpus.len()` guaranteed
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    corpus: Corpus,
    embeddings: EmbeddingMatrix,
}

impl KnowledgeBase {
    /// Pair a corpus with its embeddings, failing on a row-count mismatch
    pub fn new(corpus: Corpus, embeddings: EmbeddingMatrix) -> Result<Self> {
        if embeddings.len() != corpus.len() {
            return Err(Error::RowCountMismatch {
                rows: embeddings.len(),
                passages: corpus.len(),
            });
        }
        Ok(Self { corpus, embeddings })
    }

    /// Passage most similar to an already-embedded query
    pub fn answer(&self, query: &[f32]) -> Result<Answer> {
        let hit = scan(query, &self.embeddings)?;
        let text = self.corpus.text_at(hit.index)?;
        Ok(Answer {
            index: hit.index,
            score: hit.score,
            text: text.to_string(),
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn embeddings(&self) -> &EmbeddingMatrix {
        &self.embeddings
    }

    /// Number of passages
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Embedding width
    pub fn dimension(&self) -> usize {
        self.embeddings.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(n: usize) -> Corpus {
        Corpus::from_passages((0..n).map(|i| format!("passage {}", i)).collect()).unwrap()
    }

    #[test]
    fn test_row_count_mismatch_fails_fast() {
        let embeddings = EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0]; 2]).unwrap();
        assert!(matches!(
            KnowledgeBase::new(corpus(3), embeddings),
            Err(Error::RowCountMismatch {
                rows: 2,
                passages: 3
            })
        ));

        let embeddings = EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0]; 4]).unwrap();
        assert!(KnowledgeBase::new(corpus(3), embeddings).is_err());
    }

    #[test]
    fn test_answer_returns_passage_text() {
        let embeddings =
            EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]]).unwrap();
        let kb = KnowledgeBase::new(corpus(3), embeddings).unwrap();

        let answer = kb.answer(&[0.1, 0.9]).unwrap();
        assert_eq!(answer.index, 1);
        assert_eq!(answer.text, "passage 1");
        assert!(answer.score > 0.9);
    }
}
