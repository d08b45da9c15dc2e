//! Corpus Store
//!
//! Ordered, immutable passages loaded from a parquet table.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{Error, Result};

/// Default text column
pub const DEFAULT_COLUMN: &str = "doc";

/// Ordered passages, identified only by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    passages: Vec<String>,
}

impl Corpus {
    /// Wrap an in-memory passage list
    pub fn from_passages(passages: Vec<String>) -> Result<Self> {
        if passages.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(Self { passages })
    }

    /// Load the text column of a parquet file
    ///
    /// Missing file, unreadable file, missing or non-text column, null cells
    /// and an empty table are all errors.
    pub fn load(path: &Path, column: &str) -> Result<Self> {
        let df = read_frame(path)?;

        let series = match df.column(column) {
            Ok(col) => col.as_materialized_series(),
            Err(_) => {
                return Err(Error::MissingColumn {
                    column: column.to_string(),
                    available: column_names(&df),
                })
            }
        };

        let text = series.str().map_err(|_| Error::NotTextColumn {
            column: column.to_string(),
            dtype: series.dtype().to_string(),
        })?;

        let passages = text
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.map(str::to_string).ok_or_else(|| Error::NullPassage {
                    column: column.to_string(),
                    row,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let corpus = Self::from_passages(passages)?;
        info!("Loaded {} passages from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    /// Passage at `index`
    pub fn text_at(&self, index: usize) -> Result<&str> {
        self.passages
            .get(index)
            .map(String::as_str)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.passages.len(),
            })
    }

    /// Number of passages
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Always false for a loaded corpus
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// All passages in order
    pub fn passages(&self) -> &[String] {
        &self.passages
    }
}

/// Column names of a parquet file, in table order
pub fn list_columns(path: &Path) -> Result<Vec<String>> {
    read_frame(path).map(|df| column_names(&df))
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(Error::CorpusNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    ParquetReader::new(file)
        .finish()
        .map_err(|source| Error::CorpusRead {
            path: path.to_path_buf(),
            source,
        })
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_parquet(path: &Path, mut df: DataFrame) {
        let file = File::create(path).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();
    }

    #[test]
    fn test_load_text_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.parquet");
        let df = df!(
            "id" => &[1i64, 2, 3],
            "doc" => &["The sky is blue.", "Cats are mammals.", "Water boils at 100C."]
        )
        .unwrap();
        write_parquet(&path, df);

        let corpus = Corpus::load(&path, DEFAULT_COLUMN).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.text_at(0).unwrap(), "The sky is blue.");
        assert_eq!(corpus.text_at(2).unwrap(), "Water boils at 100C.");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Corpus::load(&dir.path().join("nope.parquet"), "doc").unwrap_err();
        assert!(matches!(err, Error::CorpusNotFound(_)));
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.parquet");
        std::fs::write(&path, b"definitely not parquet").unwrap();
        assert!(matches!(Corpus::load(&path, "doc"), Err(Error::CorpusRead { .. })));
    }

    #[test]
    fn test_missing_column_lists_available() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.parquet");
        write_parquet(&path, df!("text" => &["a", "b"]).unwrap());

        match Corpus::load(&path, "doc") {
            Err(Error::MissingColumn { column, available }) => {
                assert_eq!(column, "doc");
                assert_eq!(available, vec!["text".to_string()]);
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_non_text_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.parquet");
        write_parquet(&path, df!("doc" => &[1i64, 2]).unwrap());
        assert!(matches!(Corpus::load(&path, "doc"), Err(Error::NotTextColumn { .. })));
    }

    #[test]
    fn test_null_passage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.parquet");
        write_parquet(&path, df!("doc" => &[Some("a"), None, Some("c")]).unwrap());
        assert!(matches!(
            Corpus::load(&path, "doc"),
            Err(Error::NullPassage { row: 1, .. })
        ));
    }

    #[test]
    fn test_list_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.parquet");
        write_parquet(&path, df!("doc" => &["a"], "source" => &["wiki"]).unwrap());
        assert_eq!(list_columns(&path).unwrap(), vec!["doc", "source"]);
    }

    #[test]
    fn test_text_at_out_of_range() {
        let corpus = Corpus::from_passages(vec!["only".to_string()]).unwrap();
        assert!(matches!(
            corpus.text_at(1),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_empty_corpus_rejected() {
        assert!(matches!(Corpus::from_passages(Vec::new()), Err(Error::EmptyCorpus)));
    }
}
