//! Corpus Module
//!
//! The fixed collection of candidate passages.

mod store;

pub use store::{list_columns, Corpus, DEFAULT_COLUMN};
