//! Persistence Module
//!
//! On-disk formats for precomputed embedding artifacts.

pub mod npy;
