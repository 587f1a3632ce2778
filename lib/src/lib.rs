//! Disk-resident inverted index built by block sort-based indexing, with
//! TF-IDF ranked free-text and boolean queries.
//!
//! Build: [`index::IndexBuilder`]. Serve: [`engine::SearchEngine`].

pub mod aggregate;
pub mod block;
pub mod boolean;
pub mod cache;
pub mod compact;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod merge;
pub mod normalizer;
pub mod posting;
pub mod rank;
pub mod reader;
pub mod score;
pub mod spill;
pub mod store;
pub mod token;
pub mod tokenizer;
pub mod util;

pub use crate::{
    config::Config,
    engine::SearchEngine,
    error::{Error, Result},
    index::{BuildReport, IndexBuilder},
    normalizer::{Analyzer, Normalize},
    rank::Hit,
};
