//! The [`IndexBuilder`] drives a full batch build.
//!
//! Enumerate -> block pass -> k-way merge -> compaction. The committed index
//! under `index_dir` is replaced as a whole; nothing is modified when the
//! corpus turns out to be empty.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    block::BlockBuilder,
    compact::compact_spill,
    config::Config,
    document::DocumentMap,
    error::{Error, Result},
    merge::merge_spills,
    normalizer::Normalize,
    store::{remove_store, StoreWriter},
};

/// Totals of one build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub documents: usize,
    pub blocks: usize,
    pub postings: u64,
    pub terms: usize,
}

#[derive(Debug)]
pub struct IndexBuilder<'a, N: Normalize + ?Sized> {
    config: &'a Config,
    normalizer: &'a N,
}

impl<'a, N: Normalize + ?Sized> IndexBuilder<'a, N> {
    pub fn new(config: &'a Config, normalizer: &'a N) -> Self {
        Self { config, normalizer }
    }

    pub fn build(&self) -> Result<BuildReport> {
        let config = self.config;
        config.validate()?;

        let documents = DocumentMap::enumerate(&config.corpus_dir)?;

        fs::create_dir_all(&config.index_dir).map_err(Error::io(&config.index_dir))?;
        clear_spills(&config.index_dir)?;

        if remove_store(&config.index_data_path(), &config.index_terms_path())? {
            info!(index_dir = ?config.index_dir, "invalidated previous index");
        }

        let doc_ids = config.doc_ids_path();
        documents.persist(&doc_ids)?;
        let documents = DocumentMap::load(&doc_ids)?;

        let blocks = BlockBuilder::new(config, self.normalizer).run(&documents)?;

        let merged = config.merged_spill_path();
        let merged_count = merge_spills(&blocks.blocks, &merged, config.block_size)?;
        debug_assert_eq!(merged_count, blocks.postings);

        let store = StoreWriter::create(config.index_data_path(), config.index_terms_path())?;
        let compacted = compact_spill(&merged, store)?;
        debug_assert_eq!(compacted.postings, blocks.postings as u64);

        // Only reached once the store is committed.
        remove_files(blocks.blocks.iter().chain(std::iter::once(&merged)))?;

        let report = BuildReport {
            documents: documents.len(),
            blocks: blocks.blocks.len(),
            postings: compacted.postings,
            terms: compacted.terms,
        };

        info!(
            documents = report.documents,
            blocks = report.blocks,
            postings = report.postings,
            terms = report.terms,
            "index built"
        );

        Ok(report)
    }
}

/// Removes spill files left behind by an interrupted build.
fn clear_spills(index_dir: &Path) -> Result<()> {
    let entries = fs::read_dir(index_dir).map_err(Error::io(index_dir))?;

    let stale = entries
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()
        .map_err(Error::io(index_dir))?
        .into_iter()
        .filter(|path| Config::is_spill_path(path))
        .collect::<Vec<_>>();

    if !stale.is_empty() {
        warn!(count = stale.len(), "removing stale spill files");
    }

    remove_files(stale.iter())
}

fn remove_files<'p, I: Iterator<Item = &'p PathBuf>>(paths: I) -> Result<()> {
    for path in paths {
        fs::remove_file(path).map_err(Error::io(path))?;
    }
    Ok(())
}
