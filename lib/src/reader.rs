use std::path::Path;

use crate::{
    config::Config,
    document::{DocId, DocumentInfo, DocumentMap},
    error::{BuildError, Result},
    posting::Postings,
    store::StoreReader,
};

/// Read access to a committed index.
///
/// Holds no mutable state apart from the store's file cursor, so one reader
/// can be shared by every query path.
#[derive(Debug)]
pub struct IndexReader {
    store: StoreReader,
    documents: DocumentMap,
}

impl IndexReader {
    pub fn new(store: StoreReader, documents: DocumentMap) -> Self {
        Self { store, documents }
    }

    /// Opens the index committed under `config.index_dir`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = StoreReader::open(config.index_data_path(), &config.index_terms_path())?;
        let documents = DocumentMap::load(config.doc_ids_path())?;

        Ok(Self::new(store, documents))
    }

    /// Number of indexed documents
    #[inline]
    pub fn total_documents(&self) -> usize {
        self.documents.len()
    }

    /// Every indexed term, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.store.terms()
    }

    /// Postings of one term. An absent term yields an empty list.
    #[inline]
    pub fn postings(&self, term: &str) -> Result<Postings> {
        self.store.get(term)
    }

    pub fn describe(&self, corpus_dir: &Path, doc_id: DocId) -> Result<DocumentInfo> {
        let name = self
            .documents
            .get(doc_id)
            .ok_or(BuildError::UnknownDocument(doc_id))?;

        DocumentInfo::resolve(corpus_dir, doc_id, name)
    }
}
