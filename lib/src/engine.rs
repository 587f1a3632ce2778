use std::{num::NonZeroUsize, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    boolean::BooleanQuery,
    cache::ResultCache,
    config::Config,
    document::{DocId, DocumentInfo},
    error::{ConfigError, Result},
    normalizer::Normalize,
    rank::{rank, Hit},
    reader::IndexReader,
    score::{Scorer, TfIdfScorer},
    token::Tokens,
};

/// Read-only query facade over a committed index.
///
/// Safe to share between threads; the only mutable state is the two result
/// caches, each behind its own lock.
#[derive(Debug)]
pub struct SearchEngine<N: Normalize + ?Sized> {
    config: Config,
    normalizer: Arc<N>,
    reader: IndexReader,
    simple_cache: ResultCache,
    boolean_cache: ResultCache,
}

impl<N: Normalize + ?Sized> SearchEngine<N> {
    /// Opens the index under `config.index_dir`.
    pub fn open(config: Config, normalizer: Arc<N>) -> Result<Self> {
        config.validate()?;
        let reader = IndexReader::open(&config)?;
        Self::with_reader(config, normalizer, reader)
    }

    pub fn with_reader(config: Config, normalizer: Arc<N>, reader: IndexReader) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.cache_capacity).ok_or(ConfigError::Invalid {
            field: "cache_capacity",
            reason: "must be greater than zero".into(),
        })?;

        Ok(Self {
            config,
            normalizer,
            reader,
            simple_cache: ResultCache::new(capacity),
            boolean_cache: ResultCache::new(capacity),
        })
    }

    /// Free-text query: summed TF-IDF over the normalized terms, best
    /// `top_k` first.
    #[instrument(level = "debug", skip(self))]
    pub fn simple_search(&self, query: &str) -> Result<Vec<Hit>> {
        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let key = terms.join();
        if let Some(hits) = self.simple_cache.get(&key) {
            debug!(key = %key, "simple cache hit");
            return Ok(hits);
        }

        let hits = rank(self.score(&terms)?, self.config.top_k);
        self.simple_cache.put(key, hits.clone());

        Ok(hits)
    }

    /// Quoted sub-queries joined by `and` / `or`.
    #[instrument(level = "debug", skip(self))]
    pub fn boolean_search(&self, query: &str) -> Result<Vec<Hit>> {
        let query = BooleanQuery::parse(query, &*self.normalizer)?;

        let key = query.reconstruct();
        if let Some(hits) = self.boolean_cache.get(&key) {
            debug!(key = %key, "boolean cache hit");
            return Ok(hits);
        }

        let combined = query.evaluate(|terms| self.score(terms))?;
        let hits = rank(combined, self.config.top_k);
        self.boolean_cache.put(key, hits.clone());

        Ok(hits)
    }

    fn score(&self, terms: &Tokens) -> Result<Vec<Hit>> {
        let scorer = Scorer::new(TfIdfScorer::new(&self.reader));

        Ok(scorer
            .score_terms(terms)?
            .into_iter()
            .map(Hit::from)
            .collect())
    }

    /// Display metadata of one result.
    pub fn describe(&self, doc_id: DocId) -> Result<DocumentInfo> {
        self.reader.describe(&self.config.corpus_dir, doc_id)
    }
}
