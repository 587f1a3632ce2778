use crate::{
    aggregate::{Aggregator, HashAggregator},
    document::DocId,
    error::Result,
    reader::IndexReader,
    token::Token,
};

/// Per-term weighting strategy.
pub trait Score {
    /// Weighted `(docId, score)` pairs of one term, in ascending docId order.
    fn score(&self, term: &str) -> Result<Vec<(DocId, f64)>>;
}

#[derive(Debug)]
pub struct Scorer<S: Score> {
    inner: S,
}

impl<S: Score> Scorer<S> {
    pub fn new(strategy: S) -> Self {
        Self { inner: strategy }
    }

    #[inline]
    pub fn score(&self, term: &str) -> Result<Vec<(DocId, f64)>> {
        self.inner.score(term)
    }

    /// Sums the weights of every term per document. Terms without postings
    /// contribute nothing. The output is unordered.
    pub fn score_terms<'t, I>(&self, tokens: I) -> Result<Vec<(DocId, f64)>>
    where
        I: IntoIterator<Item = &'t Token>,
    {
        let mut aggregator = Aggregator::new(HashAggregator::<DocId, f64>::new());

        for token in tokens {
            aggregator.extend(self.inner.score(token)?);
        }

        Ok(aggregator
            .iter()
            .map(|(doc_id, score)| (*doc_id, *score))
            .collect())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TfIdfScorer<'a> {
    reader: &'a IndexReader,
}

impl<'a> TfIdfScorer<'a> {
    pub fn new(reader: &'a IndexReader) -> Self {
        Self { reader }
    }
}

/// `log10(N + 1 / (1 + df))`.
///
/// NOTE: the division binds before the addition, so this is not the smoothed
/// `log10((N + 1) / (1 + df))`. Scores of existing indexes depend on this
/// exact form; keep it.
#[inline]
pub fn idf(total_documents: usize, document_frequency: usize) -> f64 {
    (total_documents as f64 + 1.0 / (1.0 + document_frequency as f64)).log10()
}

/// Sublinear term frequency scaled by `idf`.
#[inline]
pub fn weight(frequency: u32, idf: f64) -> f64 {
    (1.0 + f64::from(frequency).log10()) * idf
}

impl Score for TfIdfScorer<'_> {
    fn score(&self, term: &str) -> Result<Vec<(DocId, f64)>> {
        let postings = self.reader.postings(term)?;
        if postings.is_empty() {
            return Ok(Vec::new());
        }

        let idf = idf(self.reader.total_documents(), postings.len());

        Ok(postings
            .into_iter()
            .map(|(doc_id, frequency)| (doc_id, weight(frequency, idf)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::score::{idf, weight};

    #[test]
    fn test_idf_literal_form() {
        let expected = (3.0f64 + 1.0 / 4.0).log10();
        assert!((idf(3, 3) - expected).abs() < 1e-12);

        // Rarer terms weigh more.
        assert!(idf(3, 1) > idf(3, 3));
    }

    #[test]
    fn test_weight_is_sublinear() {
        let idf = idf(10, 2);

        assert!((weight(1, idf) - idf).abs() < 1e-12);
        assert!((weight(10, idf) - 2.0 * idf).abs() < 1e-12);
        assert!(weight(100, idf) < 100.0 * weight(1, idf));
    }
}
