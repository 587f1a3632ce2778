use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::document::DocId;

/// One result entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f64,
}

impl Hit {
    #[inline]
    pub fn new(doc_id: DocId, score: f64) -> Self {
        Self { doc_id, score }
    }
}

impl From<(DocId, f64)> for Hit {
    fn from((doc_id, score): (DocId, f64)) -> Self {
        Self::new(doc_id, score)
    }
}

/// Score descending, equal scores by ascending docId.
#[inline]
pub fn by_relevance(a: &Hit, b: &Hit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Orders `hits` by relevance and keeps the best `top_k`.
pub fn rank<I>(hits: I, top_k: usize) -> Vec<Hit>
where
    I: IntoIterator,
    I::Item: Into<Hit>,
{
    let mut hits = hits.into_iter().map(Into::into).collect::<Vec<Hit>>();
    hits.sort_unstable_by(by_relevance);
    hits.truncate(top_k);
    hits
}
