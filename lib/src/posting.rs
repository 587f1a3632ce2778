use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::document::DocId;

/// One term occurrence in one document.
///
/// Ordered by term (lexicographic) and then by document id, the sort key of
/// every spill file and of the merged stream.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Posting {
    pub term: String,
    pub doc_id: DocId,
}

impl Posting {
    #[inline]
    pub fn new<S: Into<String>>(term: S, doc_id: DocId) -> Self {
        Self {
            term: term.into(),
            doc_id,
        }
    }
}

/// Postings list of a single term: `docId -> term frequency`.
///
/// Keys are unique and iterate in ascending document order; every stored
/// frequency is at least one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Postings {
    inner: BTreeMap<DocId, u32>,
}

impl Postings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seals the frequency of `doc_id`; zero frequencies are ignored.
    #[inline]
    pub fn insert(&mut self, doc_id: DocId, frequency: u32) {
        if frequency > 0 {
            self.inner.insert(doc_id, frequency);
        }
    }

    #[inline]
    pub fn get(&self, doc_id: DocId) -> Option<u32> {
        self.inner.get(&doc_id).copied()
    }

    /// Document frequency of the term.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sum of the frequencies, the term's corpus occurrence count.
    pub fn occurrences(&self) -> u64 {
        self.inner.values().map(|&frequency| u64::from(frequency)).sum()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (DocId, u32)> + '_ {
        self.inner.iter().map(|(doc_id, frequency)| (*doc_id, *frequency))
    }
}

impl FromIterator<(DocId, u32)> for Postings {
    fn from_iter<I: IntoIterator<Item = (DocId, u32)>>(iter: I) -> Self {
        let mut postings = Postings::new();
        iter.into_iter()
            .for_each(|(doc_id, frequency)| postings.insert(doc_id, frequency));
        postings
    }
}

impl IntoIterator for Postings {
    type Item = (DocId, u32);
    type IntoIter = btree_map::IntoIter<DocId, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::posting::{Posting, Postings};

    #[test]
    fn test_posting_order() {
        let mut pairs = vec![
            Posting::new("dog", 2),
            Posting::new("cat", 3),
            Posting::new("dog", 1),
            Posting::new("cat", 1),
            Posting::new("bird", 9),
        ];
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                Posting::new("bird", 9),
                Posting::new("cat", 1),
                Posting::new("cat", 3),
                Posting::new("dog", 1),
                Posting::new("dog", 2),
            ]
        );
    }

    #[test]
    fn test_postings_occurrences() {
        let postings = [(3, 2), (1, 4), (7, 0)].into_iter().collect::<Postings>();

        assert_eq!(postings.len(), 2);
        assert_eq!(postings.occurrences(), 6);
        assert_eq!(postings.get(7), None);
        assert_eq!(postings.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_postings_json_shape() {
        let postings = [(1, 2), (10, 1)].into_iter().collect::<Postings>();
        let encoded = serde_json::to_string(&postings).unwrap();

        assert_eq!(encoded, r#"{"1":2,"10":1}"#);
        assert_eq!(serde_json::from_str::<Postings>(&encoded).unwrap(), postings);
    }
}
