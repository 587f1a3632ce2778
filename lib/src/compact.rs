//! Run-length compaction of the merged stream into the durable store.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    document::DocId,
    error::Result,
    posting::{Posting, Postings},
    spill::SpillReader,
    store::StoreWriter,
    util::Counter,
};

/// Totals of one compaction pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompactReport {
    /// Distinct terms sealed into the store.
    pub terms: usize,

    /// Records consumed from the merged stream.
    pub postings: u64,
}

/// Collapses a `(term, docId)` stream, sorted ascending, into one postings
/// list per term.
///
/// The compactor only ever holds the postings of the term in progress.
#[derive(Debug)]
pub struct PostingsCompactor {
    store: StoreWriter,
    current: Option<(String, DocId)>,
    frequency: Counter<u32>,
    postings: Postings,
    report: CompactReport,
}

impl PostingsCompactor {
    pub fn new(store: StoreWriter) -> Self {
        Self {
            store,
            current: None,
            frequency: Counter::one(),
            postings: Postings::new(),
            report: CompactReport::default(),
        }
    }

    pub fn push(&mut self, posting: Posting) -> Result<()> {
        self.report.postings += 1;

        let Some((term, doc_id)) = self.current.as_mut() else {
            self.current = Some((posting.term, posting.doc_id));
            return Ok(());
        };

        if *term != posting.term {
            let previous = std::mem::replace(term, posting.term);
            self.postings.insert(*doc_id, self.frequency.restart());
            *doc_id = posting.doc_id;
            return self.seal(&previous);
        }

        if *doc_id == posting.doc_id {
            self.frequency.increment();
        } else {
            self.postings.insert(*doc_id, self.frequency.restart());
            *doc_id = posting.doc_id;
        }

        Ok(())
    }

    fn seal(&mut self, term: &str) -> Result<()> {
        let postings = std::mem::take(&mut self.postings);
        debug!(term, documents = postings.len(), "sealed term");

        self.store.insert(term, &postings)?;
        self.report.terms += 1;
        Ok(())
    }

    /// Seals the final term and commits the store.
    pub fn finish(mut self) -> Result<CompactReport> {
        if let Some((term, doc_id)) = self.current.take() {
            self.postings.insert(doc_id, self.frequency.get());
            self.seal(&term)?;
        }

        let terms = self.store.finish()?;
        debug_assert_eq!(terms, self.report.terms);

        info!(
            terms = self.report.terms,
            postings = self.report.postings,
            "compaction complete"
        );
        Ok(self.report)
    }
}

/// Compacts the merged spill at `merged` into `store`.
pub fn compact_spill(merged: &Path, store: StoreWriter) -> Result<CompactReport> {
    let mut compactor = PostingsCompactor::new(store);

    for posting in SpillReader::open(merged)? {
        compactor.push(posting?)?;
    }

    compactor.finish()
}

#[cfg(test)]
mod tests {
    use crate::{
        compact::{compact_spill, PostingsCompactor},
        posting::Posting,
        spill::SpillWriter,
        store::{StoreReader, StoreWriter},
    };

    #[test]
    fn test_compactor_run_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("index.dat");
        let terms = dir.path().join("terms.json");

        let stream = [
            ("bird", 2),
            ("bird", 3),
            ("cat", 1),
            ("cat", 1),
            ("cat", 1),
            ("cat", 3),
            ("dog", 1),
            ("dog", 2),
            ("dog", 2),
        ];

        let mut compactor = PostingsCompactor::new(StoreWriter::create(&data, &terms).unwrap());
        for (term, doc_id) in stream {
            compactor.push(Posting::new(term, doc_id)).unwrap();
        }
        let report = compactor.finish().unwrap();

        assert_eq!(report.terms, 3);
        assert_eq!(report.postings, 9);

        let reader = StoreReader::open(&data, &terms).unwrap();
        let cat = reader.get("cat").unwrap();
        assert_eq!(cat.iter().collect::<Vec<_>>(), vec![(1, 3), (3, 1)]);

        let dog = reader.get("dog").unwrap();
        assert_eq!(dog.iter().collect::<Vec<_>>(), vec![(1, 1), (2, 2)]);

        let total = ["bird", "cat", "dog"]
            .iter()
            .map(|term| reader.get(term).unwrap().occurrences())
            .sum::<u64>();
        assert_eq!(total, report.postings);
    }

    #[test]
    fn test_compactor_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("index.dat");
        let terms = dir.path().join("terms.json");

        let mut compactor = PostingsCompactor::new(StoreWriter::create(&data, &terms).unwrap());
        compactor.push(Posting::new("cat", 7)).unwrap();
        compactor.finish().unwrap();

        let reader = StoreReader::open(&data, &terms).unwrap();
        assert_eq!(reader.get("cat").unwrap().get(7), Some(1));
    }

    #[test]
    fn test_compact_spill_empty_stream() {
        let dir = tempfile::tempdir().unwrap();
        let merged = dir.path().join("merged.spill");
        SpillWriter::create(&merged).unwrap().finish().unwrap();

        let data = dir.path().join("index.dat");
        let terms = dir.path().join("terms.json");
        let report = compact_spill(&merged, StoreWriter::create(&data, &terms).unwrap()).unwrap();

        assert_eq!(report.terms, 0);
        assert!(StoreReader::open(&data, &terms).unwrap().is_empty());
    }
}
