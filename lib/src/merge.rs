//! K-way merge of sorted spill files.
//!
//! One sequential cursor is held per spill file and the current head record
//! of every open cursor sits in a min-heap keyed by `(term, docId)`. Memory
//! use is bounded by the number of open files plus one output batch.

use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::Result,
    posting::Posting,
    spill::{SpillReader, SpillWriter},
};

/// Head record of one cursor. Equal postings from different files are both
/// kept, ordered by cursor index.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Head {
    posting: Posting,
    cursor: usize,
}

#[derive(Debug)]
pub struct KWayMerger {
    cursors: Vec<SpillReader>,
    heap: BinaryHeap<Reverse<Head>>,
}

impl KWayMerger {
    /// Opens every spill file and primes the working set with its first record.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let cursors = paths
            .iter()
            .map(|path| SpillReader::open(path.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Self::new(cursors)
    }

    pub fn new(mut cursors: Vec<SpillReader>) -> Result<Self> {
        let mut heap = BinaryHeap::with_capacity(cursors.len());

        for (cursor, reader) in cursors.iter_mut().enumerate() {
            if let Some(posting) = reader.next().transpose()? {
                heap.push(Reverse(Head { posting, cursor }));
            }
        }

        Ok(Self { cursors, heap })
    }

    /// Cursors that still have a head record.
    #[inline]
    pub fn open_cursors(&self) -> usize {
        self.heap.len()
    }

    fn pop(&mut self) -> Result<Option<Posting>> {
        let Some(Reverse(Head { posting, cursor })) = self.heap.pop() else {
            return Ok(None);
        };

        match self.cursors[cursor].next().transpose()? {
            Some(next) => self.heap.push(Reverse(Head {
                posting: next,
                cursor,
            })),
            None => debug!(path = ?self.cursors[cursor].path(), "spill exhausted"),
        }

        Ok(Some(posting))
    }

    /// Drains the merged stream into `output`, flushing every `batch_size`
    /// records. Returns the number of records written.
    pub fn spill_into(mut self, output: &Path, batch_size: usize) -> Result<usize> {
        let batch_size = batch_size.max(1);
        let mut writer = SpillWriter::create(output)?;
        let mut batch = Vec::with_capacity(batch_size);

        while let Some(posting) = self.pop()? {
            batch.push(posting);

            if batch.len() >= batch_size {
                writer.write_all(&batch)?;
                debug!(records = batch.len(), "flushed merge batch");
                batch.clear();
            }
        }

        writer.write_all(&batch)?;
        let written = writer.finish()?;

        info!(records = written, output = ?output, "merge complete");
        Ok(written)
    }
}

impl Iterator for KWayMerger {
    type Item = Result<Posting>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop().transpose()
    }
}

/// Merges `inputs` into the single sorted spill file `output`.
pub fn merge_spills(inputs: &[PathBuf], output: &Path, batch_size: usize) -> Result<usize> {
    info!(inputs = inputs.len(), "merging spill files");
    KWayMerger::open(inputs)?.spill_into(output, batch_size)
}
