//! Private spill file format.
//!
//! A spill file is a sequence of whitespace separated JSON records
//! `["term", docId]`, sorted by `(term, docId)`. Files are written once,
//! read once sequentially and removed when the build completes.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde_json::{de::IoRead, StreamDeserializer};

use crate::{
    document::DocId,
    error::{BuildError, Error, Result},
    posting::Posting,
};

type Record = (String, DocId);

#[derive(Debug)]
pub struct SpillWriter {
    inner: BufWriter<File>,
    path: PathBuf,
    written: usize,
}

impl SpillWriter {
    pub fn create<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(Error::io(&path))?;

        Ok(Self {
            inner: BufWriter::new(file),
            path,
            written: 0,
        })
    }

    pub fn write(&mut self, posting: &Posting) -> Result<()> {
        serde_json::to_writer(&mut self.inner, &(&posting.term, posting.doc_id))?;
        self.inner.write_all(b"\n").map_err(Error::io(&self.path))?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, postings: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Posting>,
    {
        postings
            .into_iter()
            .try_for_each(|posting| self.write(posting))
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffered records and returns how many were written.
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush().map_err(Error::io(&self.path))?;
        self.inner
            .get_ref()
            .sync_data()
            .map_err(Error::io(&self.path))?;
        Ok(self.written)
    }
}

/// Sequential read cursor over a spill file.
///
/// Yields records in file order and fails with [`BuildError::UnsortedSpill`]
/// on the first record that is smaller than its predecessor.
pub struct SpillReader {
    stream: StreamDeserializer<'static, IoRead<BufReader<File>>, Record>,
    path: PathBuf,
    previous: Option<Posting>,
    read: usize,
    failed: bool,
}

impl SpillReader {
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(Error::io(&path))?;
        let stream = serde_json::Deserializer::from_reader(BufReader::new(file)).into_iter();

        Ok(Self {
            stream,
            path,
            previous: None,
            read: 0,
            failed: false,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn advance(&mut self) -> Option<Result<Posting>> {
        if self.failed {
            return None;
        }

        let (term, doc_id) = match self.stream.next()? {
            Ok(record) => record,
            Err(error) => {
                self.failed = true;
                return Some(Err(error.into()));
            }
        };

        let posting = Posting { term, doc_id };

        if self.previous.as_ref().is_some_and(|previous| *previous > posting) {
            self.failed = true;
            return Some(Err(BuildError::UnsortedSpill {
                path: self.path.clone(),
                record: self.read,
            }
            .into()));
        }

        self.read += 1;
        self.previous = Some(posting.clone());
        Some(Ok(posting))
    }
}

impl Iterator for SpillReader {
    type Item = Result<Posting>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl std::fmt::Debug for SpillReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpillReader")
            .field("path", &self.path)
            .field("read", &self.read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{
        error::{BuildError, Error},
        posting::Posting,
        spill::{SpillReader, SpillWriter},
    };

    #[test]
    fn test_spill_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_1.spill");

        let postings = vec![
            Posting::new("bird", 2),
            Posting::new("cat", 1),
            Posting::new("cat", 1),
            Posting::new("naïve \"quoted\"", 3),
        ];

        let mut writer = SpillWriter::create(&path).unwrap();
        writer.write_all(&postings).unwrap();
        assert_eq!(writer.finish().unwrap(), 4);

        let read = SpillReader::open(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(read, postings);
    }

    #[test]
    fn test_spill_rejects_unsorted_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_1.spill");
        fs::write(&path, "[\"dog\",1]\n[\"cat\",2]\n").unwrap();

        let mut reader = SpillReader::open(&path).unwrap();
        assert!(reader.next().unwrap().is_ok());

        match reader.next() {
            Some(Err(Error::Build(BuildError::UnsortedSpill { record, .. }))) => {
                assert_eq!(record, 1)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_spill_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_1.spill");
        fs::write(&path, "[\"cat\",1]\n[\"dog\",").unwrap();

        let results = SpillReader::open(&path).unwrap().collect::<Vec<_>>();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Serialization(_))));
    }
}
