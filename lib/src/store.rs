//! Durable term -> postings store.
//!
//! `index.dat` holds one record per term:
//! - u32 payload length (little endian)
//! - u32 crc32 of the payload
//! - payload, the JSON encoded [`Postings`]
//!
//! `terms.json` maps every term to the [`BlobPointer`] of its record. Both
//! files are written under a `.tmp` name and renamed into place by
//! [`StoreWriter::finish`], the dictionary last, so a reader only ever sees a
//! complete index.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crc32fast::Hasher;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result, StoreError},
    posting::Postings,
};

const HEADER_LEN: u64 = 8;

/// Location of one term's record inside the data file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobPointer {
    pub offset: u64,
    pub len: u32,
    pub crc32: u32,
}

impl BlobPointer {
    pub fn new(offset: u64, len: u32, crc32: u32) -> Self {
        Self { offset, len, crc32 }
    }
}

fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    hasher.finalize()
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// One-shot writer: insert every term once, then [`finish`](Self::finish).
#[derive(Debug)]
pub struct StoreWriter {
    data: BufWriter<File>,
    data_path: PathBuf,
    terms_path: PathBuf,
    terms: BTreeMap<String, BlobPointer>,
    offset: u64,
}

impl StoreWriter {
    pub fn create<P: Into<PathBuf>, Q: Into<PathBuf>>(data_path: P, terms_path: Q) -> Result<Self> {
        let data_path = data_path.into();
        let staged = staging_path(&data_path);
        let file = File::create(&staged).map_err(Error::io(&staged))?;

        Ok(Self {
            data: BufWriter::new(file),
            data_path,
            terms_path: terms_path.into(),
            terms: BTreeMap::new(),
            offset: 0,
        })
    }

    pub fn insert(&mut self, term: &str, postings: &Postings) -> Result<()> {
        debug_assert!(!self.terms.contains_key(term), "term {term:?} sealed twice");

        let payload = serde_json::to_vec(postings)?;
        let len = payload.len() as u32;
        let crc32 = checksum(&payload);
        let staged = staging_path(&self.data_path);

        self.data
            .write_all(&len.to_le_bytes())
            .and_then(|_| self.data.write_all(&crc32.to_le_bytes()))
            .and_then(|_| self.data.write_all(&payload))
            .map_err(Error::io(&staged))?;

        self.terms
            .insert(term.to_string(), BlobPointer::new(self.offset, len, crc32));
        self.offset += HEADER_LEN + u64::from(len);

        Ok(())
    }

    /// Flushes both files and commits them. Returns the number of terms.
    pub fn finish(mut self) -> Result<usize> {
        let staged_data = staging_path(&self.data_path);
        let staged_terms = staging_path(&self.terms_path);

        self.data.flush().map_err(Error::io(&staged_data))?;
        self.data
            .get_ref()
            .sync_all()
            .map_err(Error::io(&staged_data))?;

        let file = File::create(&staged_terms).map_err(Error::io(&staged_terms))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.terms)?;
        writer.flush().map_err(Error::io(&staged_terms))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(Error::io(&staged_terms))?;

        fs::rename(&staged_data, &self.data_path).map_err(Error::io(&self.data_path))?;
        fs::rename(&staged_terms, &self.terms_path).map_err(Error::io(&self.terms_path))?;

        Ok(self.terms.len())
    }
}

/// Removes a committed store, dictionary first.
pub fn remove_store(data_path: &Path, terms_path: &Path) -> Result<bool> {
    let mut removed = false;

    for path in [terms_path, data_path] {
        match fs::remove_file(path) {
            Ok(()) => removed = true,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => return Err(Error::io(path)(error)),
        }
    }

    Ok(removed)
}

/// Read-only point lookups against a committed store.
///
/// Records are read with positional reads, so concurrent lookups share the
/// handle without a cursor or a lock.
#[derive(Debug)]
pub struct StoreReader {
    terms: HashMap<String, BlobPointer>,
    data: File,
    data_path: PathBuf,
}

impl StoreReader {
    pub fn open<P: Into<PathBuf>>(data_path: P, terms_path: &Path) -> Result<Self> {
        let data_path = data_path.into();

        if !terms_path.exists() {
            let dir = terms_path.parent().unwrap_or(terms_path).to_path_buf();
            return Err(StoreError::MissingIndex(dir).into());
        }

        let file = File::open(terms_path).map_err(Error::io(terms_path))?;
        let terms: HashMap<String, BlobPointer> = serde_json::from_reader(BufReader::new(file))?;
        let data = File::open(&data_path).map_err(Error::io(&data_path))?;

        Ok(Self {
            terms,
            data,
            data_path,
        })
    }

    /// Number of distinct terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Postings of `term`, empty when the term never occurs in the corpus.
    pub fn get(&self, term: &str) -> Result<Postings> {
        match self.terms.get(term) {
            Some(pointer) => self.read(term, *pointer),
            None => Ok(Postings::new()),
        }
    }

    fn read(&self, term: &str, pointer: BlobPointer) -> Result<Postings> {
        let mut record = vec![0u8; HEADER_LEN as usize + pointer.len as usize];
        read_exact_at(&self.data, &mut record, pointer.offset)
            .map_err(Error::io(&self.data_path))?;

        let (header, payload) = record.split_at(HEADER_LEN as usize);
        let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let stored_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if len != pointer.len {
            return Err(StoreError::LengthMismatch {
                term: term.to_string(),
                expected: pointer.len,
                found: len,
            }
            .into());
        }

        let crc = checksum(payload);
        if crc != stored_crc || crc != pointer.crc32 {
            return Err(StoreError::ChecksumMismatch(term.to_string()).into());
        }

        Ok(serde_json::from_slice(payload)?)
    }
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    std::os::unix::fs::FileExt::read_exact_at(file, buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;

    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
