//! Document enumeration.
//!
//! Every file of the corpus directory receives a stable integer id, assigned
//! in file-name order starting at 1. The `docId -> file name` mapping is
//! persisted next to the index and is the join key for result metadata.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BuildError, Error, Result};

pub type DocId = u32;

const WIKI_BASE: &str = "https://en.wikipedia.org/wiki/";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMap {
    inner: BTreeMap<DocId, String>,
}

impl DocumentMap {
    /// Assigns ids to the regular files of `corpus_dir`.
    ///
    /// Fails with [`BuildError::EmptyCorpus`] when there is nothing to index.
    pub fn enumerate<P: AsRef<Path>>(corpus_dir: P) -> Result<Self> {
        let corpus_dir = corpus_dir.as_ref();

        if !corpus_dir.is_dir() {
            return Err(BuildError::MissingCorpus(corpus_dir.to_path_buf()).into());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(corpus_dir).map_err(Error::io(corpus_dir))? {
            let entry = entry.map_err(Error::io(corpus_dir))?;
            let file_type = entry.file_type().map_err(Error::io(entry.path()))?;

            if !file_type.is_file() {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => warn!(?name, "skipping document with a non UTF-8 file name"),
            }
        }

        if names.is_empty() {
            return Err(BuildError::EmptyCorpus(corpus_dir.to_path_buf()).into());
        }

        names.sort_unstable();

        let inner = (1..).zip(names).collect::<BTreeMap<DocId, String>>();
        info!(documents = inner.len(), corpus = ?corpus_dir, "enumerated corpus");

        Ok(Self { inner })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io(path))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(Error::io(path))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, self)?;
        writer.flush().map_err(Error::io(path))?;

        Ok(())
    }

    #[inline]
    pub fn get(&self, id: DocId) -> Option<&str> {
        self.inner.get(&id).map(String::as_str)
    }

    /// Total corpus size.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Documents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &str)> {
        self.inner.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// Display metadata resolved for a result entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub id: DocId,
    pub name: String,
    pub title: String,
    pub link: String,
}

impl DocumentInfo {
    /// The title is the third line of the document; the link is derived from
    /// the file stem.
    pub fn resolve(corpus_dir: &Path, id: DocId, name: &str) -> Result<Self> {
        let path: PathBuf = corpus_dir.join(name);
        let file = File::open(&path).map_err(Error::io(&path))?;

        let title = match BufReader::new(file).lines().nth(2) {
            Some(line) => line.map_err(Error::io(&path))?.trim().to_string(),
            None => String::new(),
        };

        let stem = Path::new(name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            id,
            name: name.to_string(),
            title,
            link: format!("{WIKI_BASE}{stem}"),
        })
    }
}
