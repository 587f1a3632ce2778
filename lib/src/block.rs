//! Block sort-based indexing, first pass.
//!
//! Documents are streamed in id order through the normalizer. Every term
//! occurrence becomes a `(term, docId)` pair in a bounded accumulator, which
//! is sorted and spilled to `block_<n>.spill` whenever it reaches the block
//! size. The remainder is spilled at end of input.

extern crate crossbeam_channel;

use std::{
    fs,
    path::{Path, PathBuf},
    thread,
};

use crossbeam_channel::bounded;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    document::{DocId, DocumentMap},
    error::{Error, Result},
    normalizer::Normalize,
    posting::Posting,
    spill::SpillWriter,
    token::Tokens,
};

/// Documents read ahead of the normalizer.
const READ_AHEAD: usize = 8;

/// Spill files produced by one block pass.
#[derive(Debug, Default, PartialEq)]
pub struct BlockReport {
    pub blocks: Vec<PathBuf>,

    /// Total pairs written across every block.
    pub postings: usize,
}

#[derive(Debug)]
pub struct BlockBuilder<'a, N: Normalize + ?Sized> {
    config: &'a Config,
    normalizer: &'a N,
    accumulator: Vec<Posting>,
    report: BlockReport,
}

impl<'a, N: Normalize + ?Sized> BlockBuilder<'a, N> {
    pub fn new(config: &'a Config, normalizer: &'a N) -> Self {
        Self {
            config,
            normalizer,
            accumulator: Vec::with_capacity(config.block_size),
            report: BlockReport::default(),
        }
    }

    /// Runs the whole corpus through the accumulator.
    ///
    /// A single reader thread feeds document contents in id order, so file
    /// I/O overlaps normalization without reordering documents.
    pub fn run(mut self, documents: &DocumentMap) -> Result<BlockReport> {
        let config = self.config;
        let corpus_dir = config.corpus_dir.as_path();
        let (tx, rx) = bounded::<(DocId, Result<String>)>(READ_AHEAD);

        thread::scope(|scope| {
            // Dropped before the scope joins, so a failed pass unblocks the reader.
            let rx = rx;

            scope.spawn(move || {
                for (doc_id, name) in documents.iter() {
                    let content = read_document(corpus_dir, name);
                    if tx.send((doc_id, content)).is_err() {
                        break;
                    }
                }
            });

            for (doc_id, content) in rx.iter() {
                let tokens = self.normalizer.normalize(&content?);
                self.add(doc_id, tokens)?;
            }

            Ok::<(), Error>(())
        })?;

        self.finish()
    }

    /// Appends every term of one document.
    pub fn add(&mut self, doc_id: DocId, tokens: Tokens) -> Result<()> {
        for token in tokens {
            self.accumulator.push(Posting::new(token.inner(), doc_id));

            if self.accumulator.len() >= self.config.block_size {
                self.flush()?;
            }
        }

        Ok(())
    }

    /// Spills the final, possibly short, block.
    pub fn finish(mut self) -> Result<BlockReport> {
        if !self.accumulator.is_empty() {
            self.flush()?;
        }

        info!(
            blocks = self.report.blocks.len(),
            postings = self.report.postings,
            "block pass complete"
        );

        Ok(self.report)
    }

    fn flush(&mut self) -> Result<()> {
        self.accumulator.sort_unstable();

        let number = self.report.blocks.len() + 1;
        let mut writer = SpillWriter::create(self.config.block_spill_path(number))?;
        writer.write_all(&self.accumulator)?;

        let path = writer.path().to_path_buf();
        let written = writer.finish()?;

        debug!(block = number, postings = written, path = ?path, "spilled block");

        self.report.postings += written;
        self.report.blocks.push(path);
        self.accumulator.clear();

        Ok(())
    }
}

fn read_document(corpus_dir: &Path, name: &str) -> Result<String> {
    let path = corpus_dir.join(name);
    let bytes = fs::read(&path).map_err(Error::io(&path))?;

    Ok(decode_document(name, bytes))
}

/// Invalid UTF-8 sequences become U+FFFD and are logged.
fn decode_document(name: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            warn!(
                document = name,
                valid_up_to = error.utf8_error().valid_up_to(),
                "document is not valid UTF-8, replacing invalid sequences"
            );
            String::from_utf8_lossy(error.as_bytes()).into_owned()
        }
    }
}
