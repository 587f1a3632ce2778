use std::{fs, path::PathBuf, sync::Arc};

use meklet::{config::AnalyzerConfig, Analyzer, Config};
use tempfile::TempDir;

pub(crate) fn get_test_corpus() -> Vec<String> {
    vec![
        "The quick brown fox jumps over the lazy dog.",
        "The quick brown fox.",
        "The quick brown fox jumps.",
        "The quick brown fox jumps over.",
        "The quick brown fox jumps over the lazy dog again.",
        "The lazy dog lies in the sun.",
        "The dog is lazy.",
        "Foxes are quick and brown.",
        "Foxes jump over lazy dogs.",
        "A fast brown fox leaps over lazy hounds.",
        "Speedy brown foxes jump over sluggish dogs.",
        "Foxes are cunning and quick.",
        "Dogs are loyal and lazy.",
        "A fox is quicker than a dog.",
        "Jumping foxes and sleeping dogs.",
        "The sun shines on the lazy dog.",
        "Quick thinking foxes outsmart lazy dogs.",
        "The fox and the hound.",
        "A quick brown fox outpaces a lazy brown dog.",
        "Clever foxes evade the lazy dogs.",
    ]
    .iter()
    .map(|document| document.to_string())
    .collect::<Vec<_>>()
}

/// Temporary corpus and index directories.
pub(crate) struct Fixture {
    _root: TempDir,
    pub corpus: PathBuf,
    pub index: PathBuf,
}

impl Fixture {
    /// Writes `documents` as `doc_NN.txt`, so ids follow slice order.
    pub fn new<S: AsRef<str>>(documents: &[S]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let corpus = root.path().join("corpus");
        let index = root.path().join("index_files");
        fs::create_dir(&corpus).unwrap();

        for (n, document) in documents.iter().enumerate() {
            fs::write(corpus.join(format!("doc_{:02}.txt", n + 1)), document.as_ref()).unwrap();
        }

        Self {
            _root: root,
            corpus,
            index,
        }
    }

    pub fn config(&self, block_size: usize) -> Config {
        Config::new(&self.corpus, &self.index).with_block_size(block_size)
    }

    /// Config with lowercase and punctuation stripping only.
    pub fn plain_config(&self, block_size: usize) -> Config {
        self.config(block_size).with_analyzer(AnalyzerConfig::plain())
    }
}

pub(crate) fn analyzer(config: &Config) -> Arc<Analyzer> {
    Arc::new(Analyzer::from_config(&config.analyzer))
}
