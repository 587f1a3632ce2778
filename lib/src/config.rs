use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

pub const DOC_IDS_FILE: &str = "docids.json";
pub const INDEX_DATA_FILE: &str = "index.dat";
pub const INDEX_TERMS_FILE: &str = "terms.json";
pub const MERGED_SPILL_FILE: &str = "merged.spill";
pub const LOCK_FILE: &str = "build.lock";

const BLOCK_SPILL_PREFIX: &str = "block_";
const SPILL_EXTENSION: &str = "spill";

/// Build and serving configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// One plain-text file per document.
    pub corpus_dir: PathBuf,

    /// Document map, spill files and the durable index.
    pub index_dir: PathBuf,

    /// Maximum number of postings held in memory per block (and per merge batch).
    pub block_size: usize,

    /// Capacity of each result cache instance.
    pub cache_capacity: usize,

    pub top_k: usize,

    pub analyzer: AnalyzerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("./corpus"),
            index_dir: PathBuf::from("./index_files"),
            block_size: 10_000,
            cache_capacity: 100,
            top_k: 10,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Config {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(corpus_dir: P, index_dir: Q) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            index_dir: index_dir.into(),
            ..Default::default()
        }
    }

    /// Reads a JSON configuration file, missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = fs::read_to_string(path).map_err(Error::io(path))?;
        let config: Config = serde_json::from_str(&buffer)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("block_size", self.block_size),
            ("cache_capacity", self.cache_capacity),
            ("top_k", self.top_k),
        ];

        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".into(),
                }
                .into());
            }
        }

        Ok(())
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    #[inline]
    pub fn doc_ids_path(&self) -> PathBuf {
        self.index_dir.join(DOC_IDS_FILE)
    }

    #[inline]
    pub fn index_data_path(&self) -> PathBuf {
        self.index_dir.join(INDEX_DATA_FILE)
    }

    #[inline]
    pub fn index_terms_path(&self) -> PathBuf {
        self.index_dir.join(INDEX_TERMS_FILE)
    }

    #[inline]
    pub fn merged_spill_path(&self) -> PathBuf {
        self.index_dir.join(MERGED_SPILL_FILE)
    }

    #[inline]
    pub fn lock_path(&self) -> PathBuf {
        self.index_dir.join(LOCK_FILE)
    }

    /// Whether a committed index exists under `index_dir`.
    pub fn has_index(&self) -> bool {
        self.index_terms_path().is_file()
    }

    /// Spill file for the `number`-th block, counting from one.
    #[inline]
    pub fn block_spill_path(&self, number: usize) -> PathBuf {
        self.index_dir
            .join(format!("{BLOCK_SPILL_PREFIX}{number}.{SPILL_EXTENSION}"))
    }

    /// Whether `path` names a spill file of any kind.
    pub fn is_spill_path(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == SPILL_EXTENSION)
    }
}

/// Stages of the default [`Analyzer`](crate::normalizer::Analyzer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub lowercase: bool,
    pub strip_punctuation: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            remove_stopwords: true,
            stem: true,
            min_token_length: 2,
        }
    }
}

impl AnalyzerConfig {
    /// Case folding and punctuation stripping only.
    pub fn plain() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            remove_stopwords: false,
            stem: false,
            min_token_length: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::Path};

    use crate::{
        config::{AnalyzerConfig, Config},
        error::{ConfigError, Error},
    };

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.block_size, 10_000);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.top_k, 10);
        assert!(config.analyzer.stem);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_block_size() {
        let config = Config::default().with_block_size(0);

        match config.validate() {
            Err(Error::Config(ConfigError::Invalid { field, .. })) => {
                assert_eq!(field, "block_size")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_config_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"block_size": 64, "analyzer": {{"stem": false}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.block_size, 64);
        assert_eq!(config.top_k, 10);
        assert!(!config.analyzer.stem);
        assert!(config.analyzer.lowercase);
        assert_ne!(config.analyzer, AnalyzerConfig::plain());
    }

    #[test]
    fn test_config_paths() {
        let config = Config::new("corpus", "index");
        assert_eq!(config.block_spill_path(3), Path::new("index/block_3.spill"));
        assert!(Config::is_spill_path(&config.block_spill_path(1)));
        assert!(Config::is_spill_path(&config.merged_spill_path()));
        assert!(!Config::is_spill_path(&config.index_terms_path()));
    }
}
