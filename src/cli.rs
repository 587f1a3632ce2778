extern crate clap;

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use meklet::Config;

use crate::error::Error;

#[derive(Debug, Parser)]
#[command(name = "meklet", version, about = "Disk-based inverted index and search")]
pub struct Cli {
    /// JSON configuration file; flags override its values.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    #[arg(long, global = true)]
    pub index_dir: Option<PathBuf>,

    /// Postings held in memory per block.
    #[arg(long, global = true)]
    pub block_size: Option<NonZeroUsize>,

    /// Results returned per query.
    #[arg(long, global = true)]
    pub top_k: Option<NonZeroUsize>,

    /// Entries kept by each result cache.
    #[arg(long, global = true)]
    pub cache_capacity: Option<NonZeroUsize>,

    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the index from the corpus directory.
    Build(Build),

    /// Free-text search.
    Search(Queries),

    /// Boolean search, e.g. '"harry potter" and "movies" or "books"'.
    Boolean(Queries),
}

#[derive(Debug, Args)]
pub struct Build {
    /// Replace an existing index.
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct Queries {
    #[arg(required = true)]
    pub queries: Vec<String>,
}

impl Cli {
    /// Defaults, then the configuration file, then flags.
    pub fn resolve_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(corpus) = &self.corpus {
            config.corpus_dir = corpus.clone();
        }
        if let Some(index_dir) = &self.index_dir {
            config.index_dir = index_dir.clone();
        }
        if let Some(block_size) = self.block_size {
            config = config.with_block_size(block_size.get());
        }
        if let Some(top_k) = self.top_k {
            config = config.with_top_k(top_k.get());
        }
        if let Some(capacity) = self.cache_capacity {
            config = config.with_cache_capacity(capacity.get());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Command};

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "meklet",
            "--corpus",
            "docs",
            "build",
            "--force",
            "--block-size",
            "64",
        ]);

        assert!(matches!(cli.command, Command::Build(ref build) if build.force));

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.corpus_dir.to_str(), Some("docs"));
        assert_eq!(config.block_size, 64);
        assert_eq!(config.top_k, 10);
    }

    #[test]
    fn test_queries_are_required() {
        assert!(Cli::try_parse_from(["meklet", "search"]).is_err());

        let cli = Cli::try_parse_from(["meklet", "boolean", "\"cat\" and \"dog\""]).unwrap();
        match cli.command {
            Command::Boolean(queries) => assert_eq!(queries.queries, vec!["\"cat\" and \"dog\""]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_query_limits_from_flags() {
        let cli = Cli::parse_from([
            "meklet",
            "search",
            "--top-k",
            "3",
            "--cache-capacity",
            "8",
            "lazy dog",
        ]);

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.cache_capacity, 8);
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        assert!(Cli::try_parse_from(["meklet", "--block-size", "0", "build"]).is_err());
    }
}
