extern crate tokio;

mod cli;
mod error;
mod lock;

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use meklet::{document::DocumentInfo, Analyzer, Config, Hit, IndexBuilder, SearchEngine};
use serde::Serialize;
use tokio::task;
use tracing::{error, info, Level};

use crate::{
    cli::{Cli, Command},
    error::Error,
    lock::BuildLock,
};

#[derive(Clone, Copy, Debug)]
enum Mode {
    Simple,
    Boolean,
}

#[derive(Debug, Serialize)]
struct QueryOutput {
    query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    results: Vec<ResultOutput>,
}

#[derive(Debug, Serialize)]
struct ResultOutput {
    #[serde(flatten)]
    hit: Hit,
    document: DocumentInfo,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = cli.resolve_config()?;
    let analyzer = Arc::new(Analyzer::from_config(&config.analyzer));

    match cli.command {
        Command::Build(build) => build_index(config, analyzer, build.force).await,
        Command::Search(search) => run_queries(config, analyzer, search.queries, Mode::Simple).await,
        Command::Boolean(search) => {
            run_queries(config, analyzer, search.queries, Mode::Boolean).await
        }
    }
}

async fn build_index(config: Config, analyzer: Arc<Analyzer>, force: bool) -> Result<(), Error> {
    let report = task::spawn_blocking(move || -> Result<_, Error> {
        let _lock = BuildLock::acquire(config.lock_path())?;

        if config.has_index() && !force {
            return Err(Error::IndexExists(config.index_dir.clone()));
        }

        info!(corpus = ?config.corpus_dir, index_dir = ?config.index_dir, "building index");
        Ok(IndexBuilder::new(&config, analyzer.as_ref()).build()?)
    })
    .await??;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_queries(
    config: Config,
    analyzer: Arc<Analyzer>,
    queries: Vec<String>,
    mode: Mode,
) -> Result<(), Error> {
    let engine = task::spawn_blocking(move || SearchEngine::open(config, analyzer)).await??;
    let engine = Arc::new(engine);

    let handles = queries
        .into_iter()
        .map(|query| {
            let engine = Arc::clone(&engine);
            task::spawn_blocking(move || answer(&engine, query, mode))
        })
        .collect::<Vec<_>>();

    let mut outputs = Vec::with_capacity(handles.len());
    for handle in handles {
        outputs.push(handle.await??);
    }

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

/// Runs one query. Malformed queries are reported in the output; index
/// failures abort the command.
fn answer(engine: &SearchEngine<Analyzer>, query: String, mode: Mode) -> Result<QueryOutput, Error> {
    let hits = match mode {
        Mode::Simple => engine.simple_search(&query),
        Mode::Boolean => engine.boolean_search(&query),
    };

    let hits = match hits {
        Ok(hits) => hits,
        Err(error) if error.is_validation() => {
            return Ok(QueryOutput {
                query,
                error: Some(error.to_string()),
                results: Vec::new(),
            })
        }
        Err(error) => return Err(error.into()),
    };

    let results = hits
        .into_iter()
        .map(|hit| {
            engine
                .describe(hit.doc_id)
                .map(|document| ResultOutput { hit, document })
        })
        .collect::<meklet::Result<Vec<_>>>()?;

    Ok(QueryOutput {
        query,
        error: None,
        results,
    })
}
