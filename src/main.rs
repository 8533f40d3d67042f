use std::fs::OpenOptions;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Error, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

mod cli;
mod csv;
mod distance;
mod error;
mod histogram;
mod pairwise;
mod reference;
mod table;

use crate::csv::{ReaderBuilder, load_table};
use pairwise::{PairwiseArgs, RandomArgs};
use reference::{CompareArgs, ReferenceArgs};
use table::PointTable;

fn main() -> anyhow::Result<()> {
    let start = Instant::now();
    let args = CliArgs::parse();

    // logs are written to stderr so that stdout only carries the results
    let logger = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_target(false);
    let logger = if args.debug {
        logger.with_max_level(tracing::Level::DEBUG)
    } else {
        logger.with_max_level(tracing::Level::INFO)
    };
    logger.init();

    let stdout = std::io::stdout().lock();

    match args.cmd {
        DistCmd::Reference(arg) => {
            let table = open_table(args.file.as_deref(), args.no_header, args.index_col)?;

            reference::distance_reference(&table, arg, stdout)?;
        }
        DistCmd::Compare(arg) => {
            let table = open_table(args.file.as_deref(), args.no_header, args.index_col)?;

            reference::distance_compare(&table, arg, stdout)?;
        }
        DistCmd::Pairwise(arg) => {
            let table = open_table(args.file.as_deref(), args.no_header, args.index_col)?;

            pairwise::distance_pairwise(&table, arg, stdout)?;
        }
        DistCmd::Random(arg) => pairwise::distance_random(arg, stdout)?,
    }

    info!(ms = start.elapsed().as_millis(), "processing completed");

    Ok(())
}

/// compares euclidean and manhattan distances over the numeric columns of a
/// csv file
#[derive(Debug, Parser)]
struct CliArgs {
    /// indicates that the csv contains no header row
    #[arg(long, global = true)]
    no_header: bool,

    /// treats the first column of the csv as a row label instead of data
    #[arg(long, global = true)]
    index_col: bool,

    /// path to the csv file to load
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// enables debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: DistCmd,
}

#[derive(Debug, Subcommand)]
enum DistCmd {
    /// calculates the distance from every row to a reference point
    Reference(ReferenceArgs),

    /// calculates the euclidean and manhattan distances to a reference point
    /// side by side
    Compare(CompareArgs),

    /// calculates the distance between every pair of rows
    Pairwise(PairwiseArgs),

    /// calculates the distance between every pair of rows of a uniform random
    /// matrix
    Random(RandomArgs),
}

/// opens and loads the csv file into a [`PointTable`]
fn open_table(file: Option<&Path>, no_header: bool, index_col: bool) -> anyhow::Result<PointTable> {
    let Some(path) = file else {
        bail!("a csv file must be specified with --file");
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(!no_header)
        .from_reader(BufReader::new(open_file(path)?));

    let table = load_table(&mut reader, index_col)
        .with_context(|| format!("failed to load csv file. path: {}", path.display()))?;

    if table.is_empty() {
        warn!(path = %path.display(), "csv file contains no rows");
    } else {
        debug!(path = %path.display(), rows = table.len(), "opened csv table");
    }

    Ok(table)
}

fn open_file(path: &Path) -> anyhow::Result<std::fs::File> {
    let result = OpenOptions::new().read(true).open(path);

    match result {
        Ok(f) => Ok(f),
        Err(err) => match err.kind() {
            ErrorKind::NotFound => bail!("the requested csv file was not found"),
            _ => Err(Error::new(err).context("failed to load csv file")),
        },
    }
}
