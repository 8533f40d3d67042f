use std::io::Write;

use anyhow::{Context, bail};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::cli::{Bins, ColumnType, field_names};
use crate::csv::{Writer, write_pairs};
use crate::distance::{self, Metric};
use crate::histogram::{Histogram, Summary};
use crate::table::PointTable;

/// width of the longest histogram bar
const BAR_WIDTH: usize = 50;

/// pair counts above this will log a warning before calculating
const LARGE_PAIR_COUNT: usize = 10_000_000;

#[derive(Debug, Args)]
pub struct PairwiseArgs {
    /// specifies the algorithm to use when calculating distances. one of
    /// euclidean, manhattan (cityblock) or minkowski=<p>
    #[arg(long, default_value = "euclidean")]
    algo: Metric,

    /// the list of columns to use as coordinates. defaults to every named
    /// column. pass --index-col when the first column is an unnamed row label
    #[arg(short, long = "col")]
    columns: Vec<ColumnType>,

    /// the number of histogram bins to display
    #[arg(long, default_value = "10")]
    bins: Bins,

    /// write every pair as csv instead of a histogram
    #[arg(long)]
    raw: bool,
}

#[derive(Debug, Args)]
pub struct RandomArgs {
    /// the number of rows in the random matrix
    #[arg(long, default_value = "10000")]
    rows: usize,

    /// the number of columns in the random matrix
    #[arg(long, default_value = "100")]
    cols: usize,

    /// seed for the random values. uses a random seed if not specified
    #[arg(long)]
    seed: Option<u64>,

    /// specifies the algorithm to use when calculating distances. one of
    /// euclidean, manhattan (cityblock) or minkowski=<p>
    #[arg(long, default_value = "euclidean")]
    algo: Metric,

    /// the number of histogram bins to display
    #[arg(long, default_value = "10")]
    bins: Bins,
}

/// calculates the distance between every pair of rows in the table and
/// displays the distribution or writes every pair
pub fn distance_pairwise<W>(table: &PointTable, arg: PairwiseArgs, mut output: W) -> anyhow::Result<()>
where
    W: Write,
{
    let dims = field_names(table, &arg.columns)?;
    let metric = arg.algo;

    if arg.raw {
        let points = distance::project_rows(table, &dims)?;

        log_pair_count(points.len());

        let mut writer = Writer::from_writer(output);

        return write_pairs(
            &mut writer,
            &metric.to_string(),
            distance::pairwise_iter(&points, metric),
        );
    }

    // fields are checked before anything is logged as being calculated
    table.resolve(&dims)?;

    log_pair_count(table.len());

    let distances = distance::pairwise_distances(table, &dims, metric)?;

    write_distribution(&mut output, metric, &distances, arg.bins)
}

/// builds a matrix of uniform random values in `[0, 1)` and displays the
/// distribution of distances between every pair of its rows
pub fn distance_random<W>(arg: RandomArgs, mut output: W) -> anyhow::Result<()>
where
    W: Write,
{
    if arg.cols == 0 {
        bail!("random matrix must have at least 1 column");
    }

    let metric = arg.algo;
    let matrix = match arg.seed {
        Some(seed) => random_matrix(&mut StdRng::seed_from_u64(seed), arg.rows, arg.cols),
        None => random_matrix(&mut rand::rng(), arg.rows, arg.cols),
    };

    info!(rows = arg.rows, cols = arg.cols, seed = ?arg.seed, "generated random matrix");

    log_pair_count(matrix.len());

    let distances = distance::pairwise_matrix(&matrix, metric);

    write_distribution(&mut output, metric, &distances, arg.bins)
}

fn random_matrix<G>(rng: &mut G, rows: usize, cols: usize) -> Vec<Vec<f64>>
where
    G: Rng,
{
    let mut rtn = Vec::with_capacity(rows);

    for _ in 0..rows {
        rtn.push((0..cols).map(|_| rng.random::<f64>()).collect());
    }

    rtn
}

fn log_pair_count(rows: usize) {
    let pairs = distance::pair_count(rows);

    if pairs > LARGE_PAIR_COUNT {
        warn!(rows, pairs, "large number of pairs to calculate");
    } else {
        info!(rows, pairs, "calculating pairwise distances");
    }
}

/// writes the summary line followed by the histogram of the distances
fn write_distribution<W>(
    output: &mut W,
    metric: Metric,
    distances: &[f64],
    bins: Bins,
) -> anyhow::Result<()>
where
    W: Write,
{
    let Some(summary) = Summary::new(distances) else {
        writeln!(output, "{metric}: no pairs to display").context("failed to write output")?;

        return Ok(());
    };

    writeln!(
        output,
        "{metric}: pairs: {} min: {:.4} max: {:.4} mean: {:.4}",
        distances.len(),
        summary.min,
        summary.max,
        summary.mean
    )
    .context("failed to write output")?;

    if let Some(histogram) = Histogram::new(distances, bins.get()) {
        output
            .write_all(histogram.render(BAR_WIDTH).as_bytes())
            .context("failed to write output")?;
    }

    output.flush().context("failed to flush output")?;

    Ok(())
}

#[cfg(test)]
mod test {
    use std::io;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use crate::error::Error;

    use super::*;

    /// shared buffer that collects formatted log lines
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs<F>(run: F) -> String
    where
        F: FnOnce(),
    {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, run);

        let bytes = buffer.0.lock().unwrap().clone();

        String::from_utf8(bytes).unwrap()
    }

    fn table() -> PointTable {
        PointTable::new(
            vec!["X".into(), "Y".into(), "Z".into()],
            vec![
                vec![9.0, 0.0, 0.0],
                vec![9.0, 3.0, 4.0],
                vec![9.0, 6.0, 0.0],
            ],
        )
        .unwrap()
    }

    fn pairwise_args(algo: Metric, raw: bool) -> PairwiseArgs {
        PairwiseArgs {
            algo,
            columns: vec![ColumnType::Name("Y".into()), ColumnType::Name("Z".into())],
            bins: Bins::from_str("2").unwrap(),
            raw,
        }
    }

    #[test]
    fn pairwise_raw_pairs() {
        let mut output = Vec::new();

        distance_pairwise(&table(), pairwise_args(Metric::Manhattan, true), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "i,j,manhattan\n0,1,7\n0,2,6\n1,2,7\n"
        );
    }

    #[test]
    fn pairwise_distribution() {
        let mut output = Vec::new();

        distance_pairwise(&table(), pairwise_args(Metric::Euclidean, false), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "euclidean: pairs: 3 min: 5.0000 max: 6.0000 mean: 5.3333"
        );
        // two pairs at 5 and one at 6
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(" 2 "));
        assert!(lines[2].contains(" 1 "));
    }

    #[test]
    fn pairwise_single_row() {
        let table = PointTable::new(vec!["Y".into()], vec![vec![1.0]]).unwrap();
        let mut arg = pairwise_args(Metric::Euclidean, false);
        arg.columns = Vec::new();
        let mut output = Vec::new();

        distance_pairwise(&table, arg, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "euclidean: no pairs to display\n"
        );
    }

    #[test]
    fn pairwise_missing_field() {
        let mut arg = pairwise_args(Metric::Euclidean, false);
        arg.columns.push(ColumnType::Name("W".into()));

        let err = distance_pairwise(&table(), arg, Vec::new()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingField { field, .. }) if field == "W"
        ));
    }

    #[test]
    fn pairwise_logs_only_after_fields_resolve() {
        let logs = captured_logs(|| {
            let mut arg = pairwise_args(Metric::Euclidean, false);
            arg.columns.push(ColumnType::Name("W".into()));

            assert!(distance_pairwise(&table(), arg, Vec::new()).is_err());
        });

        assert!(!logs.contains("calculating pairwise distances"));

        let logs = captured_logs(|| {
            let arg = pairwise_args(Metric::Euclidean, false);

            distance_pairwise(&table(), arg, Vec::new()).unwrap();
        });

        assert!(logs.contains("calculating pairwise distances"));
        assert!(logs.contains("pairs=3"));
    }

    #[test]
    fn pairs_counted_with_infinite_distances() {
        let mut output = Vec::new();

        write_distribution(
            &mut output,
            Metric::Euclidean,
            &[1.0, f64::INFINITY, 3.0],
            Bins::from_str("2").unwrap(),
        )
        .unwrap();

        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("euclidean: pairs: 3 min: 1.0000 max: 3.0000"));
    }

    #[test]
    fn random_matrix_bounds() {
        let matrix = random_matrix(&mut StdRng::seed_from_u64(7), 20, 4);

        assert_eq!(matrix.len(), 20);
        assert!(matrix.iter().all(|row| row.len() == 4));
        assert!(matrix.iter().flatten().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn random_seeded_is_repeatable() {
        let run = || {
            let arg = RandomArgs {
                rows: 12,
                cols: 3,
                seed: Some(42),
                algo: Metric::Manhattan,
                bins: Bins::from_str("4").unwrap(),
            };
            let mut output = Vec::new();

            distance_random(arg, &mut output).unwrap();

            String::from_utf8(output).unwrap()
        };

        let first = run();

        assert_eq!(first, run());
        assert!(first.starts_with("manhattan: pairs: 66 "));
        assert_eq!(first.lines().count(), 5);
    }

    #[test]
    fn random_requires_columns() {
        let arg = RandomArgs {
            rows: 3,
            cols: 0,
            seed: None,
            algo: Metric::Euclidean,
            bins: Bins::from_str("4").unwrap(),
        };

        assert!(distance_random(arg, Vec::new()).is_err());
    }
}
