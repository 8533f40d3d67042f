use std::io::Write;

use clap::Args;
use tracing::{debug, info};

use crate::cli::{ColumnType, Datapoint, field_names};
use crate::csv::{Writer, write_distances};
use crate::distance::{self, Metric};
use crate::histogram::Summary;
use crate::table::PointTable;

#[derive(Debug, Args)]
pub struct ReferenceArgs {
    /// specifies the algorithm to use when calculating distances. one of
    /// euclidean, manhattan (cityblock) or minkowski=<p>
    #[arg(long, default_value = "euclidean")]
    algo: Metric,

    /// the list of columns to use as coordinates. defaults to every named
    /// column. pass --index-col when the first column is an unnamed row label
    #[arg(short, long = "col")]
    columns: Vec<ColumnType>,

    /// a comma delimitered list of numbers to measure each row against
    #[arg(long)]
    point: Datapoint,

    /// write the coordinates relative to the reference point
    #[arg(long)]
    centered: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// the list of columns to use as coordinates. defaults to every named
    /// column. pass --index-col when the first column is an unnamed row label
    #[arg(short, long = "col")]
    columns: Vec<ColumnType>,

    /// a comma delimitered list of numbers to measure each row against
    #[arg(long)]
    point: Datapoint,

    /// write the coordinates relative to the reference point
    #[arg(long)]
    centered: bool,
}

/// writes the distance from every row of the table to the reference point
pub fn distance_reference<W>(table: &PointTable, arg: ReferenceArgs, output: W) -> anyhow::Result<()>
where
    W: Write,
{
    let dims = field_names(table, &arg.columns)?;
    let reference = arg.point.into_inner();
    let metric = arg.algo;

    debug!(dims = ?dims, reference = ?reference, %metric, "calculating distances to reference");

    let distances = distance::to_reference(table, &dims, &reference, metric)?;
    let points = distance::project_rows(table, &dims)?;

    log_summary(metric, &distances);

    let mut writer = Writer::from_writer(output);

    write_distances(
        &mut writer,
        &dims,
        &points,
        arg.centered.then_some(reference.as_slice()),
        &[(metric.to_string(), distances)],
    )
}

/// writes the euclidean and manhattan distances from every row of the table
/// to the reference point side by side
pub fn distance_compare<W>(table: &PointTable, arg: CompareArgs, output: W) -> anyhow::Result<()>
where
    W: Write,
{
    let dims = field_names(table, &arg.columns)?;
    let reference = arg.point.into_inner();

    let euclid = distance::euclidean_to_reference(table, &dims, &reference)?;
    let manhattan = distance::manhattan_to_reference(table, &dims, &reference)?;
    let points = distance::project_rows(table, &dims)?;

    log_summary(Metric::Euclidean, &euclid);
    log_summary(Metric::Manhattan, &manhattan);

    // both metrics agree only when a row differs from the reference along at
    // most one axis
    let aligned = points
        .iter()
        .filter(|point| {
            point
                .iter()
                .zip(&reference)
                .filter(|(value, expected)| value != expected)
                .count()
                <= 1
        })
        .count();

    info!(
        rows = points.len(),
        aligned, "rows where euclidean and manhattan distances are equal"
    );

    let mut writer = Writer::from_writer(output);

    write_distances(
        &mut writer,
        &dims,
        &points,
        arg.centered.then_some(reference.as_slice()),
        &[
            (Metric::Euclidean.to_string(), euclid),
            (Metric::Manhattan.to_string(), manhattan),
        ],
    )
}

fn log_summary(metric: Metric, distances: &[f64]) {
    if let Some(summary) = Summary::new(distances) {
        info!(
            %metric,
            rows = summary.count,
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            "distance summary"
        );
    }
}
