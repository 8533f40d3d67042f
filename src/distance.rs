//! distance metrics over rows of a [`PointTable`]
//!
//! two forms are offered. [`to_reference`] (and the named
//! [`euclidean_to_reference`] / [`manhattan_to_reference`]) measure every row
//! against a fixed reference point and produce one distance per row.
//! [`pairwise_distances`] measures every unordered pair of rows against each
//! other and produces the condensed `n * (n - 1) / 2` list of distances.
//!
//! all inputs are validated before anything is calculated so a call either
//! returns the full output or an [`Error`] naming what was wrong.
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::table::PointTable;

/// largest absolute difference between 2 sets of datapoints
fn largest_difference(a_data: &[f64], b_data: &[f64]) -> f64 {
    a_data
        .iter()
        .zip(b_data)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

/// calculates the euclidean distance between 2 sets of datapoints
pub fn euclidean(a_data: &[f64], b_data: &[f64]) -> f64 {
    // differences are divided by the largest one before squaring so the sum
    // stays finite for any finite distance
    let largest = largest_difference(a_data, b_data);

    if largest == 0.0 || largest.is_infinite() {
        return largest;
    }

    // we will expect the total datapoints from a and b to be the same and just
    // zip them together for the iterator chain
    largest
        * a_data
            .iter()
            .zip(b_data)
            .map(|(a, b)| ((a - b) / largest).powf(2.0))
            .sum::<f64>()
            .sqrt()
}

/// calculates the manhattan distance between 2 sets of datapoints
pub fn manhattan(a_data: &[f64], b_data: &[f64]) -> f64 {
    // similar to the euclidean distance expectation
    a_data
        .iter()
        .zip(b_data)
        .map(|(a, b)| (a - b).abs())
        .sum::<f64>()
}

/// calculates the minkowski distance of order `p` between 2 sets of
/// datapoints.
///
/// orders 1 and 2 are routed to [`manhattan`] and [`euclidean`] so those
/// results are identical to calling them directly.
pub fn minkowski(a_data: &[f64], b_data: &[f64], p: f64) -> f64 {
    if p == 1.0 {
        return manhattan(a_data, b_data);
    }

    if p == 2.0 {
        return euclidean(a_data, b_data);
    }

    let largest = largest_difference(a_data, b_data);

    if largest == 0.0 || largest.is_infinite() {
        return largest;
    }

    largest
        * a_data
            .iter()
            .zip(b_data)
            .map(|(a, b)| ((a - b) / largest).abs().powf(p))
            .sum::<f64>()
            .powf(p.recip())
}

/// the distance metric to use for a calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// straight line (L2) distance
    Euclidean,

    /// sum of axis aligned differences (L1), also known as cityblock
    Manhattan,

    /// general Lp distance. use [`Metric::minkowski`] to create a checked
    /// order
    Minkowski(f64),
}

impl Metric {
    /// creates a minkowski metric, rejecting orders that do not produce a
    /// valid metric
    pub fn minkowski(p: f64) -> Result<Self, Error> {
        if !p.is_finite() || p < 1.0 {
            return Err(Error::InvalidOrder(p));
        }

        Ok(Self::Minkowski(p))
    }

    pub fn distance(&self, a_data: &[f64], b_data: &[f64]) -> f64 {
        match self {
            Self::Euclidean => euclidean(a_data, b_data),
            Self::Manhattan => manhattan(a_data, b_data),
            Self::Minkowski(p) => minkowski(a_data, b_data, *p),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => f.write_str("euclidean"),
            Self::Manhattan => f.write_str("manhattan"),
            Self::Minkowski(p) => write!(f, "minkowski={p}"),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    /// accepts `euclidean`, `manhattan` (or `cityblock`) and `minkowski=<p>`
    fn from_str(given: &str) -> Result<Self, Self::Err> {
        let lower = given.trim().to_ascii_lowercase();

        if let Some(order) = lower.strip_prefix("minkowski=") {
            let Ok(p) = f64::from_str(order) else {
                return Err(Error::UnknownMetric(given.to_owned()));
            };

            return Self::minkowski(p);
        }

        match lower.as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" | "cityblock" => Ok(Self::Manhattan),
            _ => Err(Error::UnknownMetric(given.to_owned())),
        }
    }
}

/// calculates the distance from every row of the table to the reference point
/// using only the requested dimensions.
///
/// the returned list lines up one to one with the rows of the table.
pub fn to_reference<S>(
    table: &PointTable,
    dims: &[S],
    reference: &[f64],
    metric: Metric,
) -> Result<Vec<f64>, Error>
where
    S: AsRef<str>,
{
    if dims.len() != reference.len() {
        return Err(Error::ShapeMismatch {
            dims: dims.len(),
            reference: reference.len(),
        });
    }

    let indices = table.resolve(dims)?;
    let mut buffer = Vec::with_capacity(indices.len());
    let mut rtn = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        table.project_into(row, &indices, &mut buffer);

        rtn.push(metric.distance(&buffer, reference));
    }

    Ok(rtn)
}

/// euclidean distance from every row to the reference point
pub fn euclidean_to_reference<S>(
    table: &PointTable,
    dims: &[S],
    reference: &[f64],
) -> Result<Vec<f64>, Error>
where
    S: AsRef<str>,
{
    to_reference(table, dims, reference, Metric::Euclidean)
}

/// manhattan distance from every row to the reference point
pub fn manhattan_to_reference<S>(
    table: &PointTable,
    dims: &[S],
    reference: &[f64],
) -> Result<Vec<f64>, Error>
where
    S: AsRef<str>,
{
    to_reference(table, dims, reference, Metric::Manhattan)
}

/// copies the requested dimensions of every row out of the table
pub fn project_rows<S>(table: &PointTable, dims: &[S]) -> Result<Vec<Vec<f64>>, Error>
where
    S: AsRef<str>,
{
    let indices = table.resolve(dims)?;
    let mut rtn = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let mut buffer = Vec::with_capacity(indices.len());

        table.project_into(row, &indices, &mut buffer);

        rtn.push(buffer);
    }

    Ok(rtn)
}

/// lazily enumerates every unordered pair of points as `(i, j, distance)`
/// with `i` ascending in the outer loop and `j > i` ascending in the inner
/// loop
pub fn pairwise_iter<V>(points: &[V], metric: Metric) -> impl Iterator<Item = (usize, usize, f64)>
where
    V: AsRef<[f64]>,
{
    (0..points.len()).flat_map(move |i| {
        (i + 1..points.len())
            .map(move |j| (i, j, metric.distance(points[i].as_ref(), points[j].as_ref())))
    })
}

/// calculates the condensed pairwise distances of a row major matrix.
///
/// the amount of work and the size of the output grow with the square of the
/// number of rows.
pub fn pairwise_matrix<V>(points: &[V], metric: Metric) -> Vec<f64>
where
    V: AsRef<[f64]>,
{
    let total = pair_count(points.len());
    let mut rtn = Vec::with_capacity(total);

    rtn.extend(pairwise_iter(points, metric).map(|(_, _, distance)| distance));

    rtn
}

/// calculates the distance between every unordered pair of rows in the table
/// using the requested dimensions.
///
/// see [`pairwise_matrix`] for the ordering and cost of the output.
pub fn pairwise_distances<S>(
    table: &PointTable,
    dims: &[S],
    metric: Metric,
) -> Result<Vec<f64>, Error>
where
    S: AsRef<str>,
{
    let points = project_rows(table, dims)?;

    Ok(pairwise_matrix(&points, metric))
}

/// number of unordered pairs for the given number of rows
pub fn pair_count(rows: usize) -> usize {
    rows * rows.saturating_sub(1) / 2
}
