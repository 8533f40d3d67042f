use std::fmt;

/// validation failures raised before any distance is calculated
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// no dimensions were given to calculate over
    NoDimensions,

    /// the number of dimensions does not match the number of reference values
    ShapeMismatch { dims: usize, reference: usize },

    /// a requested field is not part of the table
    MissingField { field: String, available: Vec<String> },

    /// the metric name is not one of the supported metrics
    UnknownMetric(String),

    /// the minkowski order is not a valid metric order
    InvalidOrder(f64),

    /// a row does not have the same number of values as the table has fields
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// the same field name was given more than once for a table
    DuplicateField(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDimensions => write!(f, "no dimensions specified to calculate distances over"),
            Self::ShapeMismatch { dims, reference } => write!(
                f,
                "number of reference values does not match number of dimensions. dims: {dims} reference: {reference}"
            ),
            Self::MissingField { field, available } => write!(
                f,
                "unknown field specified. field: {field} avail: {}",
                available.join(", ")
            ),
            Self::UnknownMetric(name) => write!(
                f,
                "unknown distance metric. metric: {name} expected: euclidean, manhattan"
            ),
            Self::InvalidOrder(p) => {
                write!(f, "minkowski order must be a finite value >= 1. p: {p}")
            }
            Self::RowWidth {
                row,
                expected,
                found,
            } => write!(
                f,
                "row has the wrong number of values. row: {} expected: {expected} found: {found}",
                row + 1
            ),
            Self::DuplicateField(name) => write!(f, "duplicate field name. field: {name}"),
        }
    }
}

impl std::error::Error for Error {}
