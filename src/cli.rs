use std::convert::Infallible;
use std::str::FromStr;

use anyhow::bail;
use tracing::warn;

use crate::table::PointTable;

/// represents the column type specified in the command line arguments
#[derive(Debug, Clone)]
pub enum ColumnType {
    /// a column name to attempt to lookup
    Name(String),

    /// a defined zero based index number in the csv
    Index(usize),
}

impl ColumnType {
    /// retrieves the field name for the column. names are returned as given
    /// and are checked when the distance is calculated
    pub fn field_name(&self, table: &PointTable) -> anyhow::Result<String> {
        match self {
            Self::Name(name) => Ok(name.clone()),
            Self::Index(index) => {
                let Some(name) = table.fields().get(*index) else {
                    bail!(
                        "index is out of range for known fields. column index: {index} total: {}",
                        table.fields().len()
                    );
                };

                Ok(name.clone())
            }
        }
    }
}

impl FromStr for ColumnType {
    type Err = Infallible;

    fn from_str(given: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = usize::from_str(given) {
            Ok(Self::Index(index))
        } else {
            Ok(Self::Name(given.into()))
        }
    }
}

/// maps the list of columns into field names. an empty list selects every
/// field of the table that has a name. blank named fields, such as an unnamed
/// row label column, can still be selected by index
pub fn field_names(table: &PointTable, columns: &[ColumnType]) -> anyhow::Result<Vec<String>> {
    if columns.is_empty() {
        let (blank, named): (Vec<&String>, Vec<&String>) = table
            .fields()
            .iter()
            .partition(|name| name.trim().is_empty());

        if !blank.is_empty() {
            warn!(
                skipped = blank.len(),
                "skipping blank named columns. use --index-col if the first column is a row label"
            );
        }

        return Ok(named.into_iter().cloned().collect());
    }

    let mut rtn = Vec::with_capacity(columns.len());

    for col in columns {
        rtn.push(col.field_name(table)?);
    }

    Ok(rtn)
}

/// a comma delimitered list of numbers
#[derive(Debug, Clone)]
pub struct Datapoint(Vec<f64>);

impl Datapoint {
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl FromStr for Datapoint {
    type Err = &'static str;

    fn from_str(given: &str) -> Result<Self, Self::Err> {
        let mut rtn = Vec::new();
        let iter = given.split(',').map(|v| f64::from_str(v.trim()));

        for result in iter {
            rtn.push(result.map_err(|_| "failed to parse datapoint")?);
        }

        Ok(Self(rtn))
    }
}

/// the number of bins to use for a histogram
#[derive(Debug, Clone, Copy)]
pub struct Bins(usize);

impl Bins {
    pub fn get(&self) -> usize {
        self.0
    }
}

impl FromStr for Bins {
    type Err = &'static str;

    fn from_str(given: &str) -> Result<Self, Self::Err> {
        let Ok(value) = usize::from_str(given) else {
            return Err("invalid bin count specified");
        };

        if value == 0 {
            Err("bin count cannot be 0")
        } else {
            Ok(Self(value))
        }
    }
}
