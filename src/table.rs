//! in memory table of named numeric columns
//!
//! a [`PointTable`] is loaded once and never mutated. every distance
//! calculation reads from it by field name and produces a fresh output.
use std::collections::HashSet;

use crate::error::Error;

/// ordered rows of real values that all share the same set of named fields
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    fields: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl PointTable {
    /// creates a new table, checking that every row matches the field list
    pub fn new(fields: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(fields.len());

        for name in &fields {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateField(name.clone()));
            }
        }

        for (row, values) in rows.iter().enumerate() {
            if values.len() != fields.len() {
                return Err(Error::RowWidth {
                    row,
                    expected: fields.len(),
                    found: values.len(),
                });
            }
        }

        Ok(Self { fields, rows })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }

    /// maps the given field names to their column positions in the table
    pub fn resolve<S>(&self, dims: &[S]) -> Result<Vec<usize>, Error>
    where
        S: AsRef<str>,
    {
        if dims.is_empty() {
            return Err(Error::NoDimensions);
        }

        let mut rtn = Vec::with_capacity(dims.len());

        for name in dims {
            let Some(index) = self.field_index(name.as_ref()) else {
                return Err(Error::MissingField {
                    field: name.as_ref().to_owned(),
                    available: self.fields.clone(),
                });
            };

            rtn.push(index);
        }

        Ok(rtn)
    }

    /// gathers the values of the given column positions from a single row
    /// into the provided buffer
    pub fn project_into(&self, row: usize, indices: &[usize], buffer: &mut Vec<f64>) {
        let values = &self.rows[row];

        buffer.clear();
        buffer.extend(indices.iter().map(|index| values[*index]));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn yz_table() -> PointTable {
        PointTable::new(
            vec!["X".into(), "Y".into(), "Z".into()],
            vec![vec![1.0, 5.0, 5.0], vec![2.0, 8.0, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_ragged_rows() {
        let result = PointTable::new(
            vec!["Y".into(), "Z".into()],
            vec![vec![1.0, 2.0], vec![3.0]],
        );

        assert_eq!(
            result,
            Err(Error::RowWidth {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_duplicate_fields() {
        let result = PointTable::new(vec!["Y".into(), "Y".into()], Vec::new());

        assert_eq!(result, Err(Error::DuplicateField("Y".into())));
    }

    #[test]
    fn resolve_in_requested_order() {
        let table = yz_table();

        assert_eq!(table.resolve(&["Z", "Y"]).unwrap(), vec![2, 1]);
        assert_eq!(table.resolve::<&str>(&[]), Err(Error::NoDimensions));
    }

    #[test]
    fn resolve_missing_field() {
        let table = yz_table();

        let Err(Error::MissingField { field, available }) = table.resolve(&["Y", "W"]) else {
            panic!("expected missing field");
        };

        assert_eq!(field, "W");
        assert_eq!(available, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn project_selected_columns() {
        let table = yz_table();
        let mut buffer = Vec::new();

        table.project_into(1, &[2, 0], &mut buffer);

        assert_eq!(buffer, vec![5.0, 2.0]);
    }
}
