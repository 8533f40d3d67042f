use std::io::{Read, Write};
use std::str::FromStr;

use anyhow::{Context, bail};
pub use csv::{Reader, ReaderBuilder, StringRecord, Writer};
use tracing::debug;

use crate::table::PointTable;

/// loads every column of the csv into a [`PointTable`].
///
/// when `index_col` is set the first column is treated as a row label and is
/// not loaded. csv files without headers will name fields by their zero based
/// position after the index column has been removed.
pub fn load_table<R>(reader: &mut Reader<R>, index_col: bool) -> anyhow::Result<PointTable>
where
    R: Read,
{
    let skip = usize::from(index_col);

    let headers = if reader.has_headers() {
        let known_headers = reader.headers().context("failed to retrieve csv headers")?;

        Some(
            known_headers
                .iter()
                .skip(skip)
                .map(|name| name.trim().to_owned())
                .collect::<Vec<String>>(),
        )
    } else {
        None
    };

    let mut rows = Vec::new();

    for (index, maybe) in reader.records().enumerate() {
        let record = maybe.with_context(|| format!("failed to parse csv record. row: {index}"))?;

        rows.push(map_record(skip, index, &record)?);
    }

    let fields = match headers {
        Some(fields) => fields,
        None => {
            let width = rows.first().map(Vec::len).unwrap_or(0);

            (0..width).map(|index| index.to_string()).collect()
        }
    };

    debug!(fields = ?fields, rows = rows.len(), "loaded csv table");

    Ok(PointTable::new(fields, rows)?)
}

/// maps a csv record into a list of numeric values, skipping the leading
/// columns that are not loaded
fn map_record(skip: usize, index: usize, record: &StringRecord) -> anyhow::Result<Vec<f64>> {
    let mut rtn = Vec::with_capacity(record.len().saturating_sub(skip));

    for (col, value) in record.iter().enumerate().skip(skip) {
        let Ok(v) = f64::from_str(value.trim()) else {
            bail!(
                "failed to parse column data. row: {} column index: {}",
                index + 1,
                col + 1
            );
        };

        if !v.is_finite() {
            bail!(
                "column data is not a finite number. row: {} column index: {}",
                index + 1,
                col + 1
            );
        }

        rtn.push(v);
    }

    Ok(rtn)
}

/// writes one row per point followed by the value of every distance column
/// for that point.
///
/// when a reference is given the coordinates are written relative to it and
/// the headers are named `{field}-{reference}`.
pub fn write_distances<W>(
    writer: &mut Writer<W>,
    fields: &[String],
    points: &[Vec<f64>],
    centered: Option<&[f64]>,
    columns: &[(String, Vec<f64>)],
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut header = Vec::with_capacity(fields.len() + columns.len());

    match centered {
        Some(reference) => {
            for (field, value) in fields.iter().zip(reference) {
                header.push(format!("{field}-{value}"));
            }
        }
        None => header.extend(fields.iter().cloned()),
    }

    header.extend(columns.iter().map(|(name, _)| name.clone()));

    writer
        .write_record(&header)
        .context("failed to write csv header")?;

    let mut record = Vec::with_capacity(header.len());

    for (row, point) in points.iter().enumerate() {
        record.clear();

        match centered {
            Some(reference) => record.extend(
                point
                    .iter()
                    .zip(reference)
                    .map(|(value, offset)| (value - offset).to_string()),
            ),
            None => record.extend(point.iter().map(f64::to_string)),
        }

        record.extend(columns.iter().map(|(_, values)| values[row].to_string()));

        writer
            .write_record(&record)
            .with_context(|| format!("failed to write csv record. row: {row}"))?;
    }

    writer.flush().context("failed to flush csv output")?;

    Ok(())
}

/// writes `i,j,distance` records for every pair from the iterator
pub fn write_pairs<W, I>(writer: &mut Writer<W>, metric: &str, pairs: I) -> anyhow::Result<()>
where
    W: Write,
    I: Iterator<Item = (usize, usize, f64)>,
{
    writer
        .write_record(["i", "j", metric])
        .context("failed to write csv header")?;

    for (i, j, distance) in pairs {
        writer
            .write_record(&[i.to_string(), j.to_string(), distance.to_string()])
            .with_context(|| format!("failed to write csv record. pair: ({i}, {j})"))?;
    }

    writer.flush().context("failed to flush csv output")?;

    Ok(())
}
