//! Tabular decoding of uploaded files into a [`Dataset`].
//!
//! Both backends build rows the same way: the first record is the header,
//! blank-named columns are dropped, repeated names get a numeric suffix, and a
//! row that ends up with no cells is discarded. Nothing is returned unless the
//! whole file decoded and produced at least one row and one named column.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use csv::StringRecord;
use log::{debug, info};

use crate::{
    data::{CellValue, Dataset, RawRow},
    error::ImportError,
    io_utils::{self, DecodeOptions, SourceFile},
};

pub fn decode(source: &SourceFile, options: &DecodeOptions) -> Result<Dataset, ImportError> {
    let format = source.format()?;
    options.ensure_size(source.size())?;
    debug!(
        "Decoding '{}' ({} bytes) as {:?}",
        source.name,
        source.size(),
        format
    );
    let dataset = if format.is_workbook() {
        decode_workbook(&source.bytes)?
    } else {
        decode_csv(&source.bytes, options)?
    };
    info!(
        "Decoded {} row(s) across {} column(s) from '{}'",
        dataset.row_count(),
        dataset.columns.len(),
        source.name
    );
    Ok(dataset)
}

fn decode_csv(bytes: &[u8], options: &DecodeOptions) -> Result<Dataset, ImportError> {
    let encoding = io_utils::resolve_encoding(options.input_encoding.as_deref())?;
    let text = io_utils::decode_text(bytes, encoding)?;
    let mut reader = io_utils::open_csv_reader(&text);

    let records = reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            record.map_err(|err| ImportError::parse(format!("Reading line {}: {err}", idx + 1)))
        })
        .filter(|record| !matches!(record, Ok(record) if is_blank_line(record)))
        .collect::<Result<Vec<StringRecord>, _>>()?;
    let mut records = records.into_iter();
    let Some(header_record) = records.next() else {
        return Err(ImportError::EmptyData);
    };
    let headers = unique_headers(header_record.iter().map(str::to_string));

    let rows = records
        .map(|record| {
            headers
                .iter()
                .zip(record.iter())
                .filter_map(|(name, cell)| name.as_deref().map(|name| (name, cell)))
                .collect::<RawRow>()
        })
        .filter(|row| !row.is_empty())
        .collect::<Vec<_>>();

    finish(headers, rows)
}

fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

fn decode_workbook(bytes: &[u8]) -> Result<Dataset, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|err| ImportError::parse(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::parse("Workbook has no worksheets"))?
        .map_err(|err| ImportError::parse(err.to_string()))?;
    dataset_from_grid(range.rows())
}

/// Builds a dataset from worksheet rows, the first being the header.
pub(crate) fn dataset_from_grid<'a>(
    mut grid: impl Iterator<Item = &'a [Data]>,
) -> Result<Dataset, ImportError> {
    let Some(header_row) = grid.next() else {
        return Err(ImportError::EmptyData);
    };
    let headers = unique_headers(header_row.iter().map(|cell| {
        workbook_cell(cell)
            .map(|value| value.as_display())
            .unwrap_or_default()
    }));

    let rows = grid
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .filter_map(|(name, cell)| Some((name.as_deref()?, workbook_cell(cell)?)))
                .collect::<RawRow>()
        })
        .filter(|row| !row.is_empty())
        .collect::<Vec<_>>();

    finish(headers, rows)
}

fn workbook_cell(cell: &Data) -> Option<CellValue> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Text(cell.to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(err) => CellValue::Text(err.to_string()),
    };
    Some(value)
}

/// Position-aligned header names: `None` for blank headers, and a `_N` suffix
/// for names already taken.
fn unique_headers(raw: impl Iterator<Item = String>) -> Vec<Option<String>> {
    let mut taken: Vec<String> = Vec::new();
    raw.map(|name| {
        if name.trim().is_empty() {
            return None;
        }
        let mut candidate = name.clone();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        taken.push(candidate.clone());
        Some(candidate)
    })
    .collect()
}

fn finish(headers: Vec<Option<String>>, rows: Vec<RawRow>) -> Result<Dataset, ImportError> {
    let columns = headers.into_iter().flatten().collect::<Vec<_>>();
    if columns.is_empty() {
        return Err(ImportError::NoColumns);
    }
    if rows.is_empty() {
        return Err(ImportError::EmptyData);
    }
    Ok(Dataset { columns, rows })
}
