//! Reading spreadsheets into datasets.

use std::{collections::HashMap, path::Path};

use calamine::{Data, Range, Reader as _, open_workbook_auto};

use crate::{DataError, cell::Cell, dataset::Dataset};

/// File extensions the loader can open.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loads one worksheet of a workbook.
///
/// The first row of the sheet supplies column names; every following row is
/// a data row. Reads the first worksheet unless `sheet` names another.
pub fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Dataset, DataError> {
    let workbook_error = |source| DataError::Workbook {
        path: path.to_owned(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;

    let (sheet_name, range) = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(DataError::MissingSheet {
                    path: path.to_owned(),
                    sheet: name.to_owned(),
                });
            }
            let range = workbook.worksheet_range(name).map_err(workbook_error)?;
            (name.to_owned(), range)
        }
        None => {
            let name = workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| DataError::NoWorksheet {
                    path: path.to_owned(),
                })?;
            let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
            (name, range)
        }
    };

    let dataset = dataset_from_range(&sheet_name, &range)?;
    tracing::info!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "loaded worksheet"
    );
    Ok(dataset)
}

fn dataset_from_range(sheet: &str, range: &Range<Data>) -> Result<Dataset, DataError> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| DataError::NoHeader {
        sheet: sheet.to_owned(),
    })?;
    let header = header_names(header.iter().map(header_text));
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .collect();
    Ok(Dataset::from_rows(header, rows))
}

fn header_text(data: &Data) -> String {
    match cell_from_data(data) {
        Cell::Missing => String::new(),
        Cell::Text(s) => s,
        cell => cell.to_string(),
    }
}

/// Names blank headers `Unnamed: <index>` and suffixes repeats with `.1`, `.2`, ...
fn header_names(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashMap::<String, usize>::new();
    raw.into_iter()
        .enumerate()
        .map(|(index, name)| {
            let name = if name.trim().is_empty() {
                format!("Unnamed: {index}")
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_default();
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.trim().is_empty() {
                Cell::Missing
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Error(_) | Data::Empty => Cell::Missing,
    }
}
