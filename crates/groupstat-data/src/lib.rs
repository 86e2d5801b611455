//! Tabular data loading and shaping for `groupstat`.
//!
//! This crate turns a spreadsheet into the numeric samples each hypothesis
//! test needs.
//!
//! # Overview
//!
//! 1. **Load** ([`loader::load_workbook`]): read one worksheet into a [`dataset::Dataset`]
//! 2. **View** ([`dataset::DatasetView`]): select the active rows without mutating the dataset
//! 3. **Group** ([`groups::extract_groups`]): partition a dependent column by a grouping column
//! 4. **Pair** ([`pairing::pivot_pairs`]): align two conditions by subject for a paired test
//!
//! # Examples
//!
//! ```
//! use groupstat_data::{
//!     cell::{Cell, GroupLabel},
//!     dataset::Dataset,
//!     groups::extract_groups,
//! };
//!
//! let dataset = Dataset::from_rows(
//!     vec!["group".into(), "score".into()],
//!     vec![
//!         vec![Cell::Text("A".into()), Cell::Number(1.0)],
//!         vec![Cell::Text("A".into()), Cell::Number(2.0)],
//!         vec![Cell::Text("B".into()), Cell::Number(3.0)],
//!         vec![Cell::Text("B".into()), Cell::Missing],
//!     ],
//! );
//!
//! let groups = extract_groups(&dataset.view(), 1, 0).unwrap();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].label, GroupLabel::from("A"));
//! assert_eq!(groups[0].values, [1.0, 2.0]);
//! assert_eq!(groups[1].values, [3.0]);
//! ```

use std::path::PathBuf;

pub mod cell;
pub mod dataset;
pub mod groups;
pub mod loader;
pub mod pairing;

/// Errors raised while loading or shaping data.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DataError {
    #[display("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },
    #[display("workbook {} has no worksheets", path.display())]
    NoWorksheet { path: PathBuf },
    #[display("workbook {} has no worksheet named {sheet:?}", path.display())]
    MissingSheet { path: PathBuf, sheet: String },
    #[display("worksheet {sheet:?} has no header row")]
    NoHeader { sheet: String },
    #[display("column {column:?} has {actual} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[display("column {column:?} is not numeric: row {row} holds {value:?}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[display("subject {subject} has more than one observation for condition {condition}")]
    DuplicateObservation { subject: String, condition: String },
}
