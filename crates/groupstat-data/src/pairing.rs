//! Wide pairing of two conditions by subject for paired tests.
//!
//! The long table (one row per subject and condition) is pivoted to one row
//! per subject with one column per condition:
//!
//! ```text
//! subject condition value        subject   A     B
//! 1       A         10           1         10    11
//! 1       B         11     =>    2         20    21
//! 2       A         20           3         -     31
//! 2       B         21
//! 3       B         31
//! ```
//!
//! Missing cells are dropped from each condition column independently. When
//! that leaves the columns with different lengths, both are truncated to the
//! shorter length by position.

use std::collections::BTreeMap;

use crate::{DataError, cell::GroupLabel, dataset::DatasetView};

/// Columns that make up a long-format paired table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingColumns {
    pub subject: usize,
    pub condition: usize,
    pub dependent: usize,
}

/// How the two condition columns were aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Alignment {
    /// Both columns had the same length after dropping missing cells.
    Matched,
    /// Lengths differed; both were cut to the shorter one.
    Truncated { first: usize, second: usize },
}

/// Two equally long samples ready for a paired test.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSamples {
    pub conditions: [GroupLabel; 2],
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    pub alignment: Alignment,
}

impl PairedSamples {
    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Pivots `view` to one row per subject and aligns the two `conditions`.
///
/// Subjects are ordered by label. Rows with a missing subject, or whose
/// condition is not one of `conditions`, are ignored. A subject observed
/// twice under the same condition is an error. Only the dependent values of
/// rows that take part in the pivot must be numeric.
pub fn pivot_pairs(
    view: &DatasetView<'_>,
    columns: PairingColumns,
    conditions: [GroupLabel; 2],
) -> Result<PairedSamples, DataError> {
    let dataset = view.dataset();
    let subjects = view.cells(columns.subject).map(|(_, cell)| cell.label());
    let condition_labels = view.cells(columns.condition);

    // Outer `Option` marks whether the cell was observed at all.
    let mut table = BTreeMap::<GroupLabel, [Option<Option<f64>>; 2]>::new();
    for (subject, (row, condition)) in subjects.zip(condition_labels) {
        let (Some(subject), Some(condition)) = (subject, condition.label()) else {
            continue;
        };
        let Some(slot) = conditions.iter().position(|c| *c == condition) else {
            continue;
        };
        let value = dataset.numeric_value(columns.dependent, row)?;
        let cells = table.entry(subject.clone()).or_default();
        if cells[slot].is_some() {
            return Err(DataError::DuplicateObservation {
                subject: subject.to_string(),
                condition: condition.to_string(),
            });
        }
        cells[slot] = Some(value);
    }

    let mut first = table
        .values()
        .filter_map(|cells| cells[0].flatten())
        .collect::<Vec<_>>();
    let mut second = table
        .values()
        .filter_map(|cells| cells[1].flatten())
        .collect::<Vec<_>>();

    let alignment = if first.len() == second.len() {
        Alignment::Matched
    } else {
        let alignment = Alignment::Truncated {
            first: first.len(),
            second: second.len(),
        };
        let common = first.len().min(second.len());
        first.truncate(common);
        second.truncate(common);
        tracing::debug!(?alignment, common, "truncated unequal paired columns");
        alignment
    };

    Ok(PairedSamples {
        conditions,
        first,
        second,
        alignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cell::Cell, dataset::Dataset};

    const COLUMNS: PairingColumns = PairingColumns {
        subject: 0,
        condition: 1,
        dependent: 2,
    };

    fn long_table(rows: &[(f64, &str, Option<f64>)]) -> Dataset {
        Dataset::from_rows(
            vec!["subject".into(), "condition".into(), "value".into()],
            rows.iter()
                .map(|&(subject, condition, value)| {
                    vec![
                        Cell::Number(subject),
                        Cell::Text(condition.to_owned()),
                        value.map_or(Cell::Missing, Cell::Number),
                    ]
                })
                .collect(),
        )
    }

    fn ab() -> [GroupLabel; 2] {
        [GroupLabel::from("A"), GroupLabel::from("B")]
    }

    #[test]
    fn test_matched_pairs_follow_subject_order() {
        let data = long_table(&[
            (2.0, "B", Some(21.0)),
            (1.0, "A", Some(10.0)),
            (2.0, "A", Some(20.0)),
            (1.0, "B", Some(11.0)),
        ]);
        let pairs = pivot_pairs(&data.view(), COLUMNS, ab()).unwrap();
        assert_eq!(pairs.first, [10.0, 20.0]);
        assert_eq!(pairs.second, [11.0, 21.0]);
        assert_eq!(pairs.alignment, Alignment::Matched);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_unequal_lengths_are_truncated() {
        let data = long_table(&[
            (1.0, "A", Some(10.0)),
            (2.0, "A", Some(20.0)),
            (3.0, "A", None),
            (1.0, "B", Some(11.0)),
            (2.0, "B", Some(21.0)),
            (3.0, "B", Some(31.0)),
        ]);
        let pairs = pivot_pairs(&data.view(), COLUMNS, ab()).unwrap();
        assert_eq!(
            pairs.alignment,
            Alignment::Truncated {
                first: 2,
                second: 3
            }
        );
        assert_eq!(pairs.first, [10.0, 20.0]);
        assert_eq!(pairs.second, [11.0, 21.0]);
    }

    #[test]
    fn test_truncation_is_positional() {
        // Subject 1 lacks A, so A's first value pairs with subject 1's B.
        let data = long_table(&[
            (1.0, "B", Some(11.0)),
            (2.0, "A", Some(20.0)),
            (2.0, "B", Some(21.0)),
        ]);
        let pairs = pivot_pairs(&data.view(), COLUMNS, ab()).unwrap();
        assert!(pairs.alignment.is_truncated());
        assert_eq!(pairs.first, [20.0]);
        assert_eq!(pairs.second, [11.0]);
    }

    #[test]
    fn test_duplicate_observation_is_an_error() {
        let data = long_table(&[(1.0, "A", Some(1.0)), (1.0, "A", Some(2.0))]);
        let err = pivot_pairs(&data.view(), COLUMNS, ab()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "subject 1 has more than one observation for condition A"
        );
    }

    #[test]
    fn test_other_conditions_are_ignored() {
        let data = long_table(&[
            (1.0, "A", Some(1.0)),
            (1.0, "B", Some(2.0)),
            (1.0, "C", Some(3.0)),
        ]);
        let pairs = pivot_pairs(&data.view(), COLUMNS, ab()).unwrap();
        assert_eq!(pairs.first, [1.0]);
        assert_eq!(pairs.second, [2.0]);
    }

    #[test]
    fn test_rows_outside_the_pivot_are_not_validated() {
        let data = Dataset::from_rows(
            vec!["subject".into(), "condition".into(), "value".into()],
            vec![
                vec![Cell::Number(1.0), Cell::Text("A".into()), Cell::Number(1.0)],
                vec![Cell::Number(1.0), Cell::Text("B".into()), Cell::Number(2.0)],
                vec![Cell::Number(1.0), Cell::Text("C".into()), Cell::Text("n/a".into())],
                vec![Cell::Missing, Cell::Text("A".into()), Cell::Text("n/a".into())],
            ],
        );
        let pairs = pivot_pairs(&data.view(), COLUMNS, ab()).unwrap();
        assert_eq!(pairs.first, [1.0]);
        assert_eq!(pairs.second, [2.0]);
    }
}
