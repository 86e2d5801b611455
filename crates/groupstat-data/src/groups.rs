//! Partitioning a dependent variable by a grouping variable.

use std::collections::BTreeMap;

use crate::{DataError, cell::GroupLabel, dataset::DatasetView};

/// Dependent-variable values of the rows sharing one grouping label.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub label: GroupLabel,
    /// Values with missing cells removed, in row order.
    pub values: Vec<f64>,
}

/// Partitions the `dependent` column by the labels of the `grouping` column.
///
/// Groups are returned in label order. Rows with a missing grouping label
/// are skipped. Missing dependent values are dropped per group; a label whose
/// rows are all missing still yields an (empty) group.
///
/// Fails if a row with a grouping label holds a non-numeric dependent value.
pub fn extract_groups(
    view: &DatasetView<'_>,
    dependent: usize,
    grouping: usize,
) -> Result<Vec<Group>, DataError> {
    let dataset = view.dataset();
    let mut groups = BTreeMap::<GroupLabel, Vec<f64>>::new();
    for (row, cell) in view.cells(grouping) {
        let Some(label) = cell.label() else {
            continue;
        };
        let value = dataset.numeric_value(dependent, row)?;
        let entry = groups.entry(label).or_default();
        if let Some(value) = value {
            entry.push(value);
        }
    }

    let groups = groups
        .into_iter()
        .map(|(label, values)| Group { label, values })
        .collect::<Vec<_>>();
    tracing::debug!(
        groups = groups.len(),
        rows = view.len(),
        "extracted groups"
    );
    Ok(groups)
}

/// Borrows each group's values as a slice, the shape the test routines take.
#[must_use]
pub fn value_slices(groups: &[Group]) -> Vec<&[f64]> {
    groups.iter().map(|g| g.values.as_slice()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cell::Cell, dataset::Dataset};

    fn dataset(rows: &[(&str, Option<f64>)]) -> Dataset {
        Dataset::from_rows(
            vec!["group".into(), "value".into()],
            rows.iter()
                .map(|(g, v)| {
                    let group = if g.is_empty() {
                        Cell::Missing
                    } else {
                        Cell::Text((*g).to_owned())
                    };
                    vec![group, v.map_or(Cell::Missing, Cell::Number)]
                })
                .collect(),
        )
    }

    #[test]
    fn test_two_groups() {
        let data = dataset(&[
            ("A", Some(1.0)),
            ("A", Some(2.0)),
            ("B", Some(3.0)),
            ("B", Some(4.0)),
        ]);
        let groups = extract_groups(&data.view(), 1, 0).unwrap();
        assert_eq!(
            groups,
            [
                Group {
                    label: GroupLabel::from("A"),
                    values: vec![1.0, 2.0]
                },
                Group {
                    label: GroupLabel::from("B"),
                    values: vec![3.0, 4.0]
                },
            ]
        );
    }

    #[test]
    fn test_labels_match_distinct_values_and_drop_missing() {
        let data = dataset(&[
            ("C", Some(1.0)),
            ("A", None),
            ("", Some(9.0)),
            ("B", Some(2.0)),
            ("A", Some(5.0)),
            ("C", None),
        ]);
        let view = data.view();
        let groups = extract_groups(&view, 1, 0).unwrap();

        let labels = groups.iter().map(|g| g.label.clone()).collect::<Vec<_>>();
        assert_eq!(labels, view.distinct_labels(0));
        assert_eq!(groups[0].values, [5.0]);
        assert_eq!(groups[1].values, [2.0]);
        assert_eq!(groups[2].values, [1.0]);
        assert!(groups.iter().all(|g| g.values.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn test_all_missing_group_is_still_emitted() {
        let data = dataset(&[("A", Some(1.0)), ("B", None)]);
        let groups = extract_groups(&data.view(), 1, 0).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[1].values.is_empty());
    }

    #[test]
    fn test_unlabeled_rows_are_not_validated() {
        let data = Dataset::from_rows(
            vec!["group".into(), "value".into()],
            vec![
                vec![Cell::Text("A".into()), Cell::Number(1.0)],
                vec![Cell::Text("B".into()), Cell::Number(2.0)],
                vec![Cell::Missing, Cell::Text("n/a".into())],
            ],
        );
        let groups = extract_groups(&data.view(), 1, 0).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(value_slices(&groups), [&[1.0][..], &[2.0][..]]);
    }

    #[test]
    fn test_labeled_row_with_text_value_fails() {
        let data = Dataset::from_rows(
            vec!["group".into(), "value".into()],
            vec![
                vec![Cell::Text("A".into()), Cell::Number(1.0)],
                vec![Cell::Text("B".into()), Cell::Text("oops".into())],
            ],
        );
        let err = extract_groups(&data.view(), 1, 0).unwrap_err();
        assert!(matches!(err, DataError::NonNumeric { row: 3, .. }));
    }

    #[test]
    fn test_filtered_view_excludes_other_labels() {
        let data = dataset(&[
            ("A", Some(1.0)),
            ("B", Some(2.0)),
            ("C", Some(3.0)),
            ("A", Some(4.0)),
        ]);
        let view = data
            .view()
            .filter_labels(0, &[GroupLabel::from("A"), GroupLabel::from("C")]);
        let groups = extract_groups(&view, 1, 0).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.label != GroupLabel::from("B")));
        assert_eq!(value_slices(&groups), [&[1.0, 4.0][..], &[3.0][..]]);
    }
}
