//! In-memory datasets and filtered row views.

use std::collections::BTreeSet;

use crate::{
    DataError,
    cell::{Cell, GroupLabel},
};

/// Spreadsheet row number of the first data row (the header is row 1).
const FIRST_DATA_ROW: usize = 2;

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// An immutable table of equally long, named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset from columns, which must all have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let row_count = columns.first().map_or(0, |c| c.cells.len());
        if let Some(column) = columns.iter().find(|c| c.cells.len() != row_count) {
            return Err(DataError::ColumnLength {
                column: column.name.clone(),
                expected: row_count,
                actual: column.cells.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Builds a dataset from a header and row-major cells.
    ///
    /// Short rows are padded with [`Cell::Missing`]; cells beyond the header
    /// width are dropped.
    #[must_use]
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let row_count = rows.len();
        let mut columns = header
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(row_count)))
            .collect::<Vec<_>>();
        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.cells.push(cells.next().unwrap_or(Cell::Missing));
            }
        }
        Self { columns, row_count }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Returns the column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Numeric value of one cell; `None` marks a missing cell.
    ///
    /// Fails if the cell is neither numeric nor missing.
    pub fn numeric_value(&self, column: usize, row: usize) -> Result<Option<f64>, DataError> {
        let column = self.column(column);
        let cell = &column.cells[row];
        cell.as_number().map_err(|_| DataError::NonNumeric {
            column: column.name.clone(),
            row: row + FIRST_DATA_ROW,
            value: cell.to_string(),
        })
    }

    /// A view over every row.
    #[must_use]
    pub fn view(&self) -> DatasetView<'_> {
        DatasetView {
            dataset: self,
            rows: (0..self.row_count).collect(),
        }
    }
}

/// A subset of a [`Dataset`]'s rows.
///
/// Views never modify the dataset; filtering produces a new view.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> DatasetView<'a> {
    #[must_use]
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Indices of the active rows, in dataset order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Active cells of a column, paired with their row index.
    pub fn cells(&self, column: usize) -> impl Iterator<Item = (usize, &'a Cell)> + '_ {
        let cells = self.dataset.column(column).cells();
        self.rows.iter().map(move |&row| (row, &cells[row]))
    }

    /// Sorted, distinct, non-missing labels of a column over the active rows.
    #[must_use]
    pub fn distinct_labels(&self, column: usize) -> Vec<GroupLabel> {
        self.cells(column)
            .filter_map(|(_, cell)| cell.label())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keeps only the rows whose label in `column` is one of `labels`.
    #[must_use]
    pub fn filter_labels(&self, column: usize, labels: &[GroupLabel]) -> DatasetView<'a> {
        let rows = self
            .cells(column)
            .filter(|(_, cell)| cell.label().is_some_and(|l| labels.contains(&l)))
            .map(|(row, _)| row)
            .collect();
        DatasetView {
            dataset: self.dataset,
            rows,
        }
    }

    /// Numeric values of a column over the active rows; `None` marks a missing cell.
    ///
    /// Fails on the first cell that is neither numeric nor missing.
    pub fn numeric_values(&self, column: usize) -> Result<Vec<Option<f64>>, DataError> {
        self.rows
            .iter()
            .map(|&row| self.dataset.numeric_value(column, row))
            .collect()
    }

    /// Non-missing numeric values of a column over the active rows.
    pub fn observed_values(&self, column: usize) -> Result<Vec<f64>, DataError> {
        Ok(self.numeric_values(column)?.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_owned())
    }

    fn sample() -> Dataset {
        Dataset::from_rows(
            vec!["group".into(), "score".into()],
            vec![
                vec![text("B"), Cell::Number(1.0)],
                vec![text("A"), Cell::Number(2.0)],
                vec![Cell::Missing, Cell::Number(3.0)],
                vec![text("C"), Cell::Missing],
                vec![text("A")],
            ],
        )
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let dataset = sample();
        assert_eq!(dataset.row_count(), 5);
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.column(1).cells()[4], Cell::Missing);
        assert_eq!(dataset.column_index("score"), Some(1));
        assert_eq!(dataset.column_index("nope"), None);
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            Column::new("a", vec![Cell::Missing; 2]),
            Column::new("b", vec![Cell::Missing; 3]),
        ]);
        assert!(matches!(
            result,
            Err(DataError::ColumnLength { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_distinct_labels_are_sorted_and_skip_missing() {
        let dataset = sample();
        assert_eq!(
            dataset.view().distinct_labels(0),
            [GroupLabel::from("A"), GroupLabel::from("B"), GroupLabel::from("C")]
        );
    }

    #[test]
    fn test_filter_keeps_dataset_intact() {
        let dataset = sample();
        let view = dataset.view();
        let filtered = view.filter_labels(0, &[GroupLabel::from("A"), GroupLabel::from("C")]);
        assert_eq!(filtered.rows(), [1, 3, 4]);
        assert_eq!(view.len(), 5);
        assert_eq!(dataset.row_count(), 5);
        assert_eq!(
            filtered.distinct_labels(0),
            [GroupLabel::from("A"), GroupLabel::from("C")]
        );
    }

    #[test]
    fn test_numeric_values() {
        let dataset = sample();
        assert_eq!(
            dataset.view().numeric_values(1).unwrap(),
            [Some(1.0), Some(2.0), Some(3.0), None, None]
        );
        assert_eq!(dataset.view().observed_values(1).unwrap(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_numeric_column_fails_fast() {
        let dataset = sample();
        let err = dataset.view().numeric_values(0).unwrap_err();
        match err {
            DataError::NonNumeric { column, row, value } => {
                assert_eq!(column, "group");
                assert_eq!(row, 2);
                assert_eq!(value, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
