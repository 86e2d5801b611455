//! Spreadsheet cell values and grouping labels.

use std::{cmp::Ordering, fmt};

/// The cell holds a value that cannot be used as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("value is not numeric")]
pub struct NotNumeric;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

impl Cell {
    /// Interprets the cell as a number.
    ///
    /// Text is accepted when its trimmed content parses as a finite decimal.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - numeric cell
    /// * `Ok(None)` - missing cell
    /// * `Err(NotNumeric)` - anything else
    pub fn as_number(&self) -> Result<Option<f64>, NotNumeric> {
        match self {
            Cell::Number(n) if n.is_finite() => Ok(Some(*n)),
            Cell::Number(n) if n.is_nan() => Ok(None),
            Cell::Missing => Ok(None),
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(NotNumeric),
            },
            Cell::Number(_) | Cell::Bool(_) => Err(NotNumeric),
        }
    }

    /// The grouping label of this cell, or `None` if it is missing.
    #[must_use]
    pub fn label(&self) -> Option<GroupLabel> {
        match self {
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(GroupLabel::Number(if *n == 0.0 { 0.0 } else { *n })),
            Cell::Text(s) => Some(GroupLabel::Text(s.clone())),
            Cell::Bool(b) => Some(GroupLabel::Bool(*b)),
            Cell::Missing => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => fmt::Display::fmt(&label, f),
            None => f.write_str("<missing>"),
        }
    }
}

/// A non-missing value of a grouping column.
///
/// Labels are totally ordered: booleans first, then numbers, then text.
#[derive(Debug, Clone)]
pub enum GroupLabel {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl GroupLabel {
    fn rank(&self) -> u8 {
        match self {
            GroupLabel::Bool(_) => 0,
            GroupLabel::Number(_) => 1,
            GroupLabel::Text(_) => 2,
        }
    }
}

impl Ord for GroupLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupLabel::Bool(a), GroupLabel::Bool(b)) => a.cmp(b),
            (GroupLabel::Number(a), GroupLabel::Number(b)) => a.total_cmp(b),
            (GroupLabel::Text(a), GroupLabel::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupLabel {}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            // Integral spreadsheet numbers display without a fractional part.
            GroupLabel::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            GroupLabel::Number(n) => write!(f, "{n}"),
            GroupLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for GroupLabel {
    fn from(s: &str) -> Self {
        GroupLabel::Text(s.to_owned())
    }
}

impl From<f64> for GroupLabel {
    fn from(n: f64) -> Self {
        GroupLabel::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_number() {
        assert_eq!(Cell::Number(1.5).as_number(), Ok(Some(1.5)));
        assert_eq!(Cell::Number(f64::NAN).as_number(), Ok(None));
        assert_eq!(Cell::Missing.as_number(), Ok(None));
        assert_eq!(Cell::Text(" 2.25 ".into()).as_number(), Ok(Some(2.25)));
        assert_eq!(Cell::Text("abc".into()).as_number(), Err(NotNumeric));
        assert_eq!(Cell::Text("inf".into()).as_number(), Err(NotNumeric));
        assert_eq!(Cell::Bool(true).as_number(), Err(NotNumeric));
    }

    #[test]
    fn test_label_ordering() {
        let mut labels = vec![
            GroupLabel::from("b"),
            GroupLabel::from(2.0),
            GroupLabel::Bool(true),
            GroupLabel::from("a"),
            GroupLabel::from(-1.0),
        ];
        labels.sort();
        assert_eq!(
            labels,
            [
                GroupLabel::Bool(true),
                GroupLabel::from(-1.0),
                GroupLabel::from(2.0),
                GroupLabel::from("a"),
                GroupLabel::from("b"),
            ]
        );
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Cell::Number(-0.0).label(), Some(GroupLabel::from(0.0)));
    }

    #[test]
    fn test_label_display() {
        assert_eq!(GroupLabel::from(3.0).to_string(), "3");
        assert_eq!(GroupLabel::from(2.5).to_string(), "2.5");
        assert_eq!(GroupLabel::from("ctrl").to_string(), "ctrl");
        assert_eq!(GroupLabel::Bool(false).to_string(), "FALSE");
        assert_eq!(Cell::Missing.to_string(), "<missing>");
    }
}
