//! In-memory tabular frame shared by the loader, joiner, and reconciler.
//!
//! A [`Frame`] is an ordered list of column names plus rows of nullable text
//! cells. Cells stay textual until the derivation stage types them; an empty
//! source cell loads as `None`. Transformations return new frames rather than
//! mutating the input.

use std::fmt;

pub type Cell = Option<String>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Builds a frame, padding short rows with nulls and truncating long ones.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor used heavily by tests: empty strings become nulls.
    pub fn from_strings<'a, R>(headers: &[&str], rows: &[R]) -> Self
    where
        R: AsRef<[&'a str]>,
    {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|cell| non_empty(cell)).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Values of one column in row order, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    pub fn rename_column(&self, from: &str, to: &str) -> Frame {
        let headers = self
            .headers
            .iter()
            .map(|h| if h == from { to.to_string() } else { h.clone() })
            .collect();
        Frame {
            headers,
            rows: self.rows.clone(),
        }
    }

    pub fn drop_column(&self, name: &str) -> Frame {
        let Some(idx) = self.column_index(name) else {
            return self.clone();
        };
        let mut headers = self.headers.clone();
        headers.remove(idx);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.remove(idx);
                row
            })
            .collect();
        Frame { headers, rows }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row(s) x [{}]", self.rows.len(), self.headers.join(", "))
    }
}

pub(crate) fn non_empty(value: &str) -> Cell {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pads_short_rows_with_nulls() {
        let frame = Frame::new(
            vec!["a".into(), "b".into()],
            vec![vec![Some("1".into())]],
        );
        assert_eq!(frame.rows()[0], vec![Some("1".to_string()), None]);
    }

    #[test]
    fn rename_and_drop_leave_source_untouched() {
        let frame = Frame::from_strings(&["id", "unit_price"], &[&["1", "9.5"]]);
        let renamed = frame.rename_column("unit_price", "price");
        let dropped = renamed.drop_column("id");

        assert_eq!(frame.headers(), ["id", "unit_price"]);
        assert_eq!(renamed.headers(), ["id", "price"]);
        assert_eq!(dropped.headers(), ["price"]);
        assert_eq!(dropped.cell(0, 0), Some("9.5"));
    }

    #[test]
    fn from_strings_treats_blank_cells_as_null() {
        let frame = Frame::from_strings(&["q"], &[&[" "], &["2"]]);
        assert_eq!(frame.column("q").unwrap(), vec![None, Some("2")]);
    }
}
