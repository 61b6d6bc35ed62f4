//! The in-memory typed table handed to the CSV, chart, and HTML consumers.
//!
//! Built once per fetch cycle and immutable afterwards; consumers only read.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::BuildError;
use crate::normalize;

/// One typed table cell. Columns designated numeric carry floats; everything
/// else stays text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            Cell::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(value) => write!(f, "{}", value),
        }
    }
}

/// Which column indices carry locale-formatted numbers. Typing is positional
/// and fixed by the known page layout, never inferred from cell contents.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    pub numeric: Vec<usize>,
    pub percent: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Number,
    Percent,
}

impl ColumnSpec {
    fn kind(&self, index: usize) -> ColumnKind {
        if self.percent.contains(&index) {
            ColumnKind::Percent
        } else if self.numeric.contains(&index) {
            ColumnKind::Number
        } else {
            ColumnKind::Text
        }
    }

    fn max_index(&self) -> Option<usize> {
        self.numeric.iter().chain(self.percent.iter()).copied().max()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDataset {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
    skipped_rows: usize,
    index_by_name: HashMap<String, usize>,
}

/// Types the raw rows against the header. Rows with a mismatched cell count
/// or a non-numeric cell in a numeric column are excluded, logged, and
/// counted; the build itself never aborts over one bad row.
pub fn build(
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: &ColumnSpec,
) -> Result<QuoteDataset, BuildError> {
    if header.is_empty() {
        return Err(BuildError::EmptyHeader);
    }
    if let Some(index) = columns.max_index() {
        if index >= header.len() {
            return Err(BuildError::ColumnOutOfRange {
                index,
                width: header.len(),
            });
        }
    }

    let index_by_name = header
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect();

    let mut kept = Vec::with_capacity(rows.len());
    let mut skipped_rows = 0;

    'rows: for (row_index, raw) in rows.into_iter().enumerate() {
        if raw.len() != header.len() {
            warn!(
                row = row_index,
                cells = raw.len(),
                expected = header.len(),
                "skipping row with mismatched cell count"
            );
            skipped_rows += 1;
            continue;
        }
        let mut cells = Vec::with_capacity(raw.len());
        for (column, text) in raw.into_iter().enumerate() {
            let kind = columns.kind(column);
            if kind == ColumnKind::Text {
                cells.push(Cell::Text(text));
                continue;
            }
            match normalize::normalize(&text, kind == ColumnKind::Percent) {
                Ok(number) => cells.push(Cell::Number(number.value)),
                Err(err) => {
                    warn!(row = row_index, column, %err, "skipping row with non-numeric cell");
                    skipped_rows += 1;
                    continue 'rows;
                }
            }
        }
        kept.push(cells);
    }

    Ok(QuoteDataset {
        header,
        rows: kept,
        skipped_rows,
        index_by_name,
    })
}

impl QuoteDataset {
    pub fn header(&self) -> &[String] {
        &self.header
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

    /// Rows excluded during construction. Always reported, never silent.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.header.get(index).map(String::as_str)
    }

    /// First column: the instrument/index names, used as chart categories.
    pub fn category_column(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row[0].as_text().unwrap_or_default())
            .collect()
    }

    /// Values of a numeric column, in source row order. `None` when the name
    /// is unknown or the column was not typed numeric.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.column_index(name)?;
        self.rows.iter().map(|row| row[index].as_number()).collect()
    }

    /// Text of a pass-through column. `None` when the name is unknown or the
    /// column was typed numeric.
    pub fn text_column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        self.rows.iter().map(|row| row[index].as_text()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ColumnSpec {
        ColumnSpec {
            numeric: vec![1, 2],
            percent: vec![3],
        }
    }

    fn header() -> Vec<String> {
        ["Moeda", "Compra", "Venda", "Variação"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn types_numeric_columns_and_keeps_text() {
        let rows = vec![vec![
            "Dólar".to_string(),
            "5.123,45".to_string(),
            "5.150,00".to_string(),
            "-1,20%".to_string(),
        ]];
        let dataset = build(header(), rows, &spec()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows(), 0);
        assert_eq!(
            dataset.rows()[0],
            vec![
                Cell::Text("Dólar".into()),
                Cell::Number(5123.45),
                Cell::Number(5150.00),
                Cell::Number(-1.20),
            ]
        );
    }

    #[test]
    fn bad_numeric_cell_drops_only_that_row() {
        let rows = vec![
            vec!["Dólar".into(), "5,43".into(), "5,44".into(), "0,10%".into()],
            vec!["Euro".into(), "-".into(), "6,12".into(), "0,20%".into()],
        ];
        let dataset = build(header(), rows, &spec()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows(), 1);
        assert_eq!(dataset.text_column("Moeda"), Some(vec!["Dólar"]));
    }

    #[test]
    fn mismatched_cell_count_is_excluded_and_counted() {
        let rows = vec![
            vec!["Dólar".into(), "5,43".into(), "5,44".into(), "0,10%".into()],
            vec!["Euro".into(), "6,12".into()],
        ];
        let dataset = build(header(), rows, &spec()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows(), 1);
    }

    #[test]
    fn named_accessors_resolve_through_the_header() {
        let rows = vec![vec![
            "Dólar".into(),
            "5,43".into(),
            "5,44".into(),
            "-0,75%".into(),
        ]];
        let dataset = build(header(), rows, &spec()).unwrap();
        assert_eq!(dataset.numeric_column("Variação"), Some(vec![-0.75]));
        assert_eq!(dataset.numeric_column("Moeda"), None);
        assert_eq!(dataset.numeric_column("Inexistente"), None);
        assert_eq!(dataset.category_column(), vec!["Dólar"]);
    }

    #[test]
    fn numeric_column_out_of_header_range_fails_construction() {
        let columns = ColumnSpec {
            numeric: vec![7],
            percent: vec![],
        };
        let err = build(header(), Vec::new(), &columns).unwrap_err();
        assert_eq!(err, BuildError::ColumnOutOfRange { index: 7, width: 4 });
    }

    #[test]
    fn empty_header_is_rejected() {
        assert_eq!(
            build(Vec::new(), Vec::new(), &ColumnSpec::default()).unwrap_err(),
            BuildError::EmptyHeader
        );
    }

    #[test]
    fn row_order_follows_the_source() {
        let rows = vec![
            vec!["B".into(), "2,0".into(), "2,0".into(), "0,1%".into()],
            vec!["A".into(), "1,0".into(), "1,0".into(), "0,2%".into()],
        ];
        let dataset = build(header(), rows, &spec()).unwrap();
        assert_eq!(dataset.category_column(), vec!["B", "A"]);
    }
}
