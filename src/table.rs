//! In-memory table model shared by the loader, the cleaner, and the writer.
//!
//! A [`Table`] is an ordered list of named [`Column`]s whose cells line up by
//! row index. Columns carry loosely-typed cells before cleaning and exactly
//! one semantic type afterwards.

use itertools::Itertools;
use thiserror::Error;

use crate::data::{Cell, Value, render_cell};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Column '{name}' has {found} row(s) but the table has {expected}")]
    RaggedColumns {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("Row {row} has {found} field(s) but the header defines {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn non_missing(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(name) = columns.iter().map(|column| &column.name).duplicates().next() {
            return Err(TableError::DuplicateColumn(name.clone()));
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(column) = columns.iter().find(|column| column.len() != expected) {
                return Err(TableError::RaggedColumns {
                    name: column.name.clone(),
                    expected,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Builds a table from row-major cells, as produced by a record reader.
    pub fn from_rows(headers: &[String], rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        let mut columns = headers
            .iter()
            .map(|name| Column::new(name.clone(), Vec::with_capacity(rows.len())))
            .collect::<Vec<_>>();
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(TableError::RowWidth {
                    row: row_idx,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.cells.push(cell);
            }
        }
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Renders every row as text fields in column order.
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.row_count()).map(move |row| {
            self.columns
                .iter()
                .map(|column| render_cell(&column.cells[row]))
                .collect()
        })
    }
}
