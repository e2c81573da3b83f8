#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use sheet_cleaner::{Cell, Column, Table, Value};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Builds string cells, with `None` as the missing marker.
pub fn cells(values: &[Option<&str>]) -> Vec<Cell> {
    values.iter().map(|value| value.map(Value::from)).collect()
}

pub fn column(name: &str, values: &[Option<&str>]) -> Column {
    Column::new(name, cells(values))
}

/// A small spreadsheet-like export mixing numbers, dates, text and blanks.
pub fn orders_table() -> Table {
    Table::new(vec![
        column("order id", &[Some("1"), Some("2"), Some("3"), Some("4")]),
        column(" price ", &[Some("10"), None, Some("12"), Some("abc")]),
        column(
            "shipped",
            &[Some("2024-01-01"), None, Some("2024-02-29"), Some("2024-03-15")],
        ),
        column("weight", &[Some("1.5"), Some("2"), None, Some("0.25")]),
        column("notes", &[None, Some("fragile"), Some("3"), None]),
        column("empty", &[None, None, None, None]),
    ])
    .expect("orders table")
}
