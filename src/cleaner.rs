//! Table-level cleaning pipeline.
//!
//! A [`Cleaner`] borrows the source table and owns a working copy. Each call
//! to [`Cleaner::clean`] starts again from a fresh copy of the source:
//!
//! 1. resolve each column's type (explicit mapping first, detection otherwise)
//! 2. fill and coerce the column
//! 3. re-assert integer/float storage on numeric columns
//! 4. normalize column names (trim, spaces to underscores)
//!
//! The source table is never modified.

use std::{collections::HashSet, path::Path};

use anyhow::Result;
use log::{debug, info, warn};

use crate::{
    coerce::{clean_column, float_value, integer_value},
    data::{Value, normalize_column_name},
    detect::detect,
    io_utils::{self, WriteOptions},
    schema::{SemanticType, TypeMapping},
    table::{Column, Table},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanState {
    Uncleaned,
    Cleaned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    Mapping,
    Detected,
}

#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Trim column names and replace internal spaces with underscores.
    pub normalize_headers: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            normalize_headers: true,
        }
    }
}

/// How one column was resolved during the last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub name: String,
    pub output_name: String,
    pub semantic_type: SemanticType,
    pub source: TypeSource,
}

pub struct Cleaner<'a> {
    source: &'a Table,
    mapping: TypeMapping,
    options: CleanOptions,
    cleaned: Table,
    resolved: Vec<ResolvedColumn>,
    state: CleanState,
}

impl<'a> Cleaner<'a> {
    pub fn new(source: &'a Table, mapping: TypeMapping) -> Self {
        Self {
            source,
            mapping,
            options: CleanOptions::default(),
            cleaned: source.clone(),
            resolved: Vec::new(),
            state: CleanState::Uncleaned,
        }
    }

    pub fn with_options(mut self, options: CleanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn clean(&mut self) -> &mut Self {
        let mut working = self.source.clone();
        for (name, _) in self.mapping.iter() {
            if working.column(name).is_none() {
                warn!("Type mapping names unknown column '{name}'");
            }
        }

        let mut resolved = working
            .columns()
            .iter()
            .map(|column| self.resolve(column))
            .collect::<Vec<_>>();

        for (column, resolution) in working.columns_mut().iter_mut().zip(&resolved) {
            *column = clean_column(column, resolution.semantic_type);
            enforce_storage(column, resolution.semantic_type);
        }

        if self.options.normalize_headers {
            normalize_headers(&mut working, &mut resolved);
        }

        info!(
            "Cleaned {} column(s) across {} row(s)",
            working.column_count(),
            working.row_count()
        );
        self.cleaned = working;
        self.resolved = resolved;
        self.state = CleanState::Cleaned;
        self
    }

    /// The cleaned table, or the untouched copy if `clean` has not run yet.
    pub fn clean_data(&self) -> &Table {
        &self.cleaned
    }

    pub fn state(&self) -> CleanState {
        self.state
    }

    pub fn resolved_columns(&self) -> &[ResolvedColumn] {
        &self.resolved
    }

    pub fn save(&self, path: &Path, options: &WriteOptions) -> Result<&Self> {
        io_utils::write_table(&self.cleaned, Some(path), options)?;
        info!("Cleaned data written to {path:?}");
        Ok(self)
    }

    /// Cleans and hands back the resulting table.
    pub fn run(mut self) -> Table {
        self.clean();
        self.cleaned
    }

    fn resolve(&self, column: &Column) -> ResolvedColumn {
        let (semantic_type, source) = match self.mapping.get(&column.name) {
            Some(ty) => (ty, TypeSource::Mapping),
            None => (detect(&column.cells), TypeSource::Detected),
        };
        debug!(
            "Column '{}' resolved to {semantic_type} ({source:?})",
            column.name
        );
        ResolvedColumn {
            name: column.name.clone(),
            output_name: column.name.clone(),
            semantic_type,
            source,
        }
    }
}

pub fn clean_table(table: &Table, mapping: TypeMapping) -> Table {
    Cleaner::new(table, mapping).run()
}

/// Ensures numeric columns hold only their canonical storage variant.
fn enforce_storage(column: &mut Column, ty: SemanticType) {
    if !ty.is_numeric() {
        return;
    }
    let mut retyped = 0usize;
    for cell in &mut column.cells {
        let replacement = match (ty, &*cell) {
            (SemanticType::Int, Some(Value::Integer(_)))
            | (SemanticType::Float, Some(Value::Float(_))) => continue,
            (SemanticType::Int, other) => Value::Integer(
                other
                    .as_ref()
                    .and_then(|value| integer_value(value).ok().flatten())
                    .unwrap_or(0),
            ),
            (_, other) => Value::Float(other.as_ref().and_then(float_value).unwrap_or(0.0)),
        };
        *cell = Some(replacement);
        retyped += 1;
    }
    if retyped > 0 {
        warn!(
            "Re-typed {retyped} cell(s) in column '{}' as {ty}",
            column.name
        );
    }
}

fn normalize_headers(table: &mut Table, resolved: &mut [ResolvedColumn]) {
    let mut taken = table
        .columns()
        .iter()
        .map(|column| column.name.clone())
        .collect::<HashSet<_>>();
    for (column, resolution) in table.columns_mut().iter_mut().zip(resolved) {
        let renamed = normalize_column_name(&column.name);
        if renamed == column.name {
            continue;
        }
        if taken.contains(&renamed) {
            warn!(
                "Keeping column name '{}' because '{renamed}' is already in use",
                column.name
            );
            continue;
        }
        taken.remove(&column.name);
        taken.insert(renamed.clone());
        resolution.output_name = renamed.clone();
        column.name = renamed;
    }
}
