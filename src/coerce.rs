//! Missing-value filling and per-column type coercion.
//!
//! Coercion never fails outward. Cells that do not parse take the target
//! type's default (`0`, `0.0`, or a missing date). A value that parses but
//! cannot be stored in the target representation aborts the typed path for
//! the whole column, which is then rendered as text instead.

use log::warn;
use thiserror::Error;

use crate::{
    data::{Cell, Value},
    schema::SemanticType,
    table::Column,
};

#[derive(Debug, Error, PartialEq)]
pub enum CoerceError {
    #[error("value '{value}' at row {row} does not fit in a 64-bit integer")]
    IntegerOutOfRange { row: usize, value: String },
}

/// Replaces missing cells with the default for `ty`. Date columns keep their gaps.
pub fn fill_missing(cells: &[Cell], ty: SemanticType) -> Vec<Cell> {
    let default = match ty {
        SemanticType::Int => Some(Value::Integer(0)),
        SemanticType::Float => Some(Value::Float(0.0)),
        SemanticType::Text => Some(Value::String(String::new())),
        SemanticType::DateTime => None,
    };
    cells
        .iter()
        .map(|cell| cell.clone().or_else(|| default.clone()))
        .collect()
}

pub fn coerce_cells(cells: &[Cell], ty: SemanticType) -> Result<Vec<Cell>, CoerceError> {
    match ty {
        SemanticType::Int => cells
            .iter()
            .enumerate()
            .map(|(row, cell)| -> Result<Cell, CoerceError> {
                let parsed = match cell {
                    Some(value) => integer_value(value)
                        .map_err(|_| CoerceError::IntegerOutOfRange {
                            row,
                            value: value.as_display(),
                        })?,
                    None => None,
                };
                Ok(Some(Value::Integer(parsed.unwrap_or(0))))
            })
            .collect(),
        SemanticType::Float => Ok(cells
            .iter()
            .map(|cell| Some(Value::Float(cell.as_ref().and_then(float_value).unwrap_or(0.0))))
            .collect()),
        SemanticType::DateTime => Ok(cells
            .iter()
            .map(|cell| cell.as_ref().and_then(Value::parse_date).map(Value::Date))
            .collect()),
        SemanticType::Text => Ok(render_text(cells)),
    }
}

/// Fills, coerces, and falls back to text when the typed path fails.
pub fn clean_column(column: &Column, ty: SemanticType) -> Column {
    let filled = fill_missing(&column.cells, ty);
    let cells = match coerce_cells(&filled, ty) {
        Ok(cells) => cells,
        Err(err) => {
            warn!(
                "Column '{}' could not be coerced to {ty} ({err}); keeping it as text",
                column.name
            );
            render_text(&filled)
        }
    };
    Column::new(column.name.clone(), cells)
}

pub fn render_text(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| {
            let text = cell.as_ref().map(Value::as_display).unwrap_or_default();
            Some(Value::String(text))
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct OutOfRange;

/// `Ok(None)` means the value is not numeric and should take the default.
pub(crate) fn integer_value(value: &Value) -> Result<Option<i64>, OutOfRange> {
    match value {
        Value::Integer(i) => Ok(Some(*i)),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => value.parse_number().map_or(Ok(None), truncate_to_i64),
        },
        Value::Float(f) => truncate_to_i64(*f),
        Value::Date(_) => Ok(None),
    }
}

pub(crate) fn float_value(value: &Value) -> Option<f64> {
    value.parse_number().filter(|parsed| !parsed.is_nan())
}

fn truncate_to_i64(value: f64) -> Result<Option<i64>, OutOfRange> {
    if value.is_nan() {
        return Ok(None);
    }
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(OutOfRange);
    }
    Ok(Some(value.trunc() as i64))
}
