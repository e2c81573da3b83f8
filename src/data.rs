use std::fmt;

use chrono::NaiveDate;

/// The only date layout accepted when detecting or coercing `datetime` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

/// A single table cell. `None` is the missing marker.
pub type Cell = Option<Value>;

impl Value {
    /// Renders the value the way it reads in its textual form.
    ///
    /// Floats always carry a decimal point (`3.0`), integers never do, which is
    /// what type detection relies on when deciding between `int` and `float`.
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }

    /// Parses the value as a number, returning `None` when it is not numeric.
    pub fn parse_number(&self) -> Option<f64> {
        match self {
            Value::String(s) => parse_number_str(s),
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Date(_) => None,
        }
    }

    /// Parses the value as a `YYYY-MM-DD` date.
    pub fn parse_date(&self) -> Option<NaiveDate> {
        match self {
            Value::String(s) => parse_naive_date(s),
            Value::Date(d) => Some(*d),
            Value::Integer(_) | Value::Float(_) => None,
        }
    }

    pub fn has_decimal_point(&self) -> bool {
        match self {
            Value::String(s) => s.contains('.'),
            Value::Integer(_) | Value::Date(_) => false,
            Value::Float(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// Plain decimal notation, never exponent form; integral values keep `.0`.
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

pub fn parse_number_str(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub fn parse_naive_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Trims surrounding whitespace and joins internal words with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Renders a cell for text output; missing cells become an empty string.
pub fn render_cell(cell: &Cell) -> String {
    cell.as_ref().map(Value::as_display).unwrap_or_default()
}
