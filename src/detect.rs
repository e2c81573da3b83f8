//! Column type detection.
//!
//! Only non-missing cells count as evidence. The preference order is numeric
//! (`float` when any value is written with a decimal point, otherwise `int`),
//! then `datetime`, then `text`.

use crate::{
    data::{Cell, Value},
    schema::SemanticType,
};

/// Per-column tally of what the non-missing values parse as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnProfile {
    pub non_missing: usize,
    pub numeric_matches: usize,
    pub decimal_matches: usize,
    pub date_matches: usize,
    pub sample: Option<String>,
}

impl ColumnProfile {
    fn update(&mut self, value: &Value) {
        self.non_missing += 1;
        if self.sample.is_none() {
            self.sample = Some(value.as_display());
        }
        if value.parse_number().is_some() {
            self.numeric_matches += 1;
            if value.has_decimal_point() {
                self.decimal_matches += 1;
            }
        } else if value.parse_date().is_some() {
            self.date_matches += 1;
        }
    }

    pub fn decide(&self) -> SemanticType {
        if self.non_missing == 0 {
            return SemanticType::Text;
        }
        if self.numeric_matches == self.non_missing {
            if self.decimal_matches > 0 {
                SemanticType::Float
            } else {
                SemanticType::Int
            }
        } else if self.date_matches == self.non_missing {
            SemanticType::DateTime
        } else {
            SemanticType::Text
        }
    }
}

pub fn profile(cells: &[Cell]) -> ColumnProfile {
    let mut profile = ColumnProfile::default();
    for value in cells.iter().flatten() {
        profile.update(value);
    }
    profile
}

pub fn detect(cells: &[Cell]) -> SemanticType {
    profile(cells).decide()
}
