//! Semantic column types and the explicit per-column type mapping.
//!
//! [`SemanticType`] is the closed set of logical types a cleaned column can
//! hold. [`TypeMapping`] pins a column to one of them, overriding detection
//! for that column only. Mappings are built from `name:type` specs on the
//! command line or loaded from YAML/JSON files written by `probe`.

use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Int,
    Float,
    DateTime,
    Text,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Unknown column type '{0}'. Supported types: int, float, datetime, text")]
    UnknownType(String),
    #[error("Column definition '{0}' must use the form name:type")]
    MissingSeparator(String),
    #[error("Column name cannot be empty in definition '{0}'")]
    EmptyName(String),
    #[error("Duplicate column name '{0}' provided")]
    DuplicateColumn(String),
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::DateTime => "datetime",
            SemanticType::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, SemanticType::Int | SemanticType::Float)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = MappingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "int" | "integer" | "int64" => Ok(SemanticType::Int),
            "float" | "double" | "float64" => Ok(SemanticType::Float),
            "datetime" | "date" | "timestamp" => Ok(SemanticType::DateTime),
            "text" | "string" | "str" | "object" => Ok(SemanticType::Text),
            _ => Err(MappingError::UnknownType(value.to_string())),
        }
    }
}

impl Serialize for SemanticType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        SemanticType::from_str(&token).map_err(de::Error::custom)
    }
}

/// Explicit column-name to type overrides, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMapping {
    columns: IndexMap<String, SemanticType>,
}

impl TypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.insert(name, ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: SemanticType) -> Option<SemanticType> {
        self.columns.insert(name.into(), ty)
    }

    pub fn get(&self, name: &str) -> Option<SemanticType> {
        self.columns.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SemanticType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Entries from `other` replace entries already present.
    pub fn merge(&mut self, other: TypeMapping) {
        self.columns.extend(other.columns);
    }

    /// Parses repeatable, comma-separated `name:type` definitions.
    pub fn from_specs(specs: &[String]) -> Result<Self, MappingError> {
        let mut mapping = TypeMapping::new();
        for raw in specs {
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let (name_part, type_part) = token
                    .rsplit_once(':')
                    .ok_or_else(|| MappingError::MissingSeparator(token.to_string()))?;
                let name = name_part.trim();
                if name.is_empty() {
                    return Err(MappingError::EmptyName(token.to_string()));
                }
                let ty = SemanticType::from_str(type_part)?;
                if mapping.insert(name, ty).is_some() {
                    return Err(MappingError::DuplicateColumn(name.to_string()));
                }
            }
        }
        Ok(mapping)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening type mapping {path:?}"))?;
        let reader = BufReader::new(file);
        if is_json(path) {
            serde_json::from_reader(reader).context("Parsing type mapping JSON")
        } else {
            serde_yaml::from_reader(reader).context("Parsing type mapping YAML")
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating type mapping {path:?}"))?;
        if is_json(path) {
            self.write_json(file)
        } else {
            serde_yaml::to_writer(file, self).context("Writing type mapping YAML")
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing type mapping to YAML")
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).context("Writing type mapping JSON")?;
        writeln!(writer).context("Writing type mapping JSON")
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
