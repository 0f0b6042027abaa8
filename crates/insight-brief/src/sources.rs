//! Data source canonicalization
//!
//! `data_sources` is accepted as a named object (`{"catalog": "catalog.json"}`)
//! or as a positional array matched against [`POSITIONAL_KEYS`]. Either way
//! the result is a [`DataSources`] map whose string entries have been wrapped
//! as `{"path": ...}`.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Source names assigned, in order, to positional `data_sources` entries
pub const POSITIONAL_KEYS: [&str; 5] = [
    "catalog",
    "reviews",
    "pricing",
    "competitors",
    "performance_signals",
];

/// One named data source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataSourceEntry {
    /// Bare path supplied as a string
    Reference { path: String },
    /// Client-structured entry, kept verbatim
    Detailed(Value),
}

impl DataSourceEntry {
    /// Wrap strings as references; keep everything else verbatim
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(path) => Self::Reference { path },
            other => Self::Detailed(other),
        }
    }

    /// Path of the dataset, when the entry names one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Reference { path } => Some(path),
            Self::Detailed(value) => value.get("path").and_then(Value::as_str),
        }
    }

    /// Convert into a JSON value for storage in the brief
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Reference { path } => {
                let mut map = Map::new();
                map.insert("path".to_string(), Value::String(path));
                Value::Object(map)
            }
            Self::Detailed(value) => value,
        }
    }
}

/// Canonical `data_sources`: source name to entry, in client order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataSources(IndexMap<String, DataSourceEntry>);

impl DataSources {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataSourceEntry> {
        self.0.get(name)
    }

    /// Source names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataSourceEntry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Convert into a JSON object for storage in the brief
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(
            self.0
                .into_iter()
                .map(|(name, entry)| (name, entry.into_value()))
                .collect(),
        )
    }
}

impl FromIterator<(String, DataSourceEntry)> for DataSources {
    fn from_iter<I: IntoIterator<Item = (String, DataSourceEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Raw `data_sources` value, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum DataSourcesInput {
    Named(Map<String, Value>),
    Positional(Vec<Value>),
    Absent,
}

impl DataSourcesInput {
    #[must_use]
    pub fn classify(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Object(map)) => Self::Named(map.clone()),
            Some(Value::Array(items)) => Self::Positional(items.clone()),
            _ => Self::Absent,
        }
    }

    /// Resolve into canonical form
    ///
    /// Positional entries past the last key in [`POSITIONAL_KEYS`] are dropped.
    #[must_use]
    pub fn canonicalize(self) -> DataSources {
        match self {
            Self::Named(map) => map
                .into_iter()
                .map(|(name, value)| (name, DataSourceEntry::from_value(value)))
                .collect(),
            Self::Positional(items) => {
                if items.len() > POSITIONAL_KEYS.len() {
                    tracing::debug!(
                        supplied = items.len(),
                        kept = POSITIONAL_KEYS.len(),
                        "dropping positional data sources without a key"
                    );
                }
                POSITIONAL_KEYS
                    .iter()
                    .zip(items)
                    .map(|(name, value)| ((*name).to_string(), DataSourceEntry::from_value(value)))
                    .collect()
            }
            Self::Absent => DataSources::default(),
        }
    }
}

/// Canonicalize a raw `data_sources` value
#[must_use]
pub fn normalize_data_sources(raw: Option<&Value>) -> DataSources {
    DataSourcesInput::classify(raw).canonicalize()
}
