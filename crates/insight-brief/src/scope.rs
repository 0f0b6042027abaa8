//! Scope canonicalization
//!
//! A brief's `scope` arrives in one of several shapes:
//! - `{"type": "SKU", "value": "SKU-472"}` (structured)
//! - `"wireless earbuds"` (plain text)
//! - an object already in canonical shape
//! - anything else, including nothing at all
//!
//! [`ScopeInput::classify`] tags the raw value once and
//! [`ScopeInput::canonicalize`] resolves it into a [`CanonicalScope`].
//! Marketplaces, region and timeframe are always taken from the brief's
//! top-level siblings, never from inside `scope`.

use crate::json::{is_populated, render_text};
use crate::{UNKNOWN, UNSPECIFIED};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical scope record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Marketplaces in the order the client listed them
    pub marketplaces: Vec<String>,
    /// Product, SKU or category under analysis
    pub category_or_product: String,
    /// Geographic region
    pub region: String,
    /// Analysis window
    pub timeframe: String,
    /// Kind of scope (SKU, category, brand, ...)
    pub scope_type: String,
}

impl Scope {
    /// Build a scope from sibling fields, defaulting unset parts
    #[must_use]
    pub fn from_parts(
        siblings: ScopeSiblings,
        category_or_product: Option<String>,
        scope_type: Option<String>,
    ) -> Self {
        Self {
            marketplaces: siblings.marketplaces,
            category_or_product: category_or_product.unwrap_or_else(|| UNKNOWN.to_string()),
            region: siblings.region,
            timeframe: siblings.timeframe,
            scope_type: scope_type.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::from_parts(ScopeSiblings::default(), None, None)
    }
}

/// Top-level brief fields that feed a synthesized [`Scope`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSiblings {
    pub marketplaces: Vec<String>,
    pub region: String,
    pub timeframe: String,
}

impl ScopeSiblings {
    /// Read `marketplaces`, `region` and `timeframe` from a brief object
    ///
    /// A marketplace string becomes a one-element list. `null` or an unusable
    /// value falls back to the default.
    #[must_use]
    pub fn from_brief(brief: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            marketplaces: brief
                .get("marketplaces")
                .and_then(coerce_marketplaces)
                .unwrap_or(defaults.marketplaces),
            region: brief
                .get("region")
                .and_then(render_text)
                .unwrap_or(defaults.region),
            timeframe: brief
                .get("timeframe")
                .and_then(render_text)
                .unwrap_or(defaults.timeframe),
        }
    }
}

impl Default for ScopeSiblings {
    fn default() -> Self {
        Self {
            marketplaces: vec![UNKNOWN.to_string()],
            region: UNKNOWN.to_string(),
            timeframe: UNSPECIFIED.to_string(),
        }
    }
}

fn coerce_marketplaces(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => Some(items.iter().filter_map(render_text).collect()),
        _ => None,
    }
}

/// Raw `scope` value, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeInput {
    /// Object carrying a populated `type` and/or `value`
    Structured {
        scope_type: Option<String>,
        value: Option<String>,
    },
    /// Object with neither `type` nor `value` set; taken as already canonical
    Canonical(Map<String, Value>),
    /// Non-blank text naming the product or category (already trimmed)
    PlainText(String),
    /// Missing, blank, or of an unusable type
    Absent,
}

impl ScopeInput {
    /// Classify a raw `scope` value
    #[must_use]
    pub fn classify(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Object(map)) => {
                let scope_type = populated_text(map.get("type"));
                let value = populated_text(map.get("value"));
                if scope_type.is_none() && value.is_none() {
                    Self::Canonical(map.clone())
                } else {
                    Self::Structured { scope_type, value }
                }
            }
            Some(Value::String(text)) if !text.trim().is_empty() => {
                Self::PlainText(text.trim().to_string())
            }
            _ => Self::Absent,
        }
    }

    /// Resolve into canonical form
    #[must_use]
    pub fn canonicalize(self, siblings: ScopeSiblings) -> CanonicalScope {
        match self {
            Self::Canonical(map) => CanonicalScope::Supplied(map),
            Self::Structured { scope_type, value } => {
                CanonicalScope::Built(Scope::from_parts(siblings, value, scope_type))
            }
            Self::PlainText(text) => CanonicalScope::Built(Scope::from_parts(siblings, Some(text), None)),
            Self::Absent => CanonicalScope::Built(Scope::from_parts(siblings, None, None)),
        }
    }
}

fn populated_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_populated(v)).and_then(render_text)
}

/// Result of scope canonicalization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalScope {
    /// Synthesized by the normalizer; every field populated
    Built(Scope),
    /// Client-supplied object, passed through unchanged
    Supplied(Map<String, Value>),
}

impl CanonicalScope {
    /// The synthesized scope, if one was built
    #[inline]
    #[must_use]
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Self::Built(scope) => Some(scope),
            Self::Supplied(_) => None,
        }
    }

    /// Convert into a JSON value for storage in the brief
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Supplied(map) => Value::Object(map),
            Self::Built(scope) => {
                let mut map = Map::new();
                map.insert(
                    "marketplaces".to_string(),
                    Value::Array(scope.marketplaces.into_iter().map(Value::String).collect()),
                );
                map.insert(
                    "category_or_product".to_string(),
                    Value::String(scope.category_or_product),
                );
                map.insert("region".to_string(), Value::String(scope.region));
                map.insert("timeframe".to_string(), Value::String(scope.timeframe));
                map.insert("scope_type".to_string(), Value::String(scope.scope_type));
                Value::Object(map)
            }
        }
    }
}

/// Canonicalize `brief.scope` using the brief's sibling fields
#[must_use]
pub fn normalize_scope(brief: &Map<String, Value>) -> CanonicalScope {
    let siblings = ScopeSiblings::from_brief(brief);
    ScopeInput::classify(brief.get("scope")).canonicalize(siblings)
}
