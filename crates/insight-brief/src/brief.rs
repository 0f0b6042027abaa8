//! The research brief
//!
//! A [`Brief`] wraps the client's JSON object. Keys outside the canonical set
//! are carried through untouched so the engine can see them.

use crate::json::echo_text;
use crate::scope::normalize_scope;
use crate::sources::{normalize_data_sources, DataSources};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that must be present once the brief is normalized
pub const REQUIRED_FIELDS: [&str; 4] = ["mode", "business_goal", "scope", "data_sources"];

/// Client-submitted research brief
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Brief(Map<String, Value>);

impl Brief {
    #[inline]
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Canonicalize `scope` and `data_sources` in place
    ///
    /// Both keys are always present afterwards. Existing keys keep their
    /// position; other keys are untouched.
    pub fn normalize(&mut self) {
        let scope = normalize_scope(&self.0);
        let sources = normalize_data_sources(self.0.get("data_sources"));
        self.0.insert("scope".to_string(), scope.into_value());
        self.0.insert("data_sources".to_string(), sources.into_value());
    }

    /// Consuming form of [`Brief::normalize`]
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Required keys absent from the brief, in [`REQUIRED_FIELDS`] order
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| !self.0.contains_key(**field))
            .map(|field| (*field).to_string())
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Requested analysis mode, rendered as text
    #[must_use]
    pub fn mode(&self) -> Option<String> {
        self.0.get("mode").map(echo_text)
    }

    /// Stated business goal, rendered as text
    #[must_use]
    pub fn business_goal(&self) -> Option<String> {
        self.0.get("business_goal").map(echo_text)
    }

    /// The scope object, once normalized
    #[must_use]
    pub fn scope(&self) -> Option<&Map<String, Value>> {
        self.0.get("scope").and_then(Value::as_object)
    }

    /// Data source entries, re-read from the stored value
    #[must_use]
    pub fn data_sources(&self) -> Option<DataSources> {
        self.0
            .get("data_sources")
            .filter(|value| value.is_object())
            .map(|value| normalize_data_sources(Some(value)))
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Brief {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
