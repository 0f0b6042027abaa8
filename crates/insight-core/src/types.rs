//! Core types for the analysis pipeline
//!
//! Defines:
//! - The analyze request and its defaults
//! - The outward result record
//! - The opaque memory mapping

use crate::error::StoreError;
use crate::store;
use insight_brief::Brief;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Default memory file, relative to the project root
pub const DEFAULT_MEMORY_PATH: &str = "data/domain_memory.json";

/// Default data source directory, relative to the project root
pub const DEFAULT_SOURCE_BASE_DIR: &str = "datasets/processed";

/// Inbound analyze request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Research brief as submitted
    pub brief: Brief,
    /// Whether to fold this run into memory
    #[serde(default)]
    pub update_memory: bool,
    /// Memory file, relative to the project root or absolute
    #[serde(default = "default_memory_path")]
    pub memory_path: String,
    /// Data source directory, relative to the project root or absolute
    #[serde(default = "default_source_base_dir")]
    pub source_base_dir: String,
    /// Report destination, relative to the project root or absolute
    #[serde(default)]
    pub output_path: Option<String>,
}

impl AnalyzeRequest {
    /// Request with default paths and no side effects
    #[must_use]
    pub fn new(brief: Brief) -> Self {
        Self {
            brief,
            update_memory: false,
            memory_path: default_memory_path(),
            source_base_dir: default_source_base_dir(),
            output_path: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_update_memory(mut self, update: bool) -> Self {
        self.update_memory = update;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_memory_path(mut self, path: impl Into<String>) -> Self {
        self.memory_path = path.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_source_base_dir(mut self, path: impl Into<String>) -> Self {
        self.source_base_dir = path.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

fn default_memory_path() -> String {
    DEFAULT_MEMORY_PATH.to_string()
}

fn default_source_base_dir() -> String {
    DEFAULT_SOURCE_BASE_DIR.to_string()
}

/// Outward result of a successful analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub status: String,
    pub mode: String,
    pub business_goal: String,
    pub report: String,
    pub memory_updated: bool,
    pub output_path: Option<String>,
}

impl AnalyzeResult {
    /// Assemble the success record for a validated brief
    #[must_use]
    pub fn success(
        brief: &Brief,
        report: String,
        memory_updated: bool,
        output_path: Option<&Path>,
    ) -> Self {
        Self {
            status: "success".to_string(),
            mode: brief.mode().unwrap_or_default(),
            business_goal: brief.business_goal().unwrap_or_default(),
            report,
            memory_updated,
            output_path: output_path.map(|p| p.display().to_string()),
        }
    }
}

/// Engine-owned memory, opaque to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memory(Map<String, Value>);

impl Memory {
    #[inline]
    #[must_use]
    pub fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    /// Load from `path`, or start empty if the file does not exist
    ///
    /// # Errors
    /// Any [`StoreError`] from reading an existing file.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        if store::exists(path).await {
            store::read_json(path).await.map(Self)
        } else {
            Ok(Self::default())
        }
    }

    /// Overwrite `path` with this memory
    ///
    /// # Errors
    /// Any [`StoreError`] from writing.
    pub async fn persist(&self, path: &Path) -> Result<(), StoreError> {
        store::write_json(path, &self.0).await
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    #[inline]
    pub fn entry(&mut self, key: impl Into<String>) -> serde_json::map::Entry<'_> {
        self.0.entry(key)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
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

impl From<Map<String, Value>> for Memory {
    fn from(entries: Map<String, Value>) -> Self {
        Self(entries)
    }
}
