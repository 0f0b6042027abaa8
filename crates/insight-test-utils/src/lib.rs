//! Testing utilities for the insight workspace
//!
//! Shared fakes, fixtures, and builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use insight_brief::Brief;
use insight_core::{
    AnalysisEngine, AnalysisOrchestrator, EngineError, Memory, MemoryCurator, ProjectRoot,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// What a [`FakeEngine`] does when called
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Report(String),
    Fail(EngineError),
}

/// Engine that records its calls and answers with a fixed outcome
#[derive(Debug)]
pub struct FakeEngine {
    outcome: FakeOutcome,
    calls: Mutex<Vec<EngineCall>>,
}

/// One recorded engine invocation
#[derive(Debug, Clone)]
pub struct EngineCall {
    pub brief: Brief,
    pub memory: Memory,
    pub root_dir: PathBuf,
}

impl FakeEngine {
    pub fn reporting(report: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            outcome: FakeOutcome::Report(report.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: EngineError) -> Arc<Self> {
        Arc::new(Self {
            outcome: FakeOutcome::Fail(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl AnalysisEngine for FakeEngine {
    async fn run_analysis(
        &self,
        brief: &Brief,
        memory: &Memory,
        root_dir: &Path,
    ) -> Result<String, EngineError> {
        self.calls.lock().push(EngineCall {
            brief: brief.clone(),
            memory: memory.clone(),
            root_dir: root_dir.to_path_buf(),
        });
        match &self.outcome {
            FakeOutcome::Report(report) => Ok(report.clone()),
            FakeOutcome::Fail(error) => Err(error.clone()),
        }
    }
}

/// Curator that counts updates in `memory.updates` and records the last goal
#[derive(Debug, Default)]
pub struct CountingCurator;

#[async_trait]
impl MemoryCurator for CountingCurator {
    async fn update_memory(&self, mut memory: Memory, brief: &Brief) -> Result<Memory, EngineError> {
        let updates = memory.get("updates").and_then(Value::as_u64).unwrap_or(0);
        memory.insert("updates", json!(updates + 1));
        memory.insert("last_goal", json!(brief.business_goal()));
        Ok(memory)
    }
}

/// Temporary project root with helpers for seeding files
#[derive(Debug)]
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn project_root(&self) -> ProjectRoot {
        ProjectRoot::new(self.dir.path())
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write_json(&self, relative: &str, value: &Value) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
        path
    }

    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_slice(&std::fs::read(self.path(relative)).unwrap()).unwrap()
    }

    pub fn orchestrator(
        &self,
        engine: Arc<dyn AnalysisEngine>,
        curator: Arc<dyn MemoryCurator>,
    ) -> AnalysisOrchestrator {
        AnalysisOrchestrator::new(self.project_root(), engine, curator)
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Brief from the worked example: plain-text scope, positional sources
pub fn sample_brief() -> Value {
    json!({
        "mode": "quick",
        "business_goal": "grow",
        "scope": "wireless earbuds",
        "data_sources": ["catalog.json", "reviews.json"],
    })
}

/// Brief with a structured scope and named sources, as the web client sends it
pub fn structured_brief() -> Value {
    json!({
        "mode": "deep",
        "business_goal": "growth",
        "scope": {"type": "SKU", "value": "SKU-472"},
        "marketplaces": ["Amazon"],
        "region": "India",
        "timeframe": "Last 30 days",
        "data_sources": {
            "catalog": "catalog.json",
            "reviews": "reviews.json",
        },
    })
}
