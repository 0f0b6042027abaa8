//! Collaborator capabilities
//!
//! The orchestrator never analyzes anything itself. It delegates to:
//! - an [`AnalysisEngine`] that turns a canonical brief into a report
//! - a [`MemoryCurator`] that folds a finished run into memory
//!
//! Both are injected as trait objects so the pipeline can run against fakes.
//! [`DigestEngine`] and [`RunLogCurator`] are small built-in implementations
//! used by the gateway binary.

mod digest;
mod run_log;

pub use digest::{AnalysisMode, DigestEngine};
pub use run_log::RunLogCurator;

use crate::error::EngineError;
use crate::types::Memory;
use async_trait::async_trait;
use insight_brief::Brief;
use std::path::Path;

/// Produces a report from a canonical brief
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Run one analysis
    ///
    /// `root_dir` is the resolved directory data source paths are relative to.
    ///
    /// # Errors
    /// - `EngineError::InvalidBrief` if the brief is unusable
    /// - `EngineError::SourceNotFound` if a data source is missing
    /// - `EngineError::Failed` for anything else
    async fn run_analysis(
        &self,
        brief: &Brief,
        memory: &Memory,
        root_dir: &Path,
    ) -> Result<String, EngineError>;
}

/// Derives updated memory from a finished run
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryCurator: Send + Sync {
    /// Return the memory to persist after analyzing `brief`
    ///
    /// # Errors
    /// Any `EngineError`; the pipeline treats it as internal.
    async fn update_memory(&self, memory: Memory, brief: &Brief) -> Result<Memory, EngineError>;
}
