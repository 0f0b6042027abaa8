//! Analysis Orchestrator
//!
//! Runs one request through the pipeline:
//! - Normalizes the brief's polymorphic fields
//! - Validates required keys
//! - Resolves request paths against the project root
//! - Loads memory, invokes the engine
//! - Persists the report and updated memory when asked

use crate::engine::{AnalysisEngine, MemoryCurator};
use crate::error::AnalysisError;
use crate::locks::MemoryLocks;
use crate::paths::ProjectRoot;
use crate::store;
use crate::types::{AnalyzeRequest, AnalyzeResult, Memory};
use std::fmt;
use std::sync::Arc;

/// Stages a request passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    Authenticated,
    Normalized,
    Validated,
    MemoryLoaded,
    EngineInvoked,
    OutputPersisted,
    MemoryPersisted,
    Responded,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Authenticated => "authenticated",
            Self::Normalized => "normalized",
            Self::Validated => "validated",
            Self::MemoryLoaded => "memory_loaded",
            Self::EngineInvoked => "engine_invoked",
            Self::OutputPersisted => "output_persisted",
            Self::MemoryPersisted => "memory_persisted",
            Self::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Sequences normalization, engine delegation and persistence
///
/// Holds no per-request state; one instance serves all requests.
pub struct AnalysisOrchestrator {
    root: ProjectRoot,
    engine: Arc<dyn AnalysisEngine>,
    curator: Arc<dyn MemoryCurator>,
    locks: MemoryLocks,
}

impl AnalysisOrchestrator {
    #[must_use]
    pub fn new(
        root: ProjectRoot,
        engine: Arc<dyn AnalysisEngine>,
        curator: Arc<dyn MemoryCurator>,
    ) -> Self {
        Self {
            root,
            engine,
            curator,
            locks: MemoryLocks::new(),
        }
    }

    /// Run one analysis request
    ///
    /// # Workflow
    /// 1. Normalize `scope` and `data_sources`
    /// 2. Reject briefs missing required keys
    /// 3. Resolve memory and source paths
    /// 4. Load memory (empty if the file is absent)
    /// 5. Invoke the engine
    /// 6. Write the report if `output_path` is set
    /// 7. Curate and persist memory if `update_memory` is set
    ///
    /// # Errors
    /// - `AnalysisError::MissingFields` listing every absent key
    /// - `AnalysisError::BadInput` for engine-classified client errors
    /// - `AnalysisError::Internal` for other engine failures and any I/O failure
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResult, AnalysisError> {
        let AnalyzeRequest {
            mut brief,
            update_memory,
            memory_path,
            source_base_dir,
            output_path,
        } = request;

        brief.normalize();
        stage(PipelineStage::Normalized);

        let missing = brief.missing_fields();
        if !missing.is_empty() {
            tracing::warn!(?missing, "brief rejected");
            return Err(AnalysisError::MissingFields(missing));
        }
        stage(PipelineStage::Validated);

        let memory_file = self.root.resolve(&memory_path);
        let source_root = self.root.resolve(&source_base_dir);

        let _memory_guard = if update_memory {
            Some(self.locks.acquire(&memory_file).await)
        } else {
            None
        };

        let memory = Memory::load(&memory_file).await.map_err(|e| {
            tracing::error!("Memory load failed: {}", e);
            AnalysisError::from(e)
        })?;
        stage(PipelineStage::MemoryLoaded);

        let report = self
            .engine
            .run_analysis(&brief, &memory, &source_root)
            .await
            .map_err(|e| {
                if e.is_client_error() {
                    tracing::warn!("Engine rejected brief: {}", e);
                } else {
                    tracing::error!("Engine failed: {}", e);
                }
                AnalysisError::from(e)
            })?;
        stage(PipelineStage::EngineInvoked);

        let written = match output_path.filter(|p| !p.is_empty()) {
            Some(requested) => {
                let file = self.root.resolve(&requested);
                store::write_text(&file, &report).await?;
                stage(PipelineStage::OutputPersisted);
                Some(file)
            }
            None => None,
        };

        if update_memory {
            let updated = self
                .curator
                .update_memory(memory, &brief)
                .await
                .map_err(|e| AnalysisError::memory_update(&e))?;
            updated.persist(&memory_file).await?;
            stage(PipelineStage::MemoryPersisted);
        }

        tracing::info!(
            report_bytes = report.len(),
            memory_updated = update_memory,
            "Analysis completed"
        );
        Ok(AnalyzeResult::success(
            &brief,
            report,
            update_memory,
            written.as_deref(),
        ))
    }

    #[inline]
    #[must_use]
    pub fn project_root(&self) -> &ProjectRoot {
        &self.root
    }
}

impl fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("root", &self.root)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

fn stage(stage: PipelineStage) {
    tracing::debug!(%stage, "pipeline stage");
}
