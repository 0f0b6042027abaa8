//! Insight Core - analysis request pipeline
//!
//! The request boundary of the analysis service:
//! - Guards requests with an optional API key
//! - Resolves request paths against the project root
//! - Loads and persists engine-owned memory
//! - Delegates analysis to an injected engine
//! - Maps engine failures to client-facing error categories
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_core::{AnalysisOrchestrator, AnalyzeRequest, DigestEngine, ProjectRoot, RunLogCurator};
//! use std::sync::Arc;
//!
//! # async fn example(brief: insight_brief::Brief) -> Result<(), insight_core::AnalysisError> {
//! let orchestrator = AnalysisOrchestrator::new(
//!     ProjectRoot::new("/srv/insight"),
//!     Arc::new(DigestEngine::new()),
//!     Arc::new(RunLogCurator::default()),
//! );
//!
//! let result = orchestrator
//!     .analyze(AnalyzeRequest::new(brief).with_update_memory(true))
//!     .await?;
//! println!("{}", result.report);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod auth;
pub mod engine;
pub mod error;
pub mod locks;
pub mod orchestrator;
pub mod paths;
pub mod store;
pub mod types;

pub use auth::{AuthGuard, API_KEY_HEADER};
pub use engine::{AnalysisEngine, AnalysisMode, DigestEngine, MemoryCurator, RunLogCurator};
pub use error::{AnalysisError, EngineError, ErrorCategory, StoreError};
pub use locks::MemoryLocks;
pub use orchestrator::{AnalysisOrchestrator, PipelineStage};
pub use paths::{resolve, ProjectRoot};
pub use types::{
    AnalyzeRequest, AnalyzeResult, Memory, DEFAULT_MEMORY_PATH, DEFAULT_SOURCE_BASE_DIR,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring the pipeline
    pub use crate::{
        AnalysisEngine, AnalysisError, AnalysisOrchestrator, AnalyzeRequest, AnalyzeResult,
        AuthGuard, EngineError, Memory, MemoryCurator, ProjectRoot,
    };
    pub use insight_brief::Brief;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
