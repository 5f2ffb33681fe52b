//! Pipeline execution.
//!
//! - **processor**: the load step and the run-to-fixpoint loop
//! - **report**: what an execution returns

pub mod processor;
pub mod report;

// Re-exports for convenient access
pub use processor::{Pipeline, PipelineState};
pub use report::{RunReport, RunSummary, StepRecord};
