//! anamnesis-pipeline
//!
//! Drives each clinical input through generation and validation, then
//! aggregates the outcomes of a run.
//!
//! Public API:
//! - `Orchestrator::run_input()` — one input, Pending → Generated → Validated (or Errored)
//! - `Orchestrator::run()` — all inputs, bounded concurrency, input order preserved
//! - `Orchestrator::run_loaded()` — same, with unreadable source entries recorded in place

pub mod error;
pub mod orchestrate;
pub mod state;

pub use crate::error::PipelineError;
pub use crate::orchestrate::{Orchestrator, RunSettings};
pub use crate::state::{InputState, Stage};
