//! anamnesis-storage
//!
//! Local filesystem collaborators of the pipeline: prompt templates, input
//! texts, and the run report.

pub mod error;
pub mod inputs;
pub mod prompts;
pub mod report;
