//! anamnesis-cli
//!
//! Configuration and wiring for the `anamnesis` binary.

pub mod config;
pub mod run;
