//! anamnesis-bedrock
//!
//! Bedrock model invocation for the generation stage. Schema-blind: returns
//! the model's text verbatim for the core to validate.

pub mod client;
pub mod error;
pub mod generate;
pub mod tokens;

pub use crate::generate::{BedrockGenerator, GenerationSettings};
