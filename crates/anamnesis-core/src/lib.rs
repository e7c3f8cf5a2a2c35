//! anamnesis-core
//!
//! Pure domain types, the clinical schema contract, and the validation and
//! aggregation stages. No AWS SDK or filesystem dependency — this is the
//! shared vocabulary of the anamnesis pipeline.

pub mod aggregate;
pub mod contract;
pub mod error;
pub mod generate;
pub mod models;
pub mod validate;

pub use crate::aggregate::aggregate;
pub use crate::contract::{ContractPolicy, SchemaContract, Validator};
pub use crate::error::CoreError;
pub use crate::generate::{BoxFuture, CallFailure, Generator};
pub use crate::validate::{check_artifact, validate};
