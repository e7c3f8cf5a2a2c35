pub mod artifact;
pub mod candidate;
pub mod cost;
pub mod input;
pub mod outcome;
pub mod prompt;
pub mod report;
pub mod token_count;
