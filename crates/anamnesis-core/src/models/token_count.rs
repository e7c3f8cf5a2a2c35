use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
}

impl TokenCount {
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub tokens: TokenCount,
    pub cost_usd: f64,
}

impl TokenUsage {
    /// Fold another call's usage into this running total.
    pub fn accumulate(&mut self, other: &TokenUsage) {
        self.tokens.input += other.tokens.input;
        self.tokens.output += other.tokens.output;
        self.cost_usd += other.cost_usd;
    }
}
