use anamnesis_core::models::cost::ModelPricing;
use anamnesis_core::models::token_count::{TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Calculate the cost for a token count given model pricing.
pub fn calculate_cost(tokens: TokenCount, pricing: &ModelPricing) -> TokenUsage {
    TokenUsage {
        tokens,
        cost_usd: pricing.estimate_cost(tokens),
    }
}

/// Price a token count for a model, or zero cost for unknown models.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    match get_pricing(model_id) {
        Some(p) => calculate_cost(tokens, &p),
        None => TokenUsage {
            tokens,
            cost_usd: 0.0,
        },
    }
}

/// List prices of the model families the pipeline is configured with.
const PRICING: &[(&str, ModelPricing)] = &[
    (
        "claude-sonnet-4",
        ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        },
    ),
    (
        "claude-haiku-4-5",
        ModelPricing {
            input_per_million: 1.0,
            output_per_million: 5.0,
        },
    ),
];

/// Pricing for a model ID or inference profile, matched by family.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    PRICING
        .iter()
        .find(|(family, _)| model_id.contains(family))
        .map(|(_, pricing)| *pricing)
}
