use serde::{Deserialize, Serialize};

use crate::error::BedrockError;

/// Where AWS credentials come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Profile {
        profile_name: String,
    },
    #[default]
    DefaultChain,
}

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_sdk_config(
    region: &str,
    creds: &CredentialSource,
) -> Result<aws_config::SdkConfig, BedrockError> {
    if region.trim().is_empty() {
        return Err(BedrockError::Config("region must not be empty".to_string()));
    }

    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    match creds {
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    Ok(builder.load().await)
}

/// Build a Bedrock runtime client.
pub async fn build_client(
    region: &str,
    creds: &CredentialSource,
) -> Result<aws_sdk_bedrockruntime::Client, BedrockError> {
    let config = build_sdk_config(region, creds).await?;
    Ok(aws_sdk_bedrockruntime::Client::new(&config))
}
