use std::path::{Path, PathBuf};

use anamnesis_bedrock::GenerationSettings;
use anamnesis_bedrock::client::CredentialSource;
use anamnesis_core::ContractPolicy;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ANAMNESIS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    /// Which `prompt_<version>.txt` to run.
    pub prompt_version: String,
    pub prompts_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_path: PathBuf,

    pub region: String,
    pub credentials: CredentialSource,
    pub model_id: String,
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: i32,

    /// Bound on a single model call, in seconds. Added in v1.
    pub timeout_secs: u64,
    /// Inputs in flight at once. Added in v1; older configs ran sequentially.
    pub concurrency: usize,
    /// Minimum supporting signals for an asserted risk level (never below 1).
    pub min_risk_signals: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            prompt_version: "v2".to_string(),
            prompts_dir: PathBuf::from("prompts"),
            input_dir: PathBuf::from("data/input"),
            output_path: PathBuf::from("results.json"),
            region: "us-east-1".to_string(),
            credentials: CredentialSource::DefaultChain,
            model_id: "us.anthropic.claude-sonnet-4-20250514-v1:0".to_string(),
            system_prompt: None,
            temperature: 0.3,
            max_output_tokens: 800,
            timeout_secs: 120,
            concurrency: 4,
            min_risk_signals: 1,
        }
    }
}

impl PipelineConfig {
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model_id: self.model_id.clone(),
            system_prompt: self.system_prompt.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn contract_policy(&self) -> ContractPolicy {
        ContractPolicy {
            min_risk_signals: self.min_risk_signals,
            ..ContractPolicy::default()
        }
    }
}

fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("anamnesis").join("config.json"))
}

/// Load the run configuration.
///
/// The file is taken from `explicit`, else `ANAMNESIS_CONFIG`, else the
/// per-user config directory. Only the per-user default may be absent, in
/// which case built-in defaults apply. Environment overrides are applied
/// last.
pub fn load_config(explicit: Option<&Path>) -> eyre::Result<PipelineConfig> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let mut config = match named {
        Some(path) => load_config_file(&path)?,
        None => {
            let path = default_config_path()?;
            if path.exists() {
                load_config_file(&path)?
            } else {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                PipelineConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

pub fn load_config_file(path: &Path) -> eyre::Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        Some(v) => u32::try_from(v).map_err(|_| {
            eyre::eyre!(
                "config_version {v} is newer than this build supports ({CURRENT_VERSION}). \
                 Please update anamnesis."
            )
        })?,
        None => 0,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: PipelineConfig = serde_json::from_value(migrated)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update anamnesis."
        ));
    }

    // v0 → v1: add timeout_secs and concurrency. Pre-versioned configs
    // processed inputs one at a time, so they keep concurrency 1.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("timeout_secs")
            .or_insert(serde_json::Value::Number(120.into()));
        obj.entry("concurrency")
            .or_insert(serde_json::Value::Number(1.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added timeout_secs, concurrency)");
    }

    Ok(json)
}

/// Apply `ANAMNESIS_PROMPT_VERSION`, `ANAMNESIS_MODEL_ID` and `AWS_REGION`.
pub fn apply_env_overrides(config: &mut PipelineConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(version) = non_empty("ANAMNESIS_PROMPT_VERSION") {
        config.prompt_version = version;
    }
    if let Some(model_id) = non_empty("ANAMNESIS_MODEL_ID") {
        config.model_id = model_id;
    }
    if let Some(region) = non_empty("AWS_REGION") {
        config.region = region;
    }
}
