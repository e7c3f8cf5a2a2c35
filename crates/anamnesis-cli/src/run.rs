use std::time::Duration;

use anamnesis_bedrock::BedrockGenerator;
use anamnesis_bedrock::client::build_client;
use anamnesis_core::SchemaContract;
use anamnesis_pipeline::{Orchestrator, RunSettings};
use anamnesis_storage::inputs::read_inputs;
use anamnesis_storage::prompts::PromptLibrary;
use anamnesis_storage::report::{RunRecord, write_report};

use crate::config::PipelineConfig;

/// One full run: resolve the prompt, read inputs, process, write the report.
///
/// An unknown prompt version or an unlistable input directory aborts before
/// any model call. Per-input failures, unreadable files included, are
/// recorded in the report instead.
pub async fn execute(config: &PipelineConfig) -> eyre::Result<RunRecord> {
    let started_at = jiff::Timestamp::now();

    let library = PromptLibrary::load(&config.prompts_dir).await?;
    let prompt = library.resolve(&config.prompt_version)?;
    let inputs = read_inputs(&config.input_dir).await?;

    let client = build_client(&config.region, &config.credentials).await?;
    let generator = BedrockGenerator::new(client, config.generation_settings());
    let contract = SchemaContract::clinical(&config.contract_policy());

    let orchestrator = Orchestrator::new(
        Box::new(generator),
        Box::new(contract),
        RunSettings {
            prompt,
            timeout: Duration::from_secs(config.timeout_secs),
            concurrency: config.concurrency,
        },
    )?;

    let report = orchestrator.run_loaded(inputs).await;
    let record = RunRecord::new(report, orchestrator.model_id(), started_at);
    write_report(&config.output_path, &record).await?;

    Ok(record)
}
