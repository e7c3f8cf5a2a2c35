use std::path::PathBuf;

use eyre::Result;
use tracing_subscriber::EnvFilter;

use anamnesis_cli::{config, run};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;

    tracing::info!(
        prompt_version = %config.prompt_version,
        model = %config.model_id,
        input_dir = %config.input_dir.display(),
        "starting pipeline"
    );

    let record = run::execute(&config).await?;

    println!("Processing complete. Saved to {}", config.output_path.display());
    println!(
        "succeeded: {} | failed: {}",
        record.report.ok, record.report.failed
    );

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Structured JSON logging for log shippers
    let json = std::env::var("ANAMNESIS_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
