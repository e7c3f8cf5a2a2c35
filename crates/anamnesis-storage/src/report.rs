use std::path::Path;

use anamnesis_core::models::report::RunReport;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StorageError;

/// A run report stamped with run identity, as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub model_id: String,
    pub started_at: jiff::Timestamp,
    pub finished_at: jiff::Timestamp,
    #[serde(flatten)]
    pub report: RunReport,
}

impl RunRecord {
    /// Stamp a finished report. `finished_at` is now.
    pub fn new(report: RunReport, model_id: impl Into<String>, started_at: jiff::Timestamp) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            model_id: model_id.into(),
            started_at,
            finished_at: jiff::Timestamp::now(),
            report,
        }
    }
}

/// Write a record as pretty JSON, replacing any previous file atomically.
///
/// The report holds clinical content, so on Unix it is readable by the
/// owner only.
pub async fn write_report(path: &Path, record: &RunRecord) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StorageError::io(dir, e))?;
    }

    let json = serde_json::to_string_pretty(record)?;

    // Write to a temp file then rename for atomicity
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| StorageError::io(&tmp_path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| StorageError::io(&tmp_path, e))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| StorageError::io(path, e))?;

    tracing::info!(
        path = %path.display(),
        run_id = %record.run_id,
        total = record.report.total,
        "report written"
    );
    Ok(())
}
