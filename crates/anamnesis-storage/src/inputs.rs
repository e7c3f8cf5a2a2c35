use std::path::Path;

use anamnesis_core::models::input::{ClinicalInput, LoadedInput, UnreadableInput};
use tracing::{info, warn};

use crate::error::StorageError;

/// Read every `*.txt` file in `dir`, sorted by file name.
///
/// The file name is the input identifier. Empty files are kept. A file
/// whose text cannot be read is returned as an [`UnreadableInput`] in its
/// place; only a directory that cannot be listed is an error.
pub async fn read_inputs(dir: &Path) -> Result<Vec<LoadedInput>, StorageError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| StorageError::io(dir, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StorageError::io(dir, e))?
    {
        let path = entry.path();
        let is_txt = path.extension().is_some_and(|ext| ext == "txt");
        let is_file = entry
            .file_type()
            .await
            .map_err(|e| StorageError::io(&path, e))?
            .is_file();
        if is_txt && is_file {
            paths.push(path);
        }
    }
    paths.sort();

    let mut inputs = Vec::with_capacity(paths.len());
    let mut unreadable = 0;
    for path in paths {
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => inputs.push(Ok(ClinicalInput::new(id, text))),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "input unreadable");
                unreadable += 1;
                inputs.push(Err(UnreadableInput {
                    id,
                    reason: format!("failed to read {}: {e}", path.display()),
                }));
            }
        }
    }

    info!(dir = %dir.display(), count = inputs.len(), unreadable, "inputs read");
    Ok(inputs)
}
