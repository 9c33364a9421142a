//! Analysis diagnostic dump: writes the prompt, raw reply and final result
//! of one analysis to disk for offline inspection.
//!
//! **Activation**: disabled unless a dump directory is configured
//! (`CLAUSE_LENS_DUMP_DIR` or `AnalyzerConfig::dump_dir`).
//!
//! **Output structure**:
//! ```text
//! {dump_dir}/{analysis_id}/
//!   01-prompt.txt
//!   02-raw-response.txt
//!   03-result.json
//! ```
//!
//! A dumped raw reply can be fed back through `clause-lens replay`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

pub const PROMPT_FILE: &str = "01-prompt.txt";
pub const RAW_RESPONSE_FILE: &str = "02-raw-response.txt";
pub const RESULT_FILE: &str = "03-result.json";

/// Returns the dump directory for one analysis under `base`.
///
/// Creates the directory tree. Returns `None` (with a warning) if directory
/// creation fails; never panics, never blocks the pipeline.
pub fn dump_dir_for(base: &Path, analysis_id: &Uuid) -> Option<PathBuf> {
    let dir = base.join(analysis_id.to_string());

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(
            path = %dir.display(),
            error = %e,
            "Diagnostic dump: failed to create directory"
        );
        return None;
    }

    Some(dir)
}

/// Write a JSON artifact (any serde-serializable value).
///
/// Uses pretty-printing for human readability. Never panics.
pub fn dump_json<T: serde::Serialize>(dir: &Path, filename: &str, value: &T) {
    let path = dir.join(filename);
    match serde_json::to_string_pretty(value) {
        Ok(json) => write_artifact(&path, json.as_bytes()),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Diagnostic dump: failed to serialize JSON"
        ),
    }
}

/// Write a text artifact (prompt, raw model reply). Never panics.
pub fn dump_text(dir: &Path, filename: &str, text: &str) {
    write_artifact(&dir.join(filename), text.as_bytes());
}

fn write_artifact(path: &Path, data: &[u8]) {
    match std::fs::write(path, data) {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Diagnostic dump: artifact written"
        ),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Diagnostic dump: failed to write artifact"
        ),
    }
}
