use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::client::{ApiError, ReportsClient};
use crate::models::Report;

/// Fixed CSV header, column order matching the report field order.
pub const CSV_HEADER: &str =
    "Device ID,Timestamp,Disk Encryption,OS Update,Antivirus,Sleep Settings";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Serialize reports into the CSV document: header line, then one
/// comma-joined row per report, rows joined with `\n`.
///
/// Field values pass through raw — no quoting or escaping. The status
/// fields are short enumerated strings in practice; an embedded comma
/// upstream would shift columns.
pub fn csv_document(reports: &[Report]) -> String {
    let mut lines = Vec::with_capacity(reports.len() + 1);
    lines.push(CSV_HEADER.to_owned());

    for r in reports {
        lines.push(
            [
                r.device_id.as_str(),
                r.timestamp.as_str(),
                r.disk_encryption.as_str(),
                r.os_update.as_str(),
                r.antivirus.as_str(),
                r.sleep_settings.as_str(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Fetch the full (unfiltered) report collection and write it to `path`.
///
/// A backend body that is not a report sequence is skipped silently —
/// `Ok(None)`, nothing written. Everything else that goes wrong is an
/// `ExportError` for the caller to surface.
pub async fn export_reports(
    client: &ReportsClient,
    path: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(reports) = client.all_reports().await? else {
        return Ok(None);
    };

    let doc = csv_document(&reports);
    std::fs::write(path, doc).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(path.to_path_buf()))
}

// ── Tests ───────────────────────────────────────────────────────
