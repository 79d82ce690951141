//! Record export to JSON and CSV byte buffers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExportError;
use crate::models::record::ExtractedRecord;

/// Default file name stem for exported records.
pub const DEFAULT_FILE_STEM: &str = "extracted_data";

/// Supported export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Json, ExportFormat::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    /// File extension, which is also the format name.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// An exported record, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

impl ExportArtifact {
    /// Artifact contents as text. Both formats are UTF-8.
    pub fn as_text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Export a record as `extracted_data.<ext>`.
pub fn export(record: &ExtractedRecord, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
    export_with_stem(record, format, DEFAULT_FILE_STEM)
}

/// Export a record with a custom file name stem.
pub fn export_with_stem(
    record: &ExtractedRecord,
    format: ExportFormat,
    stem: &str,
) -> Result<ExportArtifact, ExportError> {
    let content = match format {
        ExportFormat::Json => to_json(record)?,
        ExportFormat::Csv => to_csv(record),
    };

    debug!("Exported record as {} ({} bytes)", format, content.len());

    Ok(ExportArtifact {
        bytes: content.into_bytes(),
        mime_type: format.mime_type(),
        filename: format!("{}.{}", stem, format.extension()),
    })
}

/// Pretty JSON with 2-space indentation.
pub fn to_json(record: &ExtractedRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// One unquoted `key,value` line per field; order details stay on one line.
pub fn to_csv(record: &ExtractedRecord) -> String {
    record
        .fields()
        .into_iter()
        .map(|(key, value)| format!("{},{}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}
