//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod models;
pub mod process;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use rxtract_core::error::ShareError;
use rxtract_core::export::{export_with_stem, ExportFormat};
use rxtract_core::models::config::RxtractConfig;
use rxtract_core::models::record::{ExtractedRecord, RecordField};
use rxtract_core::share::Clipboard;

/// Output formats for commands that print a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// key,value CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    /// Explicit choice, else the configured export format.
    pub fn resolve(choice: Option<OutputFormat>, config: &RxtractConfig) -> OutputFormat {
        choice.unwrap_or(match config.export.default_format {
            ExportFormat::Json => OutputFormat::Json,
            ExportFormat::Csv => OutputFormat::Csv,
        })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render a record in the requested format.
pub fn render(record: &ExtractedRecord, format: OutputFormat, stem: &str) -> anyhow::Result<String> {
    let export_format = match format {
        OutputFormat::Json => ExportFormat::Json,
        OutputFormat::Csv => ExportFormat::Csv,
        OutputFormat::Text => return Ok(format_text(record)),
    };
    let artifact = export_with_stem(record, export_format, stem)?;
    Ok(String::from_utf8(artifact.bytes)?)
}

/// Two-column table of the extracted fields.
pub fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    for field in RecordField::ALL {
        match field {
            RecordField::OrderDetails => {
                output.push_str(&format!("{:<16} ", field.label()));
                if record.order_details.is_empty() {
                    output.push_str("-\n");
                }
                for (i, item) in record.order_details.iter().enumerate() {
                    if i > 0 {
                        output.push_str(&format!("{:<16} ", ""));
                    }
                    output.push_str(&format!("{:<30} {:>10}\n", item.item, item.price));
                }
            }
            RecordField::ExtractedText => {}
            _ => {
                output.push_str(&format!("{:<16} {}\n", field.label(), record.value(field)));
            }
        }
    }

    output
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rxtract")
        .join("config.json")
}

/// Load the config from `path`, else the default location, else defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<RxtractConfig> {
    match path {
        Some(path) => {
            let path = Path::new(path);
            if path.exists() {
                Ok(RxtractConfig::from_file(path)?)
            } else {
                debug!("Config file {} does not exist, using defaults", path.display());
                Ok(RxtractConfig::default())
            }
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Loading config from {}", path.display());
                Ok(RxtractConfig::from_file(&path)?)
            } else {
                Ok(RxtractConfig::default())
            }
        }
    }
}

/// Directory downloaded models are stored in by default.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rxtract")
        .join("models")
}

/// Model directory: command line, then config, then the default.
pub fn resolve_model_dir(arg: Option<&Path>, config: &RxtractConfig) -> PathBuf {
    arg.map(Path::to_path_buf)
        .or_else(|| config.ocr.model_dir.clone())
        .unwrap_or_else(default_model_dir)
}

/// Declared MIME type of an input file, from its extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Clipboard backed by the platform's clipboard command.
pub struct SystemClipboard;

impl SystemClipboard {
    fn candidates() -> &'static [(&'static str, &'static [&'static str])] {
        if cfg!(target_os = "macos") {
            &[("pbcopy", &[])]
        } else if cfg!(target_os = "windows") {
            &[("clip", &[])]
        } else {
            &[
                ("wl-copy", &[]),
                ("xclip", &["-selection", "clipboard"]),
                ("xsel", &["--clipboard", "--input"]),
            ]
        }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        let mut last_error = String::from("no clipboard command available");

        for (program, args) in Self::candidates() {
            let child = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match child {
                Ok(child) => child,
                Err(e) => {
                    debug!("Clipboard command {} unavailable: {}", program, e);
                    last_error = format!("{}: {}", program, e);
                    continue;
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(text.as_bytes())
                    .map_err(|e| ShareError(e.to_string()))?;
            }

            let status = child.wait().map_err(|e| ShareError(e.to_string()))?;
            if status.success() {
                return Ok(());
            }
            last_error = format!("{} exited with {}", program, status);
        }

        Err(ShareError(last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rxtract_core::models::record::OrderItem;

    #[test]
    fn test_format_text_lists_items() {
        let mut record = ExtractedRecord::unmatched("");
        record.store_name = "Corner Deli".to_string();
        record.order_details = vec![
            OrderItem::new("2 Coffee", "$4.50"),
            OrderItem::new("1 Bagel", "$2.25"),
        ];

        let text = format_text(&record);
        assert!(text.contains("Corner Deli"));
        assert!(text.contains("2 Coffee"));
        assert!(text.contains("$2.25"));
        assert!(!text.contains("Extracted Text"));
    }

    #[test]
    fn test_output_format_defaults_to_config() {
        let mut config = RxtractConfig::default();
        assert_eq!(OutputFormat::resolve(None, &config), OutputFormat::Json);
        config.export.default_format = ExportFormat::Csv;
        assert_eq!(OutputFormat::resolve(None, &config), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::resolve(Some(OutputFormat::Text), &config),
            OutputFormat::Text
        );
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("receipt.png")), "image/png");
        assert_eq!(guess_mime(Path::new("receipt.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("notes.pdf")), "application/pdf");
    }
}
