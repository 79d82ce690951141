//! Extract command - parse fields from text that was already recognized.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;
use tracing::info;

use rxtract_core::extract::{ReceiptParser, VendorHeuristic};
use rxtract_core::models::config::RxtractConfig;
use rxtract_core::models::record::ExtractedRecord;
use rxtract_core::share::share_message;

use super::{render, OutputFormat, SystemClipboard};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file to read (default: stdin)
    input: Option<PathBuf>,

    /// Treat the input as an exported JSON record and re-extract its text
    #[arg(long)]
    from_record: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Vendor name heuristic (default: from config)
    #[arg(long, value_enum)]
    vendor: Option<VendorArg>,

    /// Check extracted values for consistency
    #[arg(long)]
    validate: bool,

    /// Print fields that fell back to their defaults
    #[arg(long)]
    warnings: bool,

    /// Copy the record as JSON to the clipboard
    #[arg(long)]
    share: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VendorArg {
    /// Report the known brand name wherever it appears
    Brand,
    /// Words before the first number only
    Words,
}

impl From<VendorArg> for VendorHeuristic {
    fn from(arg: VendorArg) -> Self {
        match arg {
            VendorArg::Brand => VendorHeuristic::BrandParity,
            VendorArg::Words => VendorHeuristic::WordsBeforeDigit,
        }
    }
}

pub async fn run(args: ExtractArgs, config: &RxtractConfig) -> anyhow::Result<()> {
    let input = match &args.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let text = if args.from_record {
        let record: ExtractedRecord = serde_json::from_str(&input)
            .map_err(|e| anyhow::anyhow!("Input is not an exported record: {}", e))?;
        record.extracted_text
    } else {
        input
    };

    let mut parser = ReceiptParser::from_config(&config.extraction);
    if let Some(vendor) = args.vendor {
        parser = parser.with_vendor_heuristic(vendor.into());
    }

    let result = parser.parse(&text);
    info!(
        "Extracted record with {} warnings in {}ms",
        result.warnings.len(),
        result.processing_time_ms
    );
    let record = result.record;

    if args.warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    if args.validate {
        for issue in record.validate() {
            eprintln!("{} {}", style("⚠").yellow(), issue);
        }
    }

    let format = OutputFormat::resolve(args.format, config);
    let output = render(&record, format, &config.export.file_stem)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", output),
    }

    if args.share {
        let message = share_message(&record, None, &SystemClipboard);
        eprintln!("{} {}", style("ℹ").blue(), message);
    }

    Ok(())
}
