//! Process command - recognize and extract a single receipt image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rxtract_core::models::config::RxtractConfig;
use rxtract_core::models::record::ExtractedRecord;
use rxtract_core::share::share_message;
use rxtract_core::{PureOcrEngine, ReceiptParser, Session};

use super::{guess_mime, render, resolve_model_dir, OutputFormat, SystemClipboard};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input receipt image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Check extracted values for consistency
    #[arg(long)]
    validate: bool,

    /// Copy the record as JSON to the clipboard
    #[arg(long)]
    share: bool,

    /// Also print the recognized text
    #[arg(long)]
    show_text: bool,
}

pub async fn run(args: ProcessArgs, config: &RxtractConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let parser = ReceiptParser::from_config(&config.extraction);
    let mut session = Session::with_parser(parser).with_language(config.ocr.language.clone());

    let bytes = fs::read(&args.input)?;
    let mime_type = guess_mime(&args.input);
    session.select_image(bytes, &mime_type)?;

    let model_dir = resolve_model_dir(args.model_dir.as_deref(), config);
    let engine = PureOcrEngine::from_dir(&model_dir, &config.ocr).map_err(|e| {
        anyhow::anyhow!(
            "{}\n\nRun 'rxtract models download --from <URL or DIR>' to fetch the OCR models.",
            e
        )
    })?;

    let record = recognize(&mut session, &engine)?;

    if args.validate {
        let issues = record.validate();
        if issues.is_empty() {
            eprintln!("{} No validation issues", style("✓").green());
        } else {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let format = OutputFormat::resolve(args.format, config);
    let output = render(&record, format, &config.export.file_stem)?;

    match &args.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format!("{}.{}", config.export.file_stem, format.extension()))
            } else {
                path.clone()
            };
            fs::write(&path, &output)?;
            println!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", output),
    }

    if args.show_text {
        println!();
        println!("{}", style("Recognized text:").bold());
        println!("{}", record.extracted_text);
    }

    if args.share {
        let message = share_message(&record, None, &SystemClipboard);
        eprintln!("{} {}", style("ℹ").blue(), message);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run one recognition cycle with a progress bar.
fn recognize(session: &mut Session, engine: &PureOcrEngine) -> anyhow::Result<ExtractedRecord> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let result = session.process(engine, &mut |p| {
        pb.set_message(p.status.clone());
        pb.set_position((p.progress * 100.0) as u64);
    });

    match result {
        Ok(record) => {
            pb.finish_with_message("Done");
            Ok(record.clone())
        }
        Err(e) => {
            pb.abandon_with_message("Failed");
            Err(e.into())
        }
    }
}
