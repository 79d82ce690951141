//! Models command - download and manage OCR models.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use rxtract_core::models::config::RxtractConfig;

use super::resolve_model_dir;

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// Fetch the model files from a base URL or a local directory
    Download(DownloadArgs),

    /// Check which model files are present
    Status(DirArgs),

    /// Print the model directory
    Path(DirArgs),

    /// Remove downloaded model files
    Clean(DirArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// Base URL or local directory holding the model files (det, rec, dictionary)
    #[arg(long, required = true)]
    from: String,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if files exist
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct DirArgs {
    /// Model directory (default: from config)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ModelsArgs, config: &RxtractConfig) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Download(download_args) => download_models(download_args, config).await,
        ModelsCommand::Status(dir) => check_status(&resolve_model_dir(dir.model_dir.as_deref(), config), config),
        ModelsCommand::Path(dir) => {
            println!("{}", resolve_model_dir(dir.model_dir.as_deref(), config).display());
            Ok(())
        }
        ModelsCommand::Clean(dir) => clean_models(&resolve_model_dir(dir.model_dir.as_deref(), config), config),
    }
}

/// Join a base URL and a file name with exactly one slash.
fn model_url(base: &str, filename: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), filename)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Sibling path a model is written to before it is complete.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

async fn download_models(args: DownloadArgs, config: &RxtractConfig) -> anyhow::Result<()> {
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| resolve_model_dir(None, config));
    fs::create_dir_all(&output_dir)?;

    println!(
        "{} Fetching models from {} to {}",
        style("ℹ").blue(),
        args.from,
        output_dir.display()
    );
    println!();

    let client = reqwest::Client::builder()
        .user_agent(concat!("rxtract-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let multi_progress = MultiProgress::new();
    let mut success_count = 0;
    let mut skip_count = 0;
    let mut error_count = 0;

    for filename in config.ocr.model_files() {
        let path = output_dir.join(filename);

        if path.exists() && !args.force && fs::metadata(&path)?.len() > 0 {
            println!("  {} {} (already exists)", style("✓").green(), filename);
            skip_count += 1;
            continue;
        }

        let pb = multi_progress.add(ProgressBar::new(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<30} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")?
                .progress_chars("=>-"),
        );
        pb.set_message(filename.to_string());

        let partial = partial_path(&path);
        let fetched = if is_remote(&args.from) {
            download_file(&client, &model_url(&args.from, filename), &partial, &pb).await
        } else {
            copy_file(&Path::new(&args.from).join(filename), &partial, &pb)
        };
        let fetched = fetched.and_then(|()| Ok(fs::rename(&partial, &path)?));

        match fetched {
            Ok(()) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), filename));
                success_count += 1;
            }
            Err(e) => {
                let _ = fs::remove_file(&partial);
                pb.finish_with_message(format!("{} {} - {}", style("✗").red(), filename, e));
                error_count += 1;
            }
        }
    }

    println!();

    if error_count == 0 {
        println!("{} Models installed", style("✓").green().bold());
        if skip_count > 0 {
            println!("   {} downloaded, {} already present", success_count, skip_count);
        }
    } else {
        println!("{} Download completed with errors", style("⚠").yellow().bold());
        println!(
            "   {} downloaded, {} skipped, {} failed",
            success_count, skip_count, error_count
        );
        println!();
        println!("Retry with: rxtract models download --from {} --force", args.from);
    }

    println!();
    check_status(&output_dir, config)?;

    if error_count > 0 {
        anyhow::bail!("{} model file(s) failed to download", error_count);
    }

    Ok(())
}

/// Stream `url` into `partial`. An empty body is an error since the engine
/// treats empty model files as missing.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    partial: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("HTTP {} for {}", response.status(), url);
    }
    if let Some(len) = response.content_length() {
        pb.set_length(len);
    }

    let mut file = File::create(partial)?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    file.sync_all()?;

    if written == 0 {
        anyhow::bail!("empty response from {}", url);
    }
    Ok(())
}

/// Copy a model from a local directory into `partial`.
fn copy_file(source: &Path, partial: &Path, pb: &ProgressBar) -> anyhow::Result<()> {
    if !source.is_file() {
        anyhow::bail!("not found: {}", source.display());
    }
    let copied = fs::copy(source, partial)?;
    if copied == 0 {
        anyhow::bail!("empty file: {}", source.display());
    }
    pb.set_length(copied);
    pb.set_position(copied);
    Ok(())
}

fn check_status(model_dir: &Path, config: &RxtractConfig) -> anyhow::Result<()> {
    println!("{}", style("Model Status").bold());
    println!("{}", model_dir.display());

    let mut all_present = true;
    let mut total_size: u64 = 0;

    for filename in config.ocr.model_files() {
        let path = model_dir.join(filename);
        let size = if path.exists() { fs::metadata(&path)?.len() } else { 0 };
        total_size += size;

        let (status, size_str) = if !path.exists() {
            all_present = false;
            (style("✗").red(), "missing".to_string())
        } else if size == 0 {
            all_present = false;
            (style("⚠").yellow(), "empty".to_string())
        } else {
            (style("✓").green(), format_size(size))
        };

        println!("    {} {:<25} {:>10}", status, filename, size_str);
    }

    if all_present {
        println!("    {} Ready ({} total)", style("✓").green(), format_size(total_size));
    } else {
        println!(
            "    {} Run 'rxtract models download --from <URL or DIR>' to fetch them",
            style("⚠").yellow()
        );
    }

    Ok(())
}

fn clean_models(model_dir: &Path, config: &RxtractConfig) -> anyhow::Result<()> {
    let mut total_removed = 0;
    let mut total_freed: u64 = 0;

    for filename in config.ocr.model_files() {
        let path = model_dir.join(filename);
        if path.exists() {
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            fs::remove_file(&path)?;
            total_removed += 1;
            total_freed += size;
            println!("  {} Removed {}", style("✓").green(), filename);
        }
    }

    // Leftovers from interrupted downloads
    if let Ok(entries) = fs::read_dir(model_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "part").unwrap_or(false) {
                let _ = fs::remove_file(&path);
            }
        }
    }

    if total_removed > 0 {
        println!(
            "{} Removed {} files, freed {}",
            style("✓").green(),
            total_removed,
            format_size(total_freed)
        );
    } else {
        println!("{} No model files to remove.", style("ℹ").blue());
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}
