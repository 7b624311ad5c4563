//! # CLI Module
//!
//! Command-line interface for the import core.
//!
//! ## Usage
//! ```bash
//! # Print the hothash of each file
//! photo-import hash IMG_0001.jpg IMG_0002.jpg
//!
//! # Hash a larger preview instead of the 150px identity preview
//! photo-import hash IMG_0001.jpg --max-dimension 1200
//!
//! # Show extracted metadata
//! photo-import inspect IMG_0001.jpg --output json
//!
//! # Run a full import batch
//! photo-import import ~/Card/DCIM/*.JPG --verbose
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_import_core::core::import::{BatchResult, CancellationToken, ImportConfig};
use photo_import_core::core::metadata::{MetadataExtractor, PhotoMetadata};
use photo_import_core::core::preview::{Canonicalizer, HOT_PREVIEW_DIMENSION};
use photo_import_core::error::{ImportError, Result};
use photo_import_core::events::{BatchEvent, Event, EventChannel, FileEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// Photo Import - deterministic previews, content hashes and EXIF for imports
#[derive(Parser, Debug)]
#[command(name = "photo-import")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the hothash of each file
    Hash {
        /// Image files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Longer-edge bound of the hashed preview
        #[arg(short, long, default_value_t = HOT_PREVIEW_DIMENSION)]
        max_dimension: u32,
    },

    /// Show the metadata extracted from a file
    Inspect {
        /// Image file
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: InspectFormat,
    },

    /// Import files: previews, hothash and metadata for each
    Import {
        /// Image files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Skip the 1200px display preview
        #[arg(long)]
        no_coldpreview: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InspectFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (hothash and path)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            files,
            max_dimension,
        } => run_hash(&files, max_dimension),
        Commands::Inspect { file, output } => run_inspect(&file, output),
        Commands::Import {
            files,
            no_coldpreview,
            output,
            verbose,
        } => run_import(files, !no_coldpreview, output, verbose),
    }
}

fn run_hash(files: &[PathBuf], max_dimension: u32) -> Result<()> {
    if max_dimension == 0 {
        return Err(ImportError::Config(
            "--max-dimension must be at least 1".to_string(),
        ));
    }

    let term = Term::stderr();
    let canonicalizer = Canonicalizer::new();

    for file in files {
        match canonicalizer.canonicalize(file, max_dimension) {
            Ok((_, hothash)) => println!("{}  {}", hothash, file.display()),
            Err(e) => {
                term.write_line(&format!("{} {}", style("✗").red().bold(), e))
                    .ok();
            }
        }
    }

    Ok(())
}

fn run_inspect(file: &Path, output: InspectFormat) -> Result<()> {
    let metadata = MetadataExtractor::new().extract(file);

    match output {
        InspectFormat::Pretty => print_pretty_metadata(&Term::stdout(), file, &metadata),
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&metadata)?),
    }

    Ok(())
}

fn run_import(
    files: Vec<PathBuf>,
    coldpreview: bool,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Photo Import").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let processor = ImportConfig::new().with_coldpreview(coldpreview).build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Batch(BatchEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::File(FileEvent::Failed { path, message }) if verbose => {
                    pb.println(format!(
                        "  {} {}: {}",
                        style("✗").red(),
                        path.display(),
                        message
                    ));
                }
                Event::Batch(BatchEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = processor.process_batch(&files, &sender, &CancellationToken::new());

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
        OutputFormat::Json => print_json_results(&result)?,
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_metadata(term: &Term, file: &Path, metadata: &PhotoMetadata) {
    let core = &metadata.core;
    let settings = &metadata.settings;

    term.write_line(&format!("{}", style(file.display()).bold())).ok();

    let mut rows: Vec<(&str, Option<String>)> = vec![
        ("Captured", core.captured_at.clone()),
        ("Camera", core.camera_display()),
        ("Dimensions", core.dimensions_display()),
        (
            "Position",
            core.position().map(|(lat, lon)| format!("{:.6}, {:.6}", lat, lon)),
        ),
        ("Altitude", core.altitude.map(|a| format!("{:.1} m", a))),
    ];
    rows.extend([
        ("ISO", settings.iso.map(|iso| iso.to_string())),
        ("Aperture", settings.aperture.map(|f| format!("f/{}", f))),
        ("Shutter", settings.shutter_speed.as_ref().map(|s| format!("{} s", s))),
        ("Focal length", settings.focal_length.map(|mm| format!("{} mm", mm))),
        (
            "35mm equivalent",
            settings.focal_length_35mm.map(|mm| format!("{} mm", mm)),
        ),
        (
            "Lens",
            match (&settings.lens_make, &settings.lens_model) {
                (Some(make), Some(model)) => Some(format!("{} {}", make, model)),
                (make, model) => model.clone().or_else(|| make.clone()),
            },
        ),
        ("Serial", settings.serial_number.clone()),
        ("Color space", settings.color_space.map(|c| c.label().to_string())),
        (
            "Exposure",
            settings
                .exposure_program
                .map(|p| p.label().to_string()),
        ),
        (
            "Compensation",
            settings.exposure_compensation.map(|ev| format!("{:+} EV", ev)),
        ),
        ("Metering", settings.metering_mode.map(|m| m.label().to_string())),
        ("Flash", settings.flash.map(|f| format!("{:?}", f))),
        ("White balance", settings.white_balance.map(|wb| format!("{:?}", wb))),
    ]);

    let mut printed = false;
    for (label, value) in rows {
        if let Some(value) = value {
            term.write_line(&format!("  {:<16} {}", style(label).dim(), value))
                .ok();
            printed = true;
        }
    }

    if !printed {
        term.write_line(&format!("  {}", style("No metadata found").dim()))
            .ok();
    }
}

fn print_pretty_results(term: &Term, result: &BatchResult, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!("{} Import Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} photos imported in {:.1}s",
        style(result.records.len()).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    if !result.failures.is_empty() {
        term.write_line(&format!(
            "  {} files failed",
            style(result.failures.len()).red()
        ))
        .ok();
    }

    term.write_line("").ok();

    for record in &result.records {
        let camera = record
            .metadata
            .core
            .camera_display()
            .unwrap_or_else(|| "-".to_string());
        term.write_line(&format!(
            "  {} {}  {}",
            style(record.hothash.short(12)).yellow(),
            record.path.display(),
            style(camera).dim()
        ))
        .ok();

        if verbose {
            if let Some(captured_at) = &record.metadata.core.captured_at {
                term.write_line(&format!("      {}", style(captured_at).dim()))
                    .ok();
            }
        }
    }

    for failure in &result.failures {
        term.write_line(&format!(
            "  {} {}: {}",
            style("✗").red(),
            failure.path.display(),
            failure.error
        ))
        .ok();
    }
}

fn print_json_results(result: &BatchResult) -> Result<()> {
    let output = serde_json::json!({
        "summary": result.summary(),
        "records": result.records.iter().map(|r| {
            serde_json::json!({
                "path": r.path,
                "file_size": r.file_size,
                "hothash": r.hothash,
                "hotpreview": {
                    "width": r.hotpreview.width(),
                    "height": r.hotpreview.height(),
                    "bytes": r.hotpreview.size_bytes(),
                },
                "coldpreview": r.coldpreview.as_ref().map(|p| serde_json::json!({
                    "width": p.width(),
                    "height": p.height(),
                    "bytes": p.size_bytes(),
                })),
                "metadata": r.metadata,
            })
        }).collect::<Vec<_>>(),
        "failures": result.failures.iter().map(|f| {
            serde_json::json!({
                "path": f.path,
                "error": f.error.to_string(),
            })
        }).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_minimal_results(result: &BatchResult) {
    for record in &result.records {
        println!("{}  {}", record.hothash, record.path.display());
    }
}
