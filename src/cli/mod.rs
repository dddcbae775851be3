//! # CLI Module
//!
//! Command-line interface for range-gen.
//!
//! ## Usage
//! ```bash
//! # Cut scenes where the digest distance reaches 120
//! range-gen ./frames ./ranges.txt 120
//!
//! # Four workers, noise level 5 on every range
//! range-gen -j 4 -n 5 ./frames ./ranges.txt 120
//!
//! # JPEG frames, JSON summary on stdout
//! range-gen --ext jpg --format json ./frames ./ranges.txt 120
//! ```

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use range_gen::core::hasher::HashAlgorithmKind;
use range_gen::core::pipeline::{CancellationToken, Pipeline, PipelineResult};
use range_gen::core::segmenter::parse_threshold;
use range_gen::error::{ConfigError, RangeGenError, Result};
use std::ffi::OsString;
use range_gen::events::{Event, EventChannel, HashEvent, PipelineEvent};
use std::path::PathBuf;
use std::thread;
use tracing::warn;

/// Creates a list of scene ranges based on a set of frames from the video
#[derive(Parser, Debug)]
#[command(name = "range-gen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory with frame images
    input_dir: PathBuf,

    /// Range list file
    output_file: PathBuf,

    /// Image similarity threshold (0-960 with the default 16x16 blockhash)
    #[arg(allow_negative_numbers = true)]
    threshold: String,

    /// Allow N jobs at once (0 = number of CPUs)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    jobs: usize,

    /// Default noise level for each range
    #[arg(short, long, value_name = "N")]
    noise: Option<u32>,

    /// Hash algorithm to use
    #[arg(short, long, default_value = "blockhash")]
    algorithm: Algorithm,

    /// Hash grid size (digest has size*size bits)
    #[arg(long, default_value_t = 16)]
    hash_size: u32,

    /// Frame file extension to accept (repeatable, default png)
    #[arg(short, long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Summary format
    #[arg(short, long, default_value = "pretty")]
    format: SummaryFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Blockhash (thresholds are tuned for it)
    Blockhash,
    /// Mean hash
    Mean,
    /// Gradient hash
    Gradient,
    /// Horizontal and vertical gradient hash
    DoubleGradient,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Blockhash => HashAlgorithmKind::Blockhash,
            Algorithm::Mean => HashAlgorithmKind::Mean,
            Algorithm::Gradient => HashAlgorithmKind::Gradient,
            Algorithm::DoubleGradient => HashAlgorithmKind::DoubleGradient,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummaryFormat {
    /// Progress bar and a short human-readable summary
    Pretty,
    /// JSON summary on stdout
    Json,
    /// Errors only
    Quiet,
}

/// Parse arguments; usage errors are configuration errors (exit code 1).
///
/// `--help` and `--version` print and exit immediately.
fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            e.print().ok();
            ConfigError::InvalidArguments.into()
        }
    })
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = parse_args(std::env::args_os())?;
    range_gen::init_tracing(cli.verbose);

    let threshold = parse_threshold(&cli.threshold)?;

    let mut builder = Pipeline::builder()
        .input_dir(&cli.input_dir)
        .output(&cli.output_file)
        .threshold(threshold)
        .jobs(cli.jobs)
        .noise(cli.noise)
        .algorithm(cli.algorithm.into())
        .hash_size(cli.hash_size);
    if !cli.extensions.is_empty() {
        builder = builder.extensions(cli.extensions.clone());
    }
    let pipeline = builder.build()?;

    let cancel = CancellationToken::new();
    install_signal_handler(&cancel);

    let term = Term::stderr();
    let pretty = matches!(cli.format, SummaryFormat::Pretty);

    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
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
    let verbose = cli.verbose;

    let event_thread = thread::spawn(move || {
        let Some(pb) = progress_clone else {
            // Drain so senders never notice a missing reader.
            for _ in receiver.iter() {}
            return;
        };
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Hash(HashEvent::Started { total_frames, .. }) => {
                    pb.set_length(total_frames as u64);
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(p.current_frame);
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Cancelled) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender, &cancel);

    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let result = match result {
        Ok(result) => result,
        Err(RangeGenError::Cancelled) => {
            println!("Closed by SIGINT");
            return Err(RangeGenError::Cancelled);
        }
        Err(e) => return Err(e),
    };

    match cli.format {
        SummaryFormat::Pretty => print_pretty_summary(&term, &cli, &result),
        SummaryFormat::Json => print_json_summary(&cli, &result),
        SummaryFormat::Quiet => {}
    }

    Ok(())
}

/// First Ctrl+C / SIGTERM cancels the run, a second one exits immediately.
fn install_signal_handler(cancel: &CancellationToken) {
    let handler_token = cancel.clone();
    let installed = ctrlc::set_handler(move || {
        if handler_token.cancel() {
            std::process::exit(130);
        }
    });
    if let Err(e) = installed {
        warn!("could not install interrupt handler: {}", e);
    }
}

fn print_pretty_summary(term: &Term, cli: &Cli, result: &PipelineResult) {
    term.write_line(&format!(
        "{} {} ranges from {} frames in {:.1}s",
        style("✓").green().bold(),
        style(result.ranges.len()).cyan(),
        style(result.hashed_frames).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    if !result.failures.is_empty() {
        term.write_line(&format!(
            "  {} {} frames could not be hashed and are missing from the ranges:",
            style("!").yellow().bold(),
            style(result.failures.len()).yellow()
        ))
        .ok();
        for failure in &result.failures {
            term.write_line(&format!("    {}", style(&failure.error).dim()))
                .ok();
        }
    }

    for error in &result.scan_errors {
        term.write_line(&format!("  {} {}", style("!").yellow().bold(), error))
            .ok();
    }

    term.write_line(&format!(
        "  written to {}",
        style(cli.output_file.display()).dim()
    ))
    .ok();
}

fn print_json_summary(cli: &Cli, result: &PipelineResult) {
    let output = serde_json::json!({
        "output": cli.output_file,
        "summary": result.summary(),
        "failures": result.failures.iter().map(|f| {
            serde_json::json!({
                "frame": f.frame,
                "path": f.path,
                "error": f.error.to_string(),
            })
        }).collect::<Vec<_>>(),
        "scan_errors": result.scan_errors,
    });

    println!("{:#}", output);
}
