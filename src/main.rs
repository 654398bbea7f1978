//! Command line front end: converts one MIDI file and prints its chiptune document

use std::{
    backtrace::BacktraceStatus,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use log::LevelFilter;
use midi2chip::document::DEFAULT_MAX_CSV_BYTES;

/// Converts a Standard MIDI File into chiptune note events
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// MIDI file to convert
    midi_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the document to this file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Byte budget of csv-durations output, notes are thinned out to fit
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_CSV_BYTES)]
    max_bytes: usize,

    /// Log more to standard error, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Rendering of the converted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// A single JSON document
    Json,
    /// Run length collapsed CSV rows
    Csv,
    /// CSV rows of held notes and their lengths in ticks
    CsvDurations,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    let Some(midi_file) = args.midi_file.as_deref() else {
        println!("{}", Args::command().render_usage());
        return ExitCode::SUCCESS;
    };

    match run(&args, midi_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to standard error so standard output only ever carries the document or the error
/// report. `RUST_LOG` overrides the verbosity flag
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Converts and renders the whole document before anything is written, so a failure never
/// leaves a partial document behind
fn run(args: &Args, midi_file: &Path) -> Result<()> {
    let rendered = match args.format {
        OutputFormat::Json => {
            let mut json = convert(midi_file)?
                .to_json(args.pretty)
                .context("failed to serialize document")?;
            json.push('\n');
            json.into_bytes()
        }
        OutputFormat::Csv => {
            let mut csv = vec![];
            convert(midi_file)?
                .write_csv(&mut csv)
                .context("failed to render CSV")?;
            csv
        }
        OutputFormat::CsvDurations => {
            let mut csv = vec![];
            midi2chip::convert_durations(midi_file)
                .with_context(|| failed_to_convert(midi_file))?
                .write_csv(&mut csv, args.max_bytes)
                .context("failed to render CSV")?;
            csv
        }
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(&rendered)
            .context("failed to write to standard output")?,
    }

    Ok(())
}

fn convert(midi_file: &Path) -> Result<midi2chip::ChiptuneDocument> {
    midi2chip::convert(midi_file).with_context(|| failed_to_convert(midi_file))
}

fn failed_to_convert(midi_file: &Path) -> String {
    format!("failed to convert {}", midi_file.display())
}

/// Prints the error, its causes and any captured backtrace to standard output
fn report(error: &anyhow::Error) {
    println!("Error: {error}");

    for cause in error.chain().skip(1) {
        println!("Caused by: {cause}");
    }

    let backtrace = error.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        println!("Backtrace:\n{backtrace}");
    }
}
