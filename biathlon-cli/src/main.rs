//! Biathlon Results CLI Application
//!
//! This is the command-line interface for the biathlon race processor.
//! It uses the biathlon-core library and adds:
//! - Command-line flags
//! - Configuration file loading
//! - Narration and report sinks (console and files)

use anyhow::{Context, Result};
use biathlon_core::{RaceProcessor, Standings};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;

/// Biathlon Results - Narrate a race event log and build the standings
#[derive(Parser, Debug)]
#[command(name = "biathlon")]
#[command(about = "Process biathlon race events into a narrated log and final report", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the race configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Path to the incoming events file
    #[arg(short, long, value_name = "FILE")]
    events: PathBuf,

    /// Output file for the narrated event log (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report file; the report is always printed to stdout as well
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Biathlon Results CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using race library v{}", biathlon_core::VERSION);

    log::info!("Loading configuration from: {:?}", args.config);
    let race_config = config::load_config(&args.config)?;
    log::debug!("Configuration loaded: {:?}", race_config);

    let events = File::open(&args.events)
        .with_context(|| format!("open events file error: {:?}", args.events))?;

    let mut processor = RaceProcessor::new(race_config);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Creating log file error: {:?}", path))?;
            let mut sink = BufWriter::new(file);
            processor
                .process_log(BufReader::new(events), &mut sink)
                .context("processing events error")?;
            log::info!("Narration written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            processor
                .process_log(BufReader::new(events), &mut sink)
                .context("processing events error")?;
        }
    }

    let standings = processor.standings();
    write_report(&standings, args.report.as_deref())?;

    Ok(())
}

/// Print the report to stdout, and to `path` when given
fn write_report(standings: &Standings, path: Option<&Path>) -> Result<()> {
    let stdout = io::stdout();
    let mut console = stdout.lock();
    writeln!(console)?;
    standings.write_to(&mut console)?;

    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Creating report file error: {:?}", path))?;
    standings
        .write_to(&mut BufWriter::new(file))
        .with_context(|| format!("Writing report file error: {:?}", path))?;

    log::info!("Report with {} competitors written to {:?}", standings.len(), path);
    Ok(())
}

/// Level forced by the command line; `None` defers to `RUST_LOG`
fn forced_level(verbose: u8, quiet: bool) -> Option<log::LevelFilter> {
    use log::LevelFilter;

    match (quiet, verbose) {
        (true, _) => Some(LevelFilter::Error),
        (false, 0) => None,
        (false, 1) => Some(LevelFilter::Debug),
        (false, _) => Some(LevelFilter::Trace),
    }
}

/// Log to stderr so narration and report on stdout stay clean
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::{Builder, Env, Target};

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = forced_level(verbose, quiet) {
        builder.filter_level(level);
    }

    builder
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(buf, "{:<5} {}: {}", record.level(), record.target(), record.args())
        })
        .init();
}
