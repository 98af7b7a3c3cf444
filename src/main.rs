//! CLI entry point for lscsv

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use lscsv::{
    CsvSink, ExcludeSet, InspectOptions, ScanConfig, ScanOutcome, StopFlag, Walker,
    install_handler,
};

#[derive(Parser, Debug)]
#[command(name = "lscsv")]
#[command(about = "Walks directory trees and records per-node metadata as CSV")]
#[command(version)]
struct Args {
    /// Paths to walk, scanned in argument order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output CSV file (stdout if omitted); refuses to overwrite
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Glob pattern to exclude (repeatable). Bare patterns match file
    /// names, patterns containing `/` match the full path
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Store node paths relative to this directory
    #[arg(long = "relative-to", value_name = "PATH")]
    relative_to: Option<PathBuf>,

    /// Pause between node visits (e.g. 250ms, 1s)
    #[arg(long, value_name = "DURATION", value_parser = parse_delay, default_value = "0s")]
    delay: Duration,

    /// Compute a content digest for every regular file
    #[arg(long)]
    hash: bool,

    /// Also write log lines to this file; refuses to overwrite
    #[arg(short = 'l', long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress console logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Parse a throttle duration like "250ms" or "1s".
fn parse_delay(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

/// Resolve a destination that does not exist yet to its canonical path.
///
/// The file itself cannot be canonicalized before it is created, so the
/// parent directory (which must exist) is canonicalized and the file name
/// re-joined. This resolves `..` and symlinked components, keeping the
/// path string-comparable with walked entry paths so self-exclusion holds
/// however the argument was spelled.
fn resolve_destination(path: &Path) -> anyhow::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let name = absolute
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_os_string();
    let parent = absolute.parent().unwrap_or(Path::new("/"));
    let parent = parent
        .canonicalize()
        .with_context(|| format!("cannot resolve directory {}", parent.display()))?;
    Ok(parent.join(name))
}

fn setup_logging(verbose: u8, quiet: bool, log_file: Option<File>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    let console = (!quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    });
    let file = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(ScanOutcome::Completed) => {}
        Ok(ScanOutcome::Interrupted) => process::exit(130),
        Err(err) => {
            eprintln!("lscsv: {:#}", err);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<ScanOutcome> {
    let output_path = args
        .output
        .as_deref()
        .map(resolve_destination)
        .transpose()
        .context("cannot resolve output path")?;
    let log_path = args
        .log
        .as_deref()
        .map(resolve_destination)
        .transpose()
        .context("cannot resolve log path")?;

    // Validate everything before creating any file: a run that cannot
    // start must leave nothing behind, and `create_new` below would block
    // the corrected retry otherwise.
    let mut targets = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let target = path
            .canonicalize()
            .with_context(|| format!("cannot reach scan target {}", path.display()))?;
        targets.push(target);
    }

    let relative_to = args
        .relative_to
        .as_deref()
        .map(|path| {
            path.canonicalize()
                .with_context(|| format!("relative base {} does not exist", path.display()))
        })
        .transpose()?;

    let output_file = output_path
        .as_deref()
        .map(|path| {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .with_context(|| format!("cannot create output file {}", path.display()))
        })
        .transpose()?;
    let log_file = log_path
        .as_deref()
        .map(|path| {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .with_context(|| format!("cannot create log file {}", path.display()))
        })
        .transpose()?;

    setup_logging(args.verbose, args.quiet, log_file);

    // Self-exclusion: the scan must never report the running binary, the
    // CSV it is writing, or its own log file.
    let mut self_paths: Vec<PathBuf> = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        self_paths.push(exe);
    }
    if let Some(path) = &output_path {
        self_paths.push(path.clone());
    }
    if let Some(path) = &log_path {
        self_paths.push(path.clone());
    }
    let self_paths: Vec<&std::path::Path> = self_paths.iter().map(PathBuf::as_path).collect();
    let excludes = ExcludeSet::build(&args.exclude, &self_paths)?;

    let stop = StopFlag::new();
    install_handler(stop.clone()).context("cannot install interrupt handler")?;

    info!("scan targets, in order:");
    for target in &targets {
        info!("- {}", target.display());
    }
    info!(
        delay = %humantime::format_duration(args.delay),
        hash = args.hash,
        output = %output_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdout>".into()),
        "options"
    );
    for pattern in excludes.pattern_strings() {
        info!(pattern, "excluding");
    }

    let config = ScanConfig {
        targets,
        relative_to,
        delay: args.delay,
        inspect: InspectOptions { hash: args.hash },
    };
    let walker = Walker::new(config, excludes, stop);

    let dest: Box<dyn Write> = match output_file {
        Some(file) => Box::new(file),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = CsvSink::new(dest)?;
    let summary = walker.run(&mut sink)?;

    Ok(summary.outcome)
}
