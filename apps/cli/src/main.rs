// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: extract stakeout points from a piping model snapshot
//!
//! Reads a JSON snapshot of part records (connectors, joins, sizes), runs the
//! extraction pipeline and writes a survey point file.
//!
//! Usage:
//!   pipestake <snapshot.json> [options]

use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use pipestake_core::{
    extract_from_snapshot, name_points, write_csv, write_json, ModelSnapshot, StakeoutConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn default_path(self) -> &'static str {
        match self {
            OutputFormat::Csv => "stakeout.csv",
            OutputFormat::Json => "stakeout.json",
        }
    }
}

#[derive(Debug)]
struct Options {
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: Option<PathBuf>,
    sequential: bool,
    verbose: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    init_logging(options.verbose);

    // Anything that escapes the engine is reported here, never half-written
    match panic::catch_unwind(|| run(&options)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            eprintln!("Fatal: stakeout extraction aborted: {message}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut iter = args.iter();
    let input = match iter.next() {
        Some(path) if !path.starts_with("--") => PathBuf::from(path),
        _ => bail!("missing snapshot path"),
    };

    let mut options = Options {
        input,
        output: None,
        format: OutputFormat::Csv,
        config: None,
        sequential: false,
        verbose: false,
    };

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                let path = iter.next().context("--output needs a path")?;
                options.output = Some(PathBuf::from(path));
            }
            "--format" => {
                options.format = match iter.next().map(String::as_str) {
                    Some("csv") => OutputFormat::Csv,
                    Some("json") => OutputFormat::Json,
                    Some(other) => bail!("unknown format '{other}' (expected csv or json)"),
                    None => bail!("--format needs a value"),
                };
            }
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--sequential" => options.sequential = true,
            "--verbose" | "-v" => options.verbose = true,
            other => bail!("unknown option: {other}"),
        }
    }

    Ok(options)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "debug"
    } else {
        "warn,pipestake_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(options: &Options) -> Result<StakeoutConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => StakeoutConfig::from_env(),
    };
    if options.sequential {
        config.parallel = false;
    }
    Ok(config)
}

fn run(options: &Options) -> Result<()> {
    println!("=== Pipe Stakeout Point Export ===");
    println!();

    println!("[1/3] Loading snapshot: {}", options.input.display());
    let config = load_config(options)?;
    let snapshot = ModelSnapshot::from_path(&options.input)
        .with_context(|| format!("cannot load snapshot '{}'", options.input.display()))?;
    println!("  Parts: {}", snapshot.parts.len());

    println!("[2/3] Extracting points...");
    let report = extract_from_snapshot(&snapshot, &config)?;
    let stats = &report.stats;
    println!(
        "  Runs: {} regular, {} short; risers: {}; skipped: {}",
        stats.classify.regular,
        stats.classify.short,
        stats.classify.risers,
        stats.classify.missing_geometry
    );
    println!(
        "  Junctions: {}, riser landings: {}, open ends: {}, merged: {}",
        stats.junctions, stats.riser_points, stats.open_ends, stats.merged
    );

    if report.is_empty() {
        println!();
        println!("No stakeout points found");
        return Ok(());
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(options.format.default_path()));
    println!("[3/3] Writing {} points to {}", report.points.len(), output.display());

    let named = name_points(&report.points);
    let file = File::create(&output)
        .with_context(|| format!("cannot create '{}'", output.display()))?;
    let writer = BufWriter::new(file);
    match options.format {
        OutputFormat::Csv => write_csv(writer, &named)?,
        OutputFormat::Json => write_json(writer, &named)?,
    }

    println!();
    println!("Done.");
    Ok(())
}

fn print_usage() {
    println!("Usage: pipestake <snapshot.json> [options]");
    println!();
    println!("Options:");
    println!("  --output, -o <path>   Output file (default: stakeout.csv / stakeout.json)");
    println!("  --format <csv|json>   Output format (default: csv)");
    println!("  --config <path>       JSON file with extraction tolerances");
    println!("  --sequential          Disable parallel junction detection");
    println!("  --verbose, -v         Debug logging");
    println!();
    println!("Without --config, tolerances come from PIPESTAKE_* environment variables.");
}
