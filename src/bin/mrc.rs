//! Command-line mask rule checker.
//!
//! Reads a layout (PGM image or GDSII database), runs the configured
//! rule checks and writes a JSON violation report.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use maskcheck::report::Report;
use maskcheck::{convert, run, Config};

#[derive(Parser)]
#[command(name = "mrc", version, about = "Mask rule checking for rectilinear layouts")]
struct Args {
    /// Input layout: a PGM mask image or a GDSII database
    input: PathBuf,
    /// Output violation report (JSON)
    output: PathBuf,
    /// Rule configuration file (key: value lines)
    rules: PathBuf,
}

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // Usage errors exit 1; --help and --version exit 0.
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(err) = run_check(&args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run_check(args: &Args) -> anyhow::Result<()> {
    let config = Config::from_rule_file(&args.rules)
        .with_context(|| format!("loading rule file {}", args.rules.display()))?;

    println!("Configuration:");
    println!("  Input file: {}", args.input.display());
    println!("  Rule distance: {}", config.rule_distance);
    println!("  Sampling multiplier: {}", config.sampling_multiplier);
    if config.threads == 0 {
        println!("  Threads: auto");
    } else {
        println!("  Threads: {}", config.threads);
    }
    println!(
        "  Space check: {}",
        if config.space_check { "enabled" } else { "disabled" }
    );
    println!(
        "  Width check: {}",
        if config.width_check { "enabled" } else { "disabled" }
    );
    println!(
        "  Parallel: {}",
        if config.parallel { "enabled" } else { "disabled" }
    );

    let polygons = convert::decode(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    println!("\nPolygons extracted: {}", polygons.len());

    let started = Instant::now();
    let results = run(&polygons, &config)?;
    let elapsed = started.elapsed();

    println!("\nResults:");
    println!("  Execution time: {} ms", elapsed.as_millis());
    println!(
        "  Space violations (type a): {}",
        results.space_violations_type_a.len()
    );
    println!(
        "  Space violations (type b): {}",
        results.space_violations_type_b.len()
    );
    println!("  Width violations: {}", results.width_violations.len());
    println!("  Total violations: {}", results.total_violations());

    let report = Report::new(&results, elapsed.as_millis() as u64);
    report
        .write_to(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("\nReport written to {}", args.output.display());

    Ok(())
}
