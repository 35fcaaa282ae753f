//! # turnpack CLI
//!
//! Command-line interface for the turnpack library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use turnpack::TurnpackError;
use turnpack::cli::Args;
use turnpack::core::Report;
use turnpack::format::{OutputFormat, write_to_format};
use turnpack::source::{InputFormat, open_records};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Diagnostics go to stderr so they never mix with the progress lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<(), TurnpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let output_path = args.output_path();
    let lib_format: OutputFormat = args.format.into();

    // Print header
    println!("📦 turnpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", lib_format);
    println!("🔢 Turns:   up to {}", args.max_turns);

    let filter = args.record_filter()?;
    if let Some(ref field) = filter.field {
        println!("🗂️  Field:   {}", field);
    }
    if let Some(after) = filter.after {
        println!("📅 From:    {}", after.to_rfc3339());
    }
    if let Some(before) = filter.before {
        println!("📅 To:      {}", before.to_rfc3339());
    }
    if !filter.is_active() && (filter.after.is_some() || filter.before.is_some()) {
        println!("⚠️  Date bounds ignored: no --date-field given");
    }

    println!();

    // Step 1: Open the export
    let input_format = match args.input_format() {
        Some(format) => format,
        None => InputFormat::detect(&args.input)?,
    };
    println!("⏳ Reading {}...", input_format);

    let mut read_count = 0usize;
    let records = open_records(&args.input, Some(input_format), args.source_config())?
        .inspect(|record| {
            if record.is_ok() {
                read_count += 1;
            }
        });

    // Step 2: Filter, locate, normalize and pack every record
    let build_start = Instant::now();
    let report = Report::try_build(records, &filter, &args.export_config())?;
    let build_time = build_start.elapsed();
    let stats = report.stats();

    println!(
        "   Read {} records, kept {} ({:.2}s)",
        read_count,
        stats.records,
        build_time.as_secs_f64()
    );

    // Step 3: Write the wide table
    println!("💾 Writing {}...", lib_format);
    let write_start = Instant::now();
    write_to_format(&report, &output_path, lib_format, &args.output_config())?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Records:   {}", stats.records);
    println!("   Messages:  {} raw", stats.raw_messages);
    println!(
        "   Turns:     {} (max {}, avg {:.1})",
        stats.turns,
        stats.max_turns,
        stats.avg_turns()
    );
    if stats.fallback_records > 0 {
        println!("   Fallback:  {} records from flat fields", stats.fallback_records);
    }

    // Performance stats
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let records_per_sec = read_count as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} records/sec", records_per_sec);

    Ok(())
}
