use anyhow::Result;
use clap::Parser;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use std::{path::PathBuf, process::ExitCode};

use adreport::{
    discover::{find_input, DEFAULT_PATTERN},
    export::{documents, write_all},
    layout, read_csv, reports, Campaigns, Variant, VARIANTS,
};

#[derive(Parser)]
#[command(version, about)]
/// Turns a daily ad-campaign export into per-category spreadsheet reports.
///
/// Looks for exactly one CSV export in the input directory.
struct Args {
    /// Directory containing the export
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Campaign list file, one `CATEGORY | CAMPAIGN NAME` per line
    /// (defaults to the built-in lists)
    #[arg(short, long)]
    campaigns: Option<PathBuf>,

    /// Regular expression matching the export's file name
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pattern: Regex,

    /// Directory to write reports to (defaults to the input directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Report variant to produce (repeatable; defaults to all)
    #[arg(short, long = "variant", value_parser = parse_variant)]
    variants: Vec<Variant>,
}

fn parse_variant(name: &str) -> Result<Variant, String> {
    layout::variant(name).ok_or_else(|| {
        let known: Vec<_> = VARIANTS.iter().map(|v| v.name).collect();
        format!("unknown variant {name:?} (expected one of: {})", known.join(", "))
    })
}

fn run(args: &Args) -> Result<()> {
    let campaigns = match &args.campaigns {
        Some(path) => Campaigns::from_file(path)?,
        None => Campaigns::builtin(),
    };
    let input = find_input(&args.dir, &args.pattern)?;
    println!("Reading {}", input.display());
    let records = read_csv(&input)?;
    let variants = if args.variants.is_empty() {
        VARIANTS.to_vec()
    } else {
        args.variants.clone()
    };
    let tables = reports(&records, &campaigns, &variants)?;
    println!(
        "Aggregated {} records into {} days",
        records.len(),
        tables.first().map_or(0, |t| t.rows.len())
    );
    let docs = documents(&tables)?;
    let out_dir = args.out_dir.as_ref().unwrap_or(&args.dir);
    for path in write_all(&docs, out_dir)? {
        println!("Report generated: {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
