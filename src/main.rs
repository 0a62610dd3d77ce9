//! Reactsheet - seed a reactive sheet and print a grid snapshot

use anyhow::{Context, bail};
use reactsheet_core::Sheet;
use reactsheet_core::storage::{
    SnapshotFormat, SnapshotOptions, load_seed, render_snapshot, write_seed,
};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: reactsheet [OPTIONS] [SEED_FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SEED_FILE]               Cell definitions, one 'REF: RAW' per line");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <REF=RAW>       Set a cell (can be repeated)");
    eprintln!("  --rows <N>                Rows to print (default: 5)");
    eprintln!("  --cols <N>                Columns to print (default: 5)");
    eprintln!("  --markdown                Print the snapshot as a Markdown table");
    eprintln!("  --demo                    Replay the built-in demonstration");
    eprintln!("  -o, --output <FILE>       Write cell definitions to a seed file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace recomputation.");
}

#[derive(Debug, Default)]
struct DriverOptions {
    seed_file: Option<PathBuf>,
    sets: Vec<(String, String)>,
    snapshot: SnapshotOptions,
    demo: bool,
    output_file: Option<PathBuf>,
}

enum Command {
    Run(DriverOptions),
    Help,
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut options = DriverOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-s" | "--set" => {
                let value = next_value(args, &mut i, "--set")?;
                let Some((reference, raw)) = value.split_once('=') else {
                    bail!("--set expects REF=RAW, got {:?}", value);
                };
                options.sets.push((reference.to_string(), raw.to_string()));
            }
            "--rows" => {
                let value = next_value(args, &mut i, "--rows")?;
                options.snapshot.rows = value
                    .parse()
                    .with_context(|| format!("--rows expects a number, got {:?}", value))?;
            }
            "--cols" => {
                let value = next_value(args, &mut i, "--cols")?;
                options.snapshot.cols = value
                    .parse()
                    .with_context(|| format!("--cols expects a number, got {:?}", value))?;
            }
            "--markdown" => options.snapshot.format = SnapshotFormat::Markdown,
            "--demo" => options.demo = true,
            "-o" | "--output" => {
                options.output_file = Some(PathBuf::from(next_value(args, &mut i, "--output")?));
            }
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            _ => {
                if options.seed_file.is_some() {
                    bail!("Unexpected argument: {}", args[i]);
                }
                options.seed_file = Some(PathBuf::from(&args[i]));
            }
        }
        i += 1;
    }

    Ok(Command::Run(options))
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires a value", flag),
    }
}

fn run(options: DriverOptions) -> anyhow::Result<()> {
    let sheet = match &options.seed_file {
        Some(path) => load_seed(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Sheet::new(),
    };
    info!(cells = sheet.len(), "sheet ready");

    if options.demo || (options.seed_file.is_none() && options.sets.is_empty()) {
        run_demo(&sheet, &options.snapshot)?;
    } else {
        for (reference, raw) in &options.sets {
            sheet
                .set(reference, raw)
                .with_context(|| format!("cannot set {}", reference))?;
        }
        print!("{}", render_snapshot(&sheet, &options.snapshot));
    }

    if let Some(path) = &options.output_file {
        write_seed(path, &sheet).with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Saved to {}", path.display());
    }

    Ok(())
}

/// Seed a small chain, change its root, then introduce a cycle.
fn run_demo(sheet: &Sheet, snapshot: &SnapshotOptions) -> anyhow::Result<()> {
    sheet.set_many([
        ("A1", "5"),
        ("B1", "10"),
        ("C1", "=A1+B1"),
        ("D1", "=C1*2"),
        ("E1", "=D1/A1"),
    ])?;
    println!("initial sheet");
    print!("{}", render_snapshot(sheet, snapshot));

    sheet.set("A1", "20")?;
    println!("\nafter A1=20");
    print!("{}", render_snapshot(sheet, snapshot));

    sheet.set("B2", "=C2")?;
    sheet.set("C2", "=B2")?;
    println!("\nwith cycle (B2<->C2)");
    print!("{}", render_snapshot(sheet, snapshot));

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
