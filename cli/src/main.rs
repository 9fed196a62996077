//! docxtext CLI - print the text of a Word document
//!
//! Writes every body paragraph, a separator block, and every table row of
//! one document to standard output.

use clap::{ArgAction, Parser};
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

/// Print the paragraphs and tables of a Word document as plain text
#[derive(Parser)]
#[command(
    name = "docxtext",
    version,
    about = "Print the paragraphs and tables of a Word document",
    long_about = "docxtext - plain-text export of a Word document.\n\n\
                  Prints every paragraph on its own line, then the line\n\
                  '=== TABLES (if any) ===', then each table row with its\n\
                  cells joined by ' | ' and a '---' line after each table."
)]
struct Cli {
    /// Input document path (.docx, .docm, .dotx, .dotm)
    input: PathBuf,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr. RUST_LOG, when set, overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("reading {}", cli.input.display());

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    docxtext::export_file(&cli.input, &mut handle)?;
    handle.flush()?;

    Ok(())
}
