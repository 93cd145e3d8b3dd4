//! slnfgen CLI - Solution filters from the command line.
//!
//! Generates `<entry>.slnf` for a traversal project and opens it in the IDE.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// slnfgen: Generate a solution filter from an MSBuild traversal project.
#[derive(Parser)]
#[command(name = "slnfgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Traversal project to filter by (defaults to dirs.proj)
    entry: Option<PathBuf>,

    /// Legacy tokens: a solution file path selects the solution, `novs` skips the IDE
    extra: Vec<String>,

    /// Solution file to filter (defaults to the nearest one above the entry)
    #[arg(short, long)]
    solution: Option<PathBuf>,

    /// Only write the solution filter, don't open it
    #[arg(long)]
    no_launch: bool,

    /// IDE executable to open the solution filter with
    #[arg(long)]
    launcher: Option<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit code for any failure.
const EXIT_FAILURE: i32 = -1;

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = cli::Args {
        entry: cli.entry,
        extra: cli.extra,
        solution: cli.solution,
        no_launch: cli.no_launch,
        launcher: cli.launcher,
    };

    if let Err(e) = cli::generate::run(args) {
        eprintln!("{}: {e}", "error".red().bold());
        // Show cause chain for nested errors
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  {}: {cause}", "caused by".dimmed());
            source = std::error::Error::source(cause);
        }
        if e.is_locator_error() {
            eprintln!(
                "  {}: name the solution with --solution or a solution file argument",
                "hint".cyan()
            );
        }
        std::process::exit(EXIT_FAILURE);
    }
}
