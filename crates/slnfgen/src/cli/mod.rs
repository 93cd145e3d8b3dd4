//! CLI argument handling and command implementations.

use std::path::{Path, PathBuf};

use slnfgen::{Config, Error};

pub mod generate;

/// Token that suppresses opening the IDE.
const NO_LAUNCH_TOKEN: &str = "novs";

/// Raw command-line input.
#[derive(Debug, Default)]
pub struct Args {
    pub entry: Option<PathBuf>,
    pub extra: Vec<String>,
    pub solution: Option<PathBuf>,
    pub no_launch: bool,
    pub launcher: Option<String>,
}

/// Command-line input after applying positional-token rules and config defaults.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub entry: PathBuf,
    pub solution: Option<PathBuf>,
    pub launch: bool,
}

/// Directory to look for `.slnfgen.yaml` from.
///
/// The configuration isn't known yet, so tokens are classified with the
/// defaults: the start is the directory of whichever token would be the entry
/// project, never of a solution argument.
pub fn config_start(args: &Args) -> PathBuf {
    let entry = interpret(args, &Config::default()).map_or_else(
        |_| args.entry.clone().unwrap_or_default(),
        |invocation| invocation.entry,
    );

    entry
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Interpret positional tokens.
///
/// The first plain token is the entry project. Tokens ending in the solution
/// extension select the solution and `novs` disables launching, wherever they
/// appear.
pub fn interpret(args: &Args, config: &Config) -> Result<Invocation, Error> {
    let solution_suffix = format!(".{}", config.solution_extension().to_ascii_lowercase());

    let mut entry = None;
    let mut solution = args.solution.clone();
    let mut launch = !args.no_launch;

    let tokens = args
        .entry
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .chain(args.extra.iter().cloned());

    for token in tokens {
        if token.eq_ignore_ascii_case(NO_LAUNCH_TOKEN) {
            launch = false;
        } else if token.to_ascii_lowercase().ends_with(&solution_suffix) {
            if solution.is_some() {
                return Err(Error::Config(format!(
                    "more than one solution given (extra: {token})"
                )));
            }
            solution = Some(PathBuf::from(token));
        } else if entry.is_none() {
            entry = Some(PathBuf::from(token));
        } else {
            return Err(Error::Config(format!("unexpected argument: {token}")));
        }
    }

    Ok(Invocation {
        entry: entry.unwrap_or_else(|| PathBuf::from(config.default_entry())),
        solution,
        launch,
    })
}
