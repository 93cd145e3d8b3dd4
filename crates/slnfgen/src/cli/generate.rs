//! Default command: write the solution filter, then open it.

use colored::Colorize;
use slnfgen::{
    Config, Generation, IdeLauncher, ProcessLauncher, SlnfGen, manifest_path_for,
};

use super::{Args, config_start, interpret};

/// Run the generate command.
pub fn run(args: Args) -> Result<(), slnfgen::Error> {
    let config = Config::discover(&config_start(&args))?;
    let invocation = interpret(&args, &config)?;

    let generator = SlnfGen::from_config(&config);
    let generation = generator.generate(&invocation.entry, invocation.solution.as_deref())?;

    print_diagnostics(&generation, config.solution_extension());

    if !invocation.launch {
        // Show the path the way the user spelled the entry.
        let shown = manifest_path_for(&invocation.entry);
        println!("{} {}", "Wrote".green().bold(), shown.display());
        return Ok(());
    }

    let launcher = ProcessLauncher::from_config(&config.launcher, args.launcher.as_deref());
    println!("{}", launcher.command_line(&generation.manifest_path));
    launcher.launch(&generation.manifest_path)
}

fn print_diagnostics(generation: &Generation, extension: &str) {
    if let Some(ambiguity) = &generation.location.ambiguity {
        let chosen = ambiguity
            .chosen
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        println!(
            "{}: more than one .{extension} found in {}! Using {chosen}",
            "warning".yellow().bold(),
            ambiguity.directory.display(),
        );
    }

    let report = &generation.report;
    if report.solution.exists {
        println!("Using '{}':", report.solution.path);
    } else {
        println!(
            "{}: {}",
            "Solution file doesn't exist".red(),
            report.solution.path
        );
    }

    for project in &report.projects {
        if project.exists {
            println!("  {} {}", "Discovered".dimmed(), project.path);
        } else {
            println!(
                "  {}: {}",
                "Project file doesn't exist".red(),
                project.path
            );
        }
    }
}
