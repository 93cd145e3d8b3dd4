//! Opening a solution filter in the IDE.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::{DEFAULT_LAUNCHER, LauncherConfig};
use crate::error::{Error, Result};

/// Something that can open a solution filter.
pub trait IdeLauncher {
    /// The command line that [`IdeLauncher::launch`] runs, for display.
    fn command_line(&self, manifest: &Path) -> String;

    /// Open `manifest` without waiting for the IDE to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the IDE process cannot be started.
    fn launch(&self, manifest: &Path) -> Result<()>;
}

/// Launches an IDE executable found on `PATH` (or given by path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessLauncher {
    program: String,
    args: Vec<String>,
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_LAUNCHER, Vec::new())
    }
}

impl ProcessLauncher {
    /// Create a launcher running `program` with leading `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Create a launcher from configuration, with an optional program override.
    #[must_use]
    pub fn from_config(config: &LauncherConfig, program_override: Option<&str>) -> Self {
        let program = program_override
            .or(config.program.as_deref())
            .unwrap_or(DEFAULT_LAUNCHER);
        Self::new(program, config.args.clone())
    }

    /// The configured program name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Locate the executable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LauncherNotFound`] if the program isn't on `PATH`.
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|e| {
            debug!(program = %self.program, error = %e, "Launcher lookup failed");
            Error::LauncherNotFound {
                program: self.program.clone(),
            }
        })
    }
}

impl IdeLauncher for ProcessLauncher {
    fn command_line(&self, manifest: &Path) -> String {
        let program = self
            .resolve()
            .map_or_else(|_| self.program.clone(), |p| p.display().to_string());
        let mut parts = vec![program];
        parts.extend(self.args.iter().cloned());
        parts.push(manifest.display().to_string());
        parts.join(" ")
    }

    fn launch(&self, manifest: &Path) -> Result<()> {
        let program = self.resolve()?;

        debug!(
            program = %program.display(),
            args = ?self.args,
            manifest = %manifest.display(),
            "Launching IDE"
        );

        Command::new(&program)
            .args(&self.args)
            .arg(manifest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::LauncherNotFound {
                        program: self.program.clone(),
                    }
                } else {
                    Error::Launch {
                        program: self.program.clone(),
                        source: e,
                    }
                }
            })?;

        Ok(())
    }
}
