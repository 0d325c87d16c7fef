//! UnrealPak invocation.
//!
//! The packager runs as a blocking child process that inherits the console.
//! Only a failure to start it is an error; its exit status is logged and
//! handed back to the caller without being interpreted.

use crate::constants::PACKAGER_RELATIVE_PATH;
use crate::error::{PakError, PakResult};
use crate::manifest::ManifestGuard;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A single packager run: `<packager> "<archive>" -create="<manifest>" <flags>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerCommand {
    program: PathBuf,
    output_file: PathBuf,
    manifest: PathBuf,
    flags: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PackagerCommand {
    pub fn new(
        program: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        manifest: impl Into<PathBuf>,
        flags: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            output_file: output_file.into(),
            manifest: manifest.into(),
            flags: flags.into(),
        }
    }

    /// Packager executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argument vector passed to the packager on platforms without a raw
    /// command line. Flags are split on whitespace and otherwise untouched,
    /// so a quoted flag such as `-cryptokeys="a b.json"` becomes two
    /// arguments. Windows passes the flags verbatim (see [`Self::command_line`]).
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.output_file.display().to_string(),
            format!("-create={}", self.manifest.display()),
        ];
        args.extend(self.flags.split_whitespace().map(str::to_string));
        args
    }

    /// The command line as the packager receives it on Windows.
    pub fn command_line(&self) -> String {
        let line = format!(
            "{} \"{}\" -create=\"{}\" {}",
            self.program.display(),
            self.output_file.display(),
            self.manifest.display(),
            self.flags
        );
        line.trim_end().to_string()
    }

    /// Fail with [`PakError::PackagerNotFound`] unless the executable exists.
    pub fn ensure_exists(&self) -> PakResult<()> {
        if self.program.is_file() {
            Ok(())
        } else {
            Err(PakError::PackagerNotFound(self.program.clone()))
        }
    }

    /// Launch the packager and block until it exits.
    pub fn run(&self) -> PakResult<ExitStatus> {
        self.ensure_exists()?;

        tracing::info!("Launching {}", self.command_line());
        let mut child = self
            .to_command()
            .spawn()
            .map_err(|source| PakError::Launch {
                path: self.program.clone(),
                source,
            })?;

        let status = child.wait()?;
        tracing::info!("Packager exited with {}", status);

        Ok(status)
    }

    #[cfg(windows)]
    fn to_command(&self) -> Command {
        use std::os::windows::process::CommandExt;

        let mut cmd = Command::new(&self.program);
        cmd.raw_arg(format!("\"{}\"", self.output_file.display()))
            .raw_arg(format!("-create=\"{}\"", self.manifest.display()));
        if !self.flags.trim().is_empty() {
            cmd.raw_arg(&self.flags);
        }
        cmd
    }

    #[cfg(not(windows))]
    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args());
        cmd
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Packager location inside an engine installation.
pub fn packager_path(engine_dir: &Path) -> PathBuf {
    PACKAGER_RELATIVE_PATH
        .iter()
        .fold(engine_dir.to_path_buf(), |path, part| path.join(part))
}

/// Run `command` against the manifest held by `manifest`.
///
/// The manifest is deleted when this returns, whatever the outcome.
pub fn invoke(command: &PackagerCommand, manifest: ManifestGuard) -> PakResult<ExitStatus> {
    let result = command.run();
    drop(manifest);
    result
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
