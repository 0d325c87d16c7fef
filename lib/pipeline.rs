//! Packaging pipeline.
//!
//! A run walks `Start → Configure → IdentifyMod → BuildManifest → Invoke →
//! Cleanup → Done`. Any error ends the run at the stage it occurred in; the
//! caller reports it and decides how to exit.

use crate::constants::STARTUP_MESSAGE_FILE;
use crate::error::PakResult;
use crate::identity::{ModPackageRequest, derive_index, resolve_mod_directory};
use crate::manifest::{manifest_line, write_manifest};
use crate::packager::{PackagerCommand, invoke, packager_path};
use crate::prompt::LineSource;
use crate::settings::{
    PackagingConfiguration, SettingsBackend, SettingsOverrides, SettingsStore,
    resolve_configuration,
};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use walkdir::WalkDir;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Configure,
    IdentifyMod,
    BuildManifest,
    Invoke,
    Cleanup,
    Done,
}

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Raw mod directory argument.
    pub mod_dir: Option<String>,

    /// Legacy `-forcedIndex` / `-index=<N>` tokens.
    pub legacy_args: Vec<String>,

    /// Index given through `--index`; wins over legacy tokens.
    pub index: Option<i32>,

    /// Per-run setting overrides.
    pub overrides: SettingsOverrides,

    /// Directory holding the startup banner.
    pub config_dir: PathBuf,

    /// Where the transient manifest is written.
    pub manifest_path: PathBuf,

    /// Stop after printing what would be run.
    pub dry_run: bool,
}

/// File count and total size of a mod tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModSummary {
    pub files: usize,
    pub bytes: u64,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct PackOutcome {
    pub configuration: PackagingConfiguration,
    pub request: ModPackageRequest,
    pub command: PackagerCommand,

    /// Packager exit status. `None` for a dry run.
    pub exit_status: Option<ExitStatus>,

    /// Size of the produced archive, if it exists after the run.
    pub archive_size: Option<u64>,
}

/// Drives a single packaging run.
pub struct Pipeline<B, L> {
    store: SettingsStore<B>,
    lines: L,
    options: PipelineOptions,
    stage: Stage,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<B: SettingsBackend, L: LineSource> Pipeline<B, L> {
    pub fn new(store: SettingsStore<B>, lines: L, options: PipelineOptions) -> Self {
        Self {
            store,
            lines,
            options,
            stage: Stage::Start,
        }
    }

    /// Current stage, or the stage a failed run stopped in.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Run every stage in order.
    pub fn run(&mut self) -> PakResult<PackOutcome> {
        self.enter(Stage::Start);
        print_banner(
            &self.options.config_dir.join(STARTUP_MESSAGE_FILE),
            &mut std::io::stdout(),
        )?;

        self.enter(Stage::Configure);
        let configuration =
            resolve_configuration(&mut self.store, &mut self.lines, &self.options.overrides)?;
        let program = packager_path(&configuration.engine_dir);
        println!(
            "[UnrealPak] Unreal Engine Directory: {}",
            configuration.engine_dir.display()
        );
        println!("[UnrealPak] Unreal Pak: {}", program.display());

        self.enter(Stage::IdentifyMod);
        let source_dir = resolve_mod_directory(self.options.mod_dir.as_deref())?;
        let index = match self.options.index {
            Some(index) => index,
            None => derive_index(&self.options.legacy_args, &mut self.lines)?,
        };
        let request = ModPackageRequest::new(source_dir, index, &configuration.output_dir);
        let command = PackagerCommand::new(
            program,
            &request.output_file,
            &self.options.manifest_path,
            &configuration.flags,
        );

        if self.options.dry_run {
            println!();
            println!("  {} {}", "Manifest:".bright_cyan(), manifest_line(&request.source_dir));
            println!("  {} {}", "Command:".bright_cyan(), command.command_line());
            self.enter(Stage::Done);
            return Ok(PackOutcome {
                configuration,
                request,
                command,
                exit_status: None,
                archive_size: None,
            });
        }

        self.enter(Stage::BuildManifest);
        let summary = summarize_mod(&request.source_dir);
        println!(
            "\n  {} {} ({} files, {})",
            "Packing".bright_cyan(),
            request.name.bright_white(),
            summary.files,
            format_size(summary.bytes)
        );
        let manifest = write_manifest(&self.options.manifest_path, &request.source_dir)?;

        self.enter(Stage::Invoke);
        println!("\nStarting packaging process...");
        let result = invoke(&command, manifest);

        self.enter(Stage::Cleanup);
        let status = result?;
        let archive_size = std::fs::metadata(&request.output_file)
            .ok()
            .map(|m| m.len());
        report_archive(&request.output_file, archive_size);

        self.enter(Stage::Done);
        Ok(PackOutcome {
            configuration,
            request,
            command,
            exit_status: Some(status),
            archive_size,
        })
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!("{:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Write the startup banner to `out`, if one exists, followed by a blank line.
pub fn print_banner(path: &Path, out: &mut impl Write) -> PakResult<()> {
    if !path.is_file() {
        return Ok(());
    }

    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Count the files under `dir` and add up their sizes.
///
/// Unreadable entries are skipped.
pub fn summarize_mod(dir: &Path) -> ModSummary {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .fold(ModSummary::default(), |mut summary, entry| {
            summary.files += 1;
            summary.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            summary
        })
}

fn report_archive(path: &Path, size: Option<u64>) {
    match size {
        Some(size) => println!(
            "\n  {} Created {} ({})",
            "✓".bright_green(),
            path.display().to_string().bright_green(),
            format_size(size)
        ),
        None => println!(
            "\n  {} No archive found at {}",
            "!".bright_yellow(),
            path.display().to_string().bright_yellow()
        ),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1_000 {
        format!("{} B", bytes)
    } else if bytes < 1_000_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
