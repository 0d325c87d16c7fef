//! CLI command definitions.

use crate::constants::{FORCED_INDEX_FLAG, INDEX_ARG_PREFIX};
use crate::pipeline::PipelineOptions;
use crate::settings::SettingsOverrides;
use crate::styles::styles;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const CLI_EXAMPLES: &str = "\
Examples:
  modpak \"C:\\ModFiles\\CookieHat\"                 Pack a mod, prompting for its index
  modpak ./CookieHat --index 3                     Pack with a fixed index
  modpak ./CookieHat -forcedIndex -index=3         Same, legacy form
  modpak ./CookieHat --flags \"-compress -encrypt\"  Override packaging flags for this run
  modpak ./CookieHat --packaged                    Write into ./Packaged
  modpak ./CookieHat --index 3 --dry-run           Show the manifest and command only";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// modpak - Pack a mod directory with UnrealPak.
#[derive(Debug, Parser)]
#[command(name = "modpak", author, version, styles=styles())]
#[command(
    about = "Pack a mod directory into a pak archive with UnrealPak",
    after_help = CLI_EXAMPLES
)]
pub struct Cli {
    /// Directory containing the mod files.
    pub mod_dir: Option<String>,

    /// Package index (skips the index prompt).
    #[arg(long, allow_negative_numbers = true)]
    pub index: Option<i32>,

    /// Unreal Engine installation directory for this run (not stored).
    #[arg(long, value_name = "DIR")]
    pub engine_dir: Option<PathBuf>,

    /// Output directory for this run (not stored).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Packaging flags for this run, passed to UnrealPak as-is (not stored).
    #[arg(long, allow_hyphen_values = true)]
    pub flags: Option<String>,

    /// Write the archive into ./Packaged instead of the output directory.
    #[arg(long, conflicts_with = "output_dir")]
    pub packaged: bool,

    /// Directory holding the stored settings and startup message.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub config_dir: PathBuf,

    /// Print the manifest and packager command without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit without waiting for ENTER.
    #[arg(long)]
    pub no_pause: bool,

    /// Anything after the mod directory, such as further dropped folders. Ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Cli {
    /// Setting overrides given on the command line.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            engine_dir: self.engine_dir.clone(),
            output_dir: self.output_dir.clone(),
            flags: self.flags.clone(),
            packaged: self.packaged,
        }
    }

    /// Pipeline inputs for this invocation.
    pub fn pipeline_options(
        &self,
        legacy_args: Vec<String>,
        manifest_path: PathBuf,
    ) -> PipelineOptions {
        PipelineOptions {
            mod_dir: self.mod_dir.clone(),
            legacy_args,
            index: self.index,
            overrides: self.overrides(),
            config_dir: self.config_dir.clone(),
            manifest_path,
            dry_run: self.dry_run,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Whether `--no-pause` appears anywhere in the raw arguments.
///
/// Used when the command line fails to parse and [`Cli::no_pause`] is unavailable.
pub fn no_pause_requested(args: &[OsString]) -> bool {
    args.iter().any(|arg| arg == "--no-pause")
}

/// Separate legacy `-forcedIndex` / `-index=<N>` tokens from the arguments clap parses.
///
/// Returns `(clap_args, legacy_tokens)`, both in their original order.
pub fn split_legacy_args<I>(args: I) -> (Vec<OsString>, Vec<String>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut clap_args = Vec::new();
    let mut legacy = Vec::new();

    for arg in args {
        match arg.to_str() {
            Some(s) if s == FORCED_INDEX_FLAG || s.starts_with(INDEX_ARG_PREFIX) => {
                legacy.push(s.to_string());
            }
            _ => clap_args.push(arg),
        }
    }

    (clap_args, legacy)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
