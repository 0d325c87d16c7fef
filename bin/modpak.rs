//! `modpak` is the primary CLI binary.

use clap::Parser;
use colored::Colorize;
use modpak::{
    Cli, ConsoleLines, FileBackend, PakError, PakResult, Pipeline, SettingsStore,
    default_manifest_path, init_theme, no_pause_requested, split_legacy_args,
    wait_for_acknowledgment,
};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn main() {
    // Only enable logging when RUST_LOG is set.
    init_tracing();

    let (args, legacy_args) = split_legacy_args(std::env::args_os());
    let pause = !no_pause_requested(&args);

    let code = match Cli::try_parse_from(args) {
        Ok(cli) => match run(cli, legacy_args) {
            Ok(()) => 0,
            Err(e) => {
                print_error(&e);
                1
            }
        },
        // Help and version land here too
        Err(e) => {
            let _ = e.print();
            if e.use_stderr() { 1 } else { 0 }
        }
    };

    if pause {
        wait_for_acknowledgment();
    }
    std::process::exit(code);
}

/// Print an error as a single styled line.
fn print_error(e: &PakError) {
    println!();
    match e {
        PakError::MissingModDirectory => {
            println!("  {} {}", "error[missing-input]".bright_red().bold(), e);
            println!(
                "    {}: modpak {}",
                "example".bright_blue().bold(),
                "\"C:\\ModFiles\\CookieHat\"".bright_white()
            );
        }
        PakError::Cancelled => {
            println!("  {} Operation cancelled", "✗".bright_red());
        }
        _ => {
            println!(
                "  {} {}",
                format!("error[{}]", e.kind()).bright_red().bold(),
                e
            );
        }
    }
    println!();
}

/// Initialize tracing. Only enables logging when RUST_LOG is set.
fn init_tracing() {
    let rust_log_set = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .is_some();

    if !rust_log_set {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli, legacy_args: Vec<String>) -> PakResult<()> {
    init_theme();

    let manifest_path = default_manifest_path()?;
    let store = SettingsStore::new(FileBackend::new(&cli.config_dir));
    let options = cli.pipeline_options(legacy_args, manifest_path);

    let mut pipeline = Pipeline::new(store, ConsoleLines, options);
    let result = pipeline.run();
    if result.is_err() {
        tracing::debug!("Run failed during {:?}", pipeline.stage());
    }

    let outcome = result?;
    if let Some(status) = outcome.exit_status {
        tracing::info!(
            "{} finished with {}",
            outcome.request.output_file.display(),
            status
        );
    }

    Ok(())
}
