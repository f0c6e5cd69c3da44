use clap::Parser;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::command_logic::bootstrap_config::ensure_default_config;
use crate::command_logic::setup::{report_failure, run_setup, SetupContext};
use crate::config::ConfigPaths;
use crate::constants::{Message, CONFIG_BIN_NAME, GITHUB_REPO};
use crate::errors::SetupError;
use crate::utils::ensure_supported_platform;

#[derive(Parser)]
#[command(
    name = "hp-py-sleep-setup",
    version,
    about = "Install the latest HP Py Sleep release into Applications and prepare its default configuration",
    long_about = None
)]
pub struct SetupCli {}

#[derive(Parser)]
#[command(
    name = "hp-py-sleep-config",
    version,
    about = "Create the default HP Py Sleep configuration file if it does not exist yet",
    long_about = None
)]
pub struct ConfigCli {}

/// Print the cancellation notice and exit with 130 on Ctrl-C.
///
/// Prompts block on stdin, so the handler exits the process directly.
pub fn install_interrupt_handler() {
    let result = ctrlc::set_handler(|| {
        println!("\n{}", Message::Cancelled.to_formatted_string());
        std::process::exit(SetupError::Interrupted.exit_code());
    });
    if let Err(e) = result {
        warn!("could not install Ctrl-C handler: {e}");
    }
}

/// Entry point of the release installer; returns the process exit status
pub async fn handle_setup<R, W>(input: R, output: W) -> i32
where
    R: BufRead,
    W: Write,
{
    handle_setup_on(std::env::consts::OS, SetupContext::for_current_user, input, output).await
}

/// The platform gate runs before the context is loaded from the environment
pub async fn handle_setup_on<F, R, W>(os: &str, load_context: F, input: R, mut output: W) -> i32
where
    F: FnOnce() -> Result<SetupContext, SetupError>,
    R: BufRead,
    W: Write,
{
    let ctx = match ensure_supported_platform(os).and_then(|_| load_context()) {
        Ok(ctx) => ctx,
        Err(e) => {
            let _ = report_failure(&e, GITHUB_REPO, &mut output);
            return e.exit_code();
        }
    };
    run_setup_command(&ctx, input, output).await
}

pub async fn run_setup_command<R, W>(ctx: &SetupContext, input: R, mut output: W) -> i32
where
    R: BufRead,
    W: Write,
{
    match run_setup(ctx, input, &mut output).await {
        Ok(summary) => {
            info!(
                release = %summary.release_tag,
                path = %summary.install.installed_path.display(),
                "setup finished"
            );
            0
        }
        Err(e) => {
            let _ = report_failure(&e, &ctx.settings.repo, &mut output);
            e.exit_code()
        }
    }
}

/// Entry point of the standalone config bootstrapper
pub fn handle_config<W>(output: W) -> i32
where
    W: Write,
{
    handle_config_on(std::env::consts::OS, ConfigPaths::for_current_user, output)
}

pub fn handle_config_on<F, W>(os: &str, load_paths: F, mut output: W) -> i32
where
    F: FnOnce() -> Result<ConfigPaths, SetupError>,
    W: Write,
{
    match ensure_supported_platform(os).and_then(|_| load_paths()) {
        Ok(paths) => run_config_command(os, &paths.config_dir, output),
        Err(e) => {
            let _ = writeln!(output, "{}", Message::Failure(e.to_string()).to_formatted_string());
            e.exit_code()
        }
    }
}

pub fn run_config_command<W>(os: &str, config_dir: &Path, mut output: W) -> i32
where
    W: Write,
{
    if let Err(e) = ensure_supported_platform(os) {
        let _ = writeln!(output, "{}", Message::Failure(e.to_string()).to_formatted_string());
        return e.exit_code();
    }
    let _ = writeln!(output, "{}", Message::ConfigBanner.to_formatted_string());
    if ensure_default_config(config_dir, CONFIG_BIN_NAME, &mut output) {
        let _ = writeln!(output, "\n{}", Message::ConfigCompleted.to_formatted_string());
        0
    } else {
        let _ = writeln!(output, "\n{}", Message::ConfigFailedHint.to_formatted_string());
        1
    }
}
