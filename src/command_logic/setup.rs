use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use super::bootstrap_config::ensure_default_config;
use super::install_bundle::{extract_and_install, InstallReport};
use crate::config::ConfigPaths;
use crate::constants::{Message, SETUP_BIN_NAME};
use crate::errors::SetupError;
use crate::external_api::github_api::GithubApi;
use crate::settings::InstallerSettings;
use crate::utils::{confirm, ensure_supported_platform};

/// Stages of the release installer, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfirmWithUser,
    QueryRelease,
    Download,
    ExtractInstall,
    BootstrapConfig,
    Launch,
    Done,
    Failed,
}

pub type Launcher = fn(&Path) -> Result<(), SetupError>;

pub struct SetupContext {
    /// Value of `std::env::consts::OS` the flow is gated on
    pub os: String,
    pub settings: InstallerSettings,
    pub config_dir: PathBuf,
    pub launcher: Launcher,
}

impl SetupContext {
    pub fn for_current_user() -> Result<Self, SetupError> {
        Ok(Self {
            os: std::env::consts::OS.to_string(),
            settings: InstallerSettings::from_env()?,
            config_dir: ConfigPaths::for_current_user()?.config_dir,
            launcher: open_bundle,
        })
    }
}

#[derive(Debug)]
pub struct SetupSummary {
    pub release_tag: String,
    pub archive_path: PathBuf,
    pub install: InstallReport,
    /// `false` when the config bootstrap failed after a good install
    pub config_ready: bool,
    pub launched: bool,
}

/// Install the latest release, then bootstrap the default config.
///
/// Any stage failure aborts the remaining stages, except the config bootstrap
/// which only downgrades to a warning.
pub async fn run_setup<R, W>(
    ctx: &SetupContext,
    mut input: R,
    mut output: W,
) -> Result<SetupSummary, SetupError>
where
    R: BufRead,
    W: Write,
{
    let mut stage = Stage::Start;
    let result = run_stages(ctx, &mut stage, &mut input, &mut output).await;
    if let Err(e) = &result {
        debug!(failed_at = ?stage, "setup aborted: {e}");
        enter(&mut stage, Stage::Failed);
    }
    result
}

async fn run_stages<R, W>(
    ctx: &SetupContext,
    stage: &mut Stage,
    mut input: R,
    mut output: W,
) -> Result<SetupSummary, SetupError>
where
    R: BufRead,
    W: Write,
{
    ensure_supported_platform(&ctx.os)?;
    writeln!(output, "{}", Message::SetupBanner.to_formatted_string())?;
    writeln!(output, "{}", Message::SetupPlan.to_formatted_string())?;

    enter(stage, Stage::ConfirmWithUser);
    let prompt = Message::ConfirmSetup.to_formatted_string();
    if !confirm(&prompt, &mut input, &mut output)? {
        return Err(SetupError::UserCancelled);
    }
    writeln!(output)?;

    enter(stage, Stage::QueryRelease);
    writeln!(output, "{}", Message::CheckingRelease.to_formatted_string())?;
    let api = GithubApi::new(&ctx.settings)?;
    let release = api.get_latest_release().await?;
    writeln!(
        output,
        "{}",
        Message::FoundRelease(release.tag_name.clone()).to_formatted_string()
    )?;
    if let Some(published_at) = &release.published_at {
        writeln!(
            output,
            "{}",
            Message::Published(published_at.clone()).to_formatted_string()
        )?;
    }
    writeln!(output)?;

    enter(stage, Stage::Download);
    let settings = &ctx.settings;
    let archive_path = api
        .download_asset(
            &release,
            &settings.asset_pattern,
            &settings.archive_extension,
            &mut output,
        )
        .await?;
    writeln!(output)?;

    enter(stage, Stage::ExtractInstall);
    let install = extract_and_install(
        &archive_path,
        &settings.applications_dir,
        &settings.bundle_suffix,
        &mut output,
    )?;
    writeln!(output)?;

    enter(stage, Stage::BootstrapConfig);
    writeln!(output, "{}", Message::SettingUpConfig.to_formatted_string())?;
    let config_ready = ensure_default_config(&ctx.config_dir, SETUP_BIN_NAME, &mut output);
    if !config_ready {
        warn!("config bootstrap failed after a successful install");
        writeln!(output, "{}", Message::ConfigSoftFailure.to_formatted_string())?;
    }
    writeln!(output)?;
    writeln!(
        output,
        "{}",
        Message::SetupCompleted(install.installed_path.display().to_string())
            .to_formatted_string()
    )?;

    enter(stage, Stage::Launch);
    let launched = offer_launch(ctx.launcher, &install.installed_path, &mut input, &mut output)?;

    enter(stage, Stage::Done);
    Ok(SetupSummary {
        release_tag: release.tag_name,
        archive_path,
        install,
        config_ready,
        launched,
    })
}

fn enter(stage: &mut Stage, next: Stage) {
    debug!(from = ?*stage, to = ?next, "stage");
    *stage = next;
}

/// Launch problems are reported, never fatal
fn offer_launch<R, W>(
    launcher: Launcher,
    app_path: &Path,
    input: R,
    mut output: W,
) -> Result<bool, SetupError>
where
    R: BufRead,
    W: Write,
{
    let prompt = Message::ConfirmLaunch.to_formatted_string();
    let wants_launch = confirm(&prompt, input, &mut output).unwrap_or_else(|e| {
        warn!("could not read launch answer: {e}");
        false
    });
    if !wants_launch {
        return Ok(false);
    }
    if !app_path.exists() {
        writeln!(output, "{}", Message::LaunchNotFound.to_formatted_string())?;
        return Ok(false);
    }
    match launcher(app_path) {
        Ok(()) => {
            writeln!(output, "{}", Message::Launching.to_formatted_string())?;
            Ok(true)
        }
        Err(e) => {
            writeln!(
                output,
                "{}",
                Message::LaunchFailed(e.to_string()).to_formatted_string()
            )?;
            Ok(false)
        }
    }
}

/// Open the bundle with the desktop's `open` utility
pub fn open_bundle(app_path: &Path) -> Result<(), SetupError> {
    Command::new("open")
        .arg(app_path)
        .spawn()
        .map(|_| ())
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                SetupError::MissingDependency("the 'open' utility was not found".to_string())
            }
            _ => SetupError::from_io(app_path, e),
        })
}

/// Human-readable report of a failed setup
pub fn report_failure<W>(error: &SetupError, repo: &str, mut output: W) -> io::Result<()>
where
    W: Write,
{
    match error {
        SetupError::UserCancelled => {
            return writeln!(output, "{}", Message::Cancelled.to_formatted_string());
        }
        SetupError::AssetNotFound { available, .. } => {
            writeln!(output, "{}", Message::SetupFailed(error.to_string()).to_formatted_string())?;
            writeln!(
                output,
                "{}",
                Message::AvailableAssets(available.clone()).to_formatted_string()
            )?;
        }
        SetupError::Permission { .. } => {
            writeln!(output, "{}", Message::SetupFailed(error.to_string()).to_formatted_string())?;
            writeln!(output, "{}", Message::PermissionHint.to_formatted_string())?;
        }
        _ => {
            writeln!(output, "{}", Message::SetupFailed(error.to_string()).to_formatted_string())?;
        }
    }
    writeln!(output)?;
    writeln!(output, "{}", Message::ManualDownload(repo.to_string()).to_formatted_string())
}
