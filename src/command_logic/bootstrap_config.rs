use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, warn};

use crate::config::{ConfigPaths, DefaultConfig};
use crate::constants::Message;
use crate::errors::SetupError;
use crate::utils::write_new_file_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyPresent,
}

/// Make sure `config_dir` holds a config file, creating the default one if absent.
///
/// Never touches an existing config. Failures are reported to `output` and yield `false`.
pub fn ensure_default_config<W>(config_dir: &Path, created_by: &str, mut output: W) -> bool
where
    W: Write,
{
    match try_ensure_default_config(config_dir, created_by, &mut output) {
        Ok(outcome) => {
            debug!(?outcome, "config bootstrap finished");
            true
        }
        Err(e) => {
            error!("config bootstrap failed: {e}");
            let _ = writeln!(output, "{}", Message::ConfigFailed(e.to_string()).to_formatted_string());
            if matches!(e, SetupError::Permission { .. }) {
                let _ = writeln!(output, "{}", Message::PermissionHint.to_formatted_string());
            }
            false
        }
    }
}

pub fn try_ensure_default_config<W>(
    config_dir: &Path,
    created_by: &str,
    mut output: W,
) -> Result<BootstrapOutcome, SetupError>
where
    W: Write,
{
    let paths = ConfigPaths::new(config_dir);
    writeln!(
        output,
        "{}",
        Message::CheckingConfig(paths.config_file.display().to_string()).to_formatted_string()
    )?;

    let dir_display = paths.config_dir.display().to_string();
    if paths.config_dir.is_dir() {
        writeln!(output, "{}", Message::DirectoryExists(dir_display).to_formatted_string())?;
    } else {
        fs::create_dir_all(&paths.config_dir)
            .map_err(|e| SetupError::from_io(&paths.config_dir, e))?;
        writeln!(output, "{}", Message::CreatedDirectory(dir_display).to_formatted_string())?;
    }

    if paths.config_file.exists() {
        writeln!(
            output,
            "{}",
            Message::ConfigExists(paths.config_file.display().to_string()).to_formatted_string()
        )?;
        show_existing_labels(&paths.config_file, &mut output)?;
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    writeln!(output, "{}", Message::CreatingConfig.to_formatted_string())?;
    let config = DefaultConfig::new(created_by);
    let json = config.to_json()?;
    write_new_file_atomic(&paths.config_file, json.as_bytes())?;
    writeln!(
        output,
        "{}",
        Message::CreatedConfig(paths.config_file.display().to_string()).to_formatted_string()
    )?;
    writeln!(
        output,
        "{}",
        Message::DefaultEventTypes(config.event_labels()).to_formatted_string()
    )?;
    writeln!(
        output,
        "{}",
        Message::DefaultStateTypes(config.state_labels()).to_formatted_string()
    )?;

    if !paths.template_file.exists() {
        writeln!(output, "{}", Message::CreatingTemplate.to_formatted_string())?;
        write_new_file_atomic(&paths.template_file, json.as_bytes())?;
        writeln!(
            output,
            "{}",
            Message::CreatedTemplate(paths.template_file.display().to_string())
                .to_formatted_string()
        )?;
    }

    Ok(BootstrapOutcome::Created)
}

/// Best-effort display of the labels in an existing config
fn show_existing_labels<W>(config_file: &Path, mut output: W) -> Result<(), SetupError>
where
    W: Write,
{
    let parsed = fs::read_to_string(config_file)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            serde_json::from_str::<serde_json::Value>(&content).map_err(|e| e.to_string())
        });
    let config = match parsed {
        Ok(value) => value,
        Err(e) => {
            warn!("could not read existing config {}: {e}", config_file.display());
            writeln!(output, "{}", Message::CouldNotReadConfig(e).to_formatted_string())?;
            return Ok(());
        }
    };

    if let Some(event_types) = config.get("event_types").and_then(|value| value.as_object()) {
        let labels = event_types.keys().cloned().collect();
        writeln!(output, "{}", Message::CurrentEventTypes(labels).to_formatted_string())?;
    }
    if let Some(state_types) = config.get("state_types").and_then(|value| value.as_object()) {
        let labels = state_types.keys().cloned().collect();
        writeln!(output, "{}", Message::CurrentStateTypes(labels).to_formatted_string())?;
    }
    Ok(())
}
