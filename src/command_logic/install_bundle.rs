use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::Message;
use crate::errors::SetupError;
use crate::utils::{copy_tree, extract_archive, find_bundles, list_tree};

#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    pub app_name: String,
    pub installed_path: PathBuf,
    /// Removed once the install succeeds
    pub extraction_dir: PathBuf,
    pub replaced_existing: bool,
}

/// Extract the downloaded archive and install its bundle into `applications_dir`.
///
/// On success the extraction directory and the archive are deleted.
pub fn extract_and_install<W>(
    archive_path: &Path,
    applications_dir: &Path,
    bundle_suffix: &str,
    mut output: W,
) -> Result<InstallReport, SetupError>
where
    W: Write,
{
    writeln!(output, "{}", Message::Extracting.to_formatted_string())?;

    let extraction_dir = tempfile::Builder::new()
        .prefix("hp_py_sleep_extract_")
        .tempdir()?;
    extract_archive(archive_path, extraction_dir.path())?;

    let bundles = find_bundles(extraction_dir.path(), bundle_suffix)?;
    let Some((source, others)) = bundles.split_first() else {
        let contents = list_tree(extraction_dir.path());
        writeln!(
            output,
            "{}",
            Message::ExtractedContents(contents.clone()).to_formatted_string()
        )?;
        return Err(SetupError::BundleNotFound {
            suffix: bundle_suffix.to_string(),
            contents,
        });
    };
    if !others.is_empty() {
        let ignored: Vec<String> = others.iter().map(|path| display_name(path)).collect();
        warn!(selected = %source.display(), ?ignored, "archive holds several bundles");
        writeln!(
            output,
            "{}",
            Message::AmbiguousApplications(ignored).to_formatted_string()
        )?;
    }

    let app_name = display_name(source);
    writeln!(
        output,
        "{}",
        Message::FoundApplication(app_name.clone()).to_formatted_string()
    )?;

    let target = applications_dir.join(&app_name);
    let replaced_existing = install_bundle(source, &target, &mut output)?;

    let extraction_path = extraction_dir.path().to_path_buf();
    extraction_dir
        .close()
        .map_err(|e| SetupError::from_io(&extraction_path, e))?;
    fs::remove_file(archive_path).map_err(|e| SetupError::from_io(archive_path, e))?;

    writeln!(output, "{}", Message::InstallCompleted.to_formatted_string())?;
    Ok(InstallReport {
        app_name,
        installed_path: target,
        extraction_dir: extraction_path,
        replaced_existing,
    })
}

/// Stage a copy beside `target`, then swap it in with renames.
///
/// At every point `target` holds either the previous or the new bundle.
fn install_bundle<W>(source: &Path, target: &Path, mut output: W) -> Result<bool, SetupError>
where
    W: Write,
{
    let parent = target.parent().unwrap_or(Path::new("."));
    let name = display_name(target);
    let nonce = Uuid::new_v4();
    let staging = parent.join(format!(".{name}.staging-{nonce}"));

    writeln!(
        output,
        "{}",
        Message::InstallingTo(target.display().to_string()).to_formatted_string()
    )?;
    debug!(staging = %staging.display(), "staging bundle");
    if let Err(e) = copy_tree(source, &staging) {
        let _ = remove_path(&staging);
        return Err(e);
    }

    let replaced_existing = fs::symlink_metadata(target).is_ok();
    if !replaced_existing {
        return fs::rename(&staging, target)
            .map(|_| false)
            .map_err(|e| {
                let _ = remove_path(&staging);
                SetupError::from_io(target, e)
            });
    }

    writeln!(
        output,
        "{}",
        Message::RemovingExisting(target.display().to_string()).to_formatted_string()
    )?;
    let backup = parent.join(format!(".{name}.backup-{nonce}"));
    if let Err(e) = fs::rename(target, &backup) {
        let _ = remove_path(&staging);
        return Err(SetupError::from_io(target, e));
    }
    if let Err(e) = fs::rename(&staging, target) {
        let _ = fs::rename(&backup, target);
        let _ = remove_path(&staging);
        return Err(SetupError::from_io(target, e));
    }
    if let Err(e) = remove_path(&backup) {
        warn!("could not remove previous installation {}: {e}", backup.display());
    }
    Ok(true)
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
