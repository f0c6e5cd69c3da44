use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::constants::TARGET_OS;
use crate::errors::SetupError;

/// Refuse to run anywhere but the target OS
pub fn ensure_supported_platform(os: &str) -> Result<(), SetupError> {
    if os != TARGET_OS {
        return Err(SetupError::UnsupportedPlatform(os.to_string()));
    }
    Ok(())
}

/// Write the whole file through a sibling temp file, never replacing an existing `dest`
pub fn write_new_file_atomic(dest: &Path, content: &[u8]) -> Result<(), SetupError> {
    let parent = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp_file =
        NamedTempFile::new_in(parent).map_err(|e| SetupError::from_io(parent, e))?;
    temp_file
        .write_all(content)
        .and_then(|_| temp_file.as_file().sync_all())
        .map_err(|e| SetupError::from_io(temp_file.path(), e))?;
    temp_file
        .persist_noclobber(dest)
        .map_err(|e| SetupError::from_io(dest, e.error))?;
    Ok(())
}

/// Unpack a ZIP archive into `dest`
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<(), SetupError> {
    let file = File::open(archive_path).map_err(|e| SetupError::from_io(archive_path, e))?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(dest).map_err(|e| match e {
        ZipError::Io(io_error) => SetupError::from_io(dest, io_error),
        other => SetupError::BadArchive(other),
    })
}

/// Directories under `root` whose name ends with `suffix`.
///
/// Depth-first, siblings in file-name order; never descends into a match.
/// Finder metadata (`__MACOSX/`, `._*`) is skipped.
pub fn find_bundles(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, SetupError> {
    let mut bundles = Vec::new();
    let mut entries = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_archive_metadata(entry.file_name()));
    while let Some(entry) = entries.next() {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_bundle = entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix) && name.len() > suffix.len());
        if is_bundle {
            bundles.push(entry.into_path());
            entries.skip_current_dir();
        }
    }
    Ok(bundles)
}

fn is_archive_metadata(name: &std::ffi::OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| name == "__MACOSX" || name.starts_with("._"))
}

/// Every path under `root`, in walk order
pub fn list_tree(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().display().to_string())
        .collect()
}

/// Recursive copy of `src` to a new directory `dest`, keeping symlinks as links
pub fn copy_tree(src: &Path, dest: &Path) -> Result<(), SetupError> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| SetupError::Io(std::io::Error::other("path outside source tree")))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| SetupError::from_io(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| SetupError::from_io(&target, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, target: &Path) -> Result<(), SetupError> {
    let link = fs::read_link(src).map_err(|e| SetupError::from_io(src, e))?;
    std::os::unix::fs::symlink(&link, target).map_err(|e| SetupError::from_io(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, target: &Path) -> Result<(), SetupError> {
    fs::copy(src, target)
        .map(|_| ())
        .map_err(|e| SetupError::from_io(target, e))
}

/// Ask a yes/no question; anything but `y`/`yes` means no
pub fn confirm<R, W>(prompt: &str, mut input: R, mut output: W) -> Result<bool, SetupError>
where
    R: BufRead,
    W: Write,
{
    output.write_all(prompt.as_bytes())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let trimmed = answer.trim().to_lowercase();
    Ok(matches!(trimmed.as_str(), "y" | "yes"))
}
