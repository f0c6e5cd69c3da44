use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    APPLICATIONS_DIR, ARCHIVE_EXTENSION, ASSET_NAME_PATTERN, BUNDLE_SUFFIX, DOWNLOAD_TIMEOUT,
    ENV_API_URL, ENV_APPLICATIONS_DIR, ENV_GITHUB_TOKEN, ENV_REPO, GITHUB_API_BASE, GITHUB_REPO,
    METADATA_TIMEOUT,
};
use crate::errors::SetupError;

/// Runtime settings of the release installer
#[derive(Debug, Clone, PartialEq)]
pub struct InstallerSettings {
    /// Hosting API base url
    pub api_base_url: String,
    /// Repository identifier in `owner/repo` form
    pub repo: String,
    pub api_token: Option<String>,
    pub applications_dir: PathBuf,
    pub asset_pattern: String,
    pub archive_extension: String,
    pub bundle_suffix: String,
    pub metadata_timeout: Duration,
    pub download_timeout: Duration,
    /// Where downloaded archives are staged
    pub download_dir: PathBuf,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            api_base_url: GITHUB_API_BASE.to_string(),
            repo: GITHUB_REPO.to_string(),
            api_token: None,
            applications_dir: PathBuf::from(APPLICATIONS_DIR),
            asset_pattern: ASSET_NAME_PATTERN.to_string(),
            archive_extension: ARCHIVE_EXTENSION.to_string(),
            bundle_suffix: BUNDLE_SUFFIX.to_string(),
            metadata_timeout: METADATA_TIMEOUT,
            download_timeout: DOWNLOAD_TIMEOUT,
            download_dir: env::temp_dir(),
        }
    }
}

impl InstallerSettings {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, SetupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by `lookup`; empty values are ignored
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SetupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();
        if let Some(api_base_url) = value(ENV_API_URL) {
            settings.api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(repo) = value(ENV_REPO) {
            settings.repo = validate_repo_id(repo.trim())?;
        }
        if let Some(applications_dir) = value(ENV_APPLICATIONS_DIR) {
            settings.applications_dir = PathBuf::from(applications_dir);
        }
        settings.api_token = value(ENV_GITHUB_TOKEN).map(|token| token.trim().to_string());
        Ok(settings)
    }
}

/// Repository identifier must look like `owner/repo`
pub fn validate_repo_id(value: &str) -> Result<String, SetupError> {
    let regex = Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$")
        .map_err(|_| SetupError::InvalidRepoId(value.to_string()))?;
    if !regex.is_match(value) {
        return Err(SetupError::InvalidRepoId(value.to_string()));
    }
    Ok(value.to_string())
}
