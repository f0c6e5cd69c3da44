pub mod models;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use super::BaseApiClient;
use crate::constants::Message;
use crate::errors::SetupError;
use crate::settings::InstallerSettings;
use models::release_info::ReleaseInfo;

/// Client for the release endpoints of the hosting API
pub struct GithubApi {
    pub client: BaseApiClient,
    repo: String,
    metadata_timeout: Duration,
    download_timeout: Duration,
    download_dir: PathBuf,
}

impl GithubApi {
    pub fn new(settings: &InstallerSettings) -> Result<Self, SetupError> {
        let client = BaseApiClient::new(&settings.api_base_url, settings.api_token.as_deref())?;
        Ok(Self {
            client,
            repo: settings.repo.clone(),
            metadata_timeout: settings.metadata_timeout,
            download_timeout: settings.download_timeout,
            download_dir: settings.download_dir.clone(),
        })
    }

    #[cfg(test)]
    pub fn mock(server_url: &str, download_dir: &std::path::Path) -> Self {
        let settings = InstallerSettings {
            api_base_url: server_url.to_string(),
            repo: "owner/repo".to_string(),
            download_dir: download_dir.to_path_buf(),
            metadata_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(5),
            ..InstallerSettings::default()
        };
        Self::new(&settings).unwrap()
    }

    /// Latest published release; a single attempt
    pub async fn get_latest_release(&self) -> Result<ReleaseInfo, SetupError> {
        self.client
            .get::<ReleaseInfo>(
                &format!("repos/{}/releases/latest", self.repo),
                self.metadata_timeout,
            )
            .await
    }

    /// Stream the matching asset into a fresh temp file and return its path.
    ///
    /// The byte count must equal the declared asset size. On failure the temp file is removed.
    pub async fn download_asset<W>(
        &self,
        release: &ReleaseInfo,
        pattern: &str,
        extension: &str,
        mut output: W,
    ) -> Result<PathBuf, SetupError>
    where
        W: Write,
    {
        let asset = release.find_asset(pattern, extension)?;
        writeln!(
            output,
            "{}",
            Message::Downloading(asset.name.clone(), asset.size).to_formatted_string()
        )?;

        let mut response = self
            .client
            .get_stream(&asset.browser_download_url, self.download_timeout)
            .await
            .map_err(|e| match e {
                SetupError::Network(error) => SetupError::Download(error.to_string()),
                other => other,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::Download(format!(
                "{} responded with {status}",
                asset.browser_download_url
            )));
        }

        let mut temp_file = tempfile::Builder::new()
            .prefix("hp_py_sleep_")
            .suffix(extension)
            .tempfile_in(&self.download_dir)
            .map_err(|e| SetupError::from_io(&self.download_dir, e))?;
        debug!(path = %temp_file.path().display(), "downloading {}", asset.name);

        let mut downloaded: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SetupError::Download(e.to_string()))?
        {
            temp_file
                .write_all(&chunk)
                .map_err(|e| SetupError::from_io(temp_file.path(), e))?;
            downloaded += chunk.len() as u64;
            write!(
                output,
                "{}",
                Message::DownloadProgress(downloaded, asset.size).to_formatted_string()
            )?;
            output.flush()?;
        }
        writeln!(output)?;

        if downloaded != asset.size {
            warn!(
                expected = asset.size,
                received = downloaded,
                "discarding incomplete download"
            );
            return Err(SetupError::SizeMismatch {
                expected: asset.size,
                received: downloaded,
            });
        }

        temp_file
            .flush()
            .map_err(|e| SetupError::from_io(temp_file.path(), e))?;
        let (_, path) = temp_file.keep().map_err(|e| SetupError::Io(e.error))?;
        writeln!(
            output,
            "{}",
            Message::DownloadCompleted(path.display().to_string()).to_formatted_string()
        )?;
        Ok(path)
    }
}
