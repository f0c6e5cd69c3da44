use std::io;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Unsupported platform: {0}. HP Py Sleep can only be installed on macOS")]
    UnsupportedPlatform(String),
    #[error("Missing dependency: {0}")]
    MissingDependency(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Api error {0}: {1}")]
    Api(StatusCode, String),
    #[error("Deserialization error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No {extension} asset found matching pattern '{pattern}'")]
    AssetNotFound {
        pattern: String,
        extension: String,
        available: Vec<String>,
    },
    #[error("Download error: {0}")]
    Download(String),
    #[error("Download incomplete: expected {expected} bytes, received {received} bytes")]
    SizeMismatch { expected: u64, received: u64 },
    #[error("Invalid ZIP file: {0}")]
    BadArchive(#[from] zip::result::ZipError),
    #[error("No {suffix} bundle found in the downloaded package")]
    BundleNotFound { suffix: String, contents: Vec<String> },
    #[error("Permission denied: {path}: {source}")]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to retrieve the user's directories")]
    NotFoundUserDir,
    #[error("Invalid repository identifier: '{0}', expected <owner>/<repo>")]
    InvalidRepoId(String),
    #[error("URL parse error: {0}")]
    InvalidUrl(String),
    #[error("Invalid API token")]
    InvalidApiToken,
    #[error("Setup cancelled by user")]
    UserCancelled,
    #[error("Setup interrupted")]
    Interrupted,
}

impl SetupError {
    /// Classify an io error raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            return SetupError::Permission {
                path: path.to_path_buf(),
                source,
            };
        }
        SetupError::Io(source)
    }

    /// Process exit status reported by the binaries.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::Interrupted => 130,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use zip::ZipArchive;

    #[test]
    fn test_permission_denied_is_classified() {
        let error = SetupError::from_io(
            Path::new("/Applications/HP Py Sleep.app"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(error, SetupError::Permission { .. }));
        assert!(
            error
                .to_string()
                .starts_with("Permission denied: /Applications/HP Py Sleep.app: "),
            "Unexpected message: {error}"
        );
    }

    #[rstest]
    #[case(io::ErrorKind::NotFound)]
    #[case(io::ErrorKind::AlreadyExists)]
    #[case(io::ErrorKind::Other)]
    fn test_other_io_errors_stay_io(#[case] kind: io::ErrorKind) {
        let error = SetupError::from_io(Path::new("/tmp/x"), io::Error::from(kind));
        assert!(matches!(error, SetupError::Io(_)));
        assert!(error.to_string().starts_with("IO error: "));
    }

    #[test]
    fn test_zip_error_is_bad_archive() {
        let reader = std::io::Cursor::new(&b"this is data"[..]);
        let result = ZipArchive::new(reader).map_err(SetupError::from);
        assert!(matches!(result, Err(SetupError::BadArchive(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("Invalid ZIP file: "));
    }

    #[test]
    fn test_serde_error_is_parse() {
        let serde_error = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let error = SetupError::from(serde_error);
        assert!(matches!(error, SetupError::Parse(_)));
        assert!(error.to_string().starts_with("Deserialization error: "));
    }

    #[test]
    fn test_api_error_message() {
        let error = SetupError::Api(StatusCode::NOT_FOUND, String::from("Not Found"));
        assert_eq!(error.to_string(), "Api error 404 Not Found: Not Found");
    }

    #[test]
    fn test_asset_not_found_message() {
        let error = SetupError::AssetNotFound {
            pattern: "hp_py_sleep".to_string(),
            extension: ".zip".to_string(),
            available: vec!["readme.txt".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "No .zip asset found matching pattern 'hp_py_sleep'"
        );
    }

    #[test]
    fn test_size_mismatch_message() {
        let error = SetupError::SizeMismatch {
            expected: 10,
            received: 7,
        };
        assert_eq!(
            error.to_string(),
            "Download incomplete: expected 10 bytes, received 7 bytes"
        );
    }

    #[rstest]
    #[case(SetupError::UserCancelled, 1)]
    #[case(SetupError::UnsupportedPlatform("linux".to_string()), 1)]
    #[case(SetupError::Download("timeout".to_string()), 1)]
    #[case(SetupError::Interrupted, 130)]
    fn test_exit_code(#[case] error: SetupError, #[case] exp_code: i32) {
        assert_eq!(error.exit_code(), exp_code);
    }

    #[test]
    fn test_user_cancelled_message() {
        assert_eq!(
            SetupError::UserCancelled.to_string(),
            "Setup cancelled by user"
        );
    }
}
