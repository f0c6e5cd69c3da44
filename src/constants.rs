use std::time::Duration;

pub const APP_NAME: &str = "HP Py Sleep";
pub const APP_VERSION: &str = "1.0.0";
pub const GITHUB_REPO: &str = "stafne/hp_sleep_mac";
pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_WEB_BASE: &str = "https://github.com";
pub const APPLICATIONS_DIR: &str = "/Applications";
pub const TARGET_OS: &str = "macos";

/// Relative to the user's home directory
pub const CONFIG_DIR: &str = "Library/Application Support/HP Py Sleep";
pub const CONFIG_FILE_NAME: &str = "hp_processor_config.json";
pub const TEMPLATE_FILE_NAME: &str = "default_config_template.json";

pub const ASSET_NAME_PATTERN: &str = "hp_py_sleep";
pub const ARCHIVE_EXTENSION: &str = ".zip";
pub const BUNDLE_SUFFIX: &str = ".app";

pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub const SETUP_BIN_NAME: &str = "hp-py-sleep-setup";
pub const CONFIG_BIN_NAME: &str = "hp-py-sleep-config";

pub const ENV_API_URL: &str = "HP_PY_SLEEP_API_URL";
pub const ENV_REPO: &str = "HP_PY_SLEEP_REPO";
pub const ENV_APPLICATIONS_DIR: &str = "HP_PY_SLEEP_APPLICATIONS_DIR";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

pub const SEPARATOR: &str = "============================================================";

/// Standard message
#[derive(Debug)]
pub enum Message {
    SetupBanner,
    ConfigBanner,
    SetupPlan,
    ConfirmSetup,
    ConfirmLaunch,
    CheckingRelease,
    FoundRelease(String),
    Published(String),
    AvailableAssets(Vec<String>),
    Downloading(String, u64),
    DownloadProgress(u64, u64),
    DownloadCompleted(String),
    Extracting,
    ExtractedContents(Vec<String>),
    FoundApplication(String),
    AmbiguousApplications(Vec<String>),
    RemovingExisting(String),
    InstallingTo(String),
    InstallCompleted,
    SettingUpConfig,
    CheckingConfig(String),
    CreatedDirectory(String),
    DirectoryExists(String),
    ConfigExists(String),
    CurrentEventTypes(Vec<String>),
    CurrentStateTypes(Vec<String>),
    CouldNotReadConfig(String),
    CreatingConfig,
    CreatedConfig(String),
    DefaultEventTypes(Vec<String>),
    DefaultStateTypes(Vec<String>),
    CreatingTemplate,
    CreatedTemplate(String),
    ConfigFailed(String),
    ConfigSoftFailure,
    ConfigCompleted,
    ConfigFailedHint,
    PermissionHint,
    SetupCompleted(String),
    SetupFailed(String),
    ManualDownload(String),
    Launching,
    LaunchNotFound,
    LaunchFailed(String),
    Cancelled,
    Failure(String),
}

impl Message {
    pub fn to_formatted_string(&self) -> String {
        match self {
            Message::SetupBanner => {
                format!("{SEPARATOR}\n{APP_NAME} - First Time Setup\n{SEPARATOR}\n")
            }
            Message::ConfigBanner => {
                format!("{SEPARATOR}\n{APP_NAME} - Configuration Setup\n{SEPARATOR}\n")
            }
            Message::SetupPlan => format!(
                "This setup will:\n   1. Download the latest {APP_NAME} release from GitHub\n   \
                 2. Install it to your Applications folder\n   \
                 3. Set up default configuration file (if needed)\n   \
                 4. Prepare the application for first-time use\n"
            ),
            Message::ConfirmSetup => "Continue? (y/N): ".to_string(),
            Message::ConfirmLaunch => format!("Launch {APP_NAME} now? (y/N): "),
            Message::CheckingRelease => "Checking for latest release...".to_string(),
            Message::FoundRelease(tag) => format!("Found latest release: {tag}"),
            Message::Published(date) => format!("Published: {date}"),
            Message::AvailableAssets(names) => {
                let mut message = String::from("Available assets:");
                for name in names {
                    message.push_str(&format!("\n  - {name}"));
                }
                message
            }
            Message::Downloading(name, size) => {
                format!("Downloading: {name} ({size} bytes)")
            }
            Message::DownloadProgress(downloaded, total) => {
                let percent = if *total == 0 {
                    100.0
                } else {
                    *downloaded as f64 / *total as f64 * 100.0
                };
                format!(
                    "\rDownloading: {percent:.1}% ({} / {} bytes)",
                    format_thousands(*downloaded),
                    format_thousands(*total)
                )
            }
            Message::DownloadCompleted(path) => format!("Download completed: {path}"),
            Message::Extracting => "Extracting application...".to_string(),
            Message::ExtractedContents(paths) => {
                let mut message = String::from("Contents of extracted package:");
                for path in paths {
                    message.push_str(&format!("\n  - {path}"));
                }
                message
            }
            Message::FoundApplication(name) => format!("Found application: {name}"),
            Message::AmbiguousApplications(others) => format!(
                "Package contains more than one application, ignoring: {}",
                others.join(", ")
            ),
            Message::RemovingExisting(path) => {
                format!("Replacing existing installation: {path}")
            }
            Message::InstallingTo(path) => format!("Installing to: {path}"),
            Message::InstallCompleted => "Installation completed successfully!".to_string(),
            Message::SettingUpConfig => "Setting up configuration...".to_string(),
            Message::CheckingConfig(path) => format!("Checking configuration file: {path}"),
            Message::CreatedDirectory(path) => format!("Created directory: {path}"),
            Message::DirectoryExists(path) => format!("Directory exists: {path}"),
            Message::ConfigExists(path) => format!(
                "Configuration file already exists: {path}\nPreserving existing configuration"
            ),
            Message::CurrentEventTypes(labels) => {
                format!("   Current event types: {}", labels.join(", "))
            }
            Message::CurrentStateTypes(labels) => {
                format!("   Current state types: {}", labels.join(", "))
            }
            Message::CouldNotReadConfig(error) => {
                format!("   Note: Could not read existing config: {error}")
            }
            Message::CreatingConfig => "Creating default configuration file...".to_string(),
            Message::CreatedConfig(path) => format!("Created default configuration: {path}"),
            Message::DefaultEventTypes(labels) => {
                format!("   Default event types: {}", labels.join(", "))
            }
            Message::DefaultStateTypes(labels) => {
                format!("   Default state types: {}", labels.join(", "))
            }
            Message::CreatingTemplate => {
                "Creating config template for future resets...".to_string()
            }
            Message::CreatedTemplate(path) => format!(
                "Created template: {path}\n   You can edit this template to customize default settings"
            ),
            Message::ConfigFailed(error) => format!("Failed to create config file: {error}"),
            Message::ConfigSoftFailure => format!(
                "Configuration setup failed, but app installation succeeded\n   \
                 {APP_NAME} will create its own config file on first launch"
            ),
            Message::ConfigCompleted => format!(
                "Configuration setup completed successfully!\n\
                 {APP_NAME} will now use the default configuration on first launch."
            ),
            Message::ConfigFailedHint => "Configuration setup failed!\n\
                 You may need to run with appropriate permissions."
                .to_string(),
            Message::PermissionHint => {
                "Try running with sudo or check your permissions".to_string()
            }
            Message::SetupCompleted(path) => format!(
                "{SEPARATOR}\nSetup Completed Successfully!\n{SEPARATOR}\n\n\
                 {APP_NAME} has been installed to: {path}\n\
                 To launch the application:\n   \
                 - Double-click the app in Applications, or\n   \
                 - Use Spotlight (Cmd+Space) and search for '{APP_NAME}'\n\n\
                 Future updates:\n   \
                 - The app will automatically check for updates on startup\n   \
                 - You can manually check for updates from within the app\n"
            ),
            Message::SetupFailed(error) => format!("Setup failed: {error}"),
            Message::ManualDownload(repo) => format!(
                "Please try again or download manually from:\n{GITHUB_WEB_BASE}/{repo}/releases"
            ),
            Message::Launching => format!("Launching {APP_NAME}..."),
            Message::LaunchNotFound => "App not found at expected location. \
                 Please launch manually from Applications."
                .to_string(),
            Message::LaunchFailed(error) => format!(
                "Could not launch app automatically: {error}\nPlease launch manually from Applications."
            ),
            Message::Cancelled => "Setup cancelled by user".to_string(),
            Message::Failure(error) => format!("Error: {error}"),
        }
    }
}

/// Group digits by thousands
///
/// input - 1234567
/// return - 1,234,567
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(8192, "8,192")]
    #[case(1234567, "1,234,567")]
    #[case(100000, "100,000")]
    fn test_format_thousands(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(format_thousands(value), expected);
    }

    #[rstest]
    #[case(0, 1000, "\rDownloading: 0.0% (0 / 1,000 bytes)")]
    #[case(500, 1000, "\rDownloading: 50.0% (500 / 1,000 bytes)")]
    #[case(8192, 8192, "\rDownloading: 100.0% (8,192 / 8,192 bytes)")]
    #[case(0, 0, "\rDownloading: 100.0% (0 / 0 bytes)")]
    fn test_download_progress(#[case] downloaded: u64, #[case] total: u64, #[case] expected: &str) {
        assert_eq!(
            Message::DownloadProgress(downloaded, total).to_formatted_string(),
            expected
        );
    }

    #[test]
    fn test_available_assets() {
        let names = vec!["foo.zip".to_string(), "readme.txt".to_string()];
        assert_eq!(
            Message::AvailableAssets(names).to_formatted_string(),
            "Available assets:\n  - foo.zip\n  - readme.txt"
        );
    }

    #[rstest]
    #[case(vec![], "   Current event types: ")]
    #[case(vec!["Start".to_string()], "   Current event types: Start")]
    #[case(vec!["Start".to_string(), "Stop".to_string()], "   Current event types: Start, Stop")]
    fn test_current_event_types(#[case] labels: Vec<String>, #[case] expected: &str) {
        assert_eq!(
            Message::CurrentEventTypes(labels).to_formatted_string(),
            expected
        );
    }

    #[test]
    fn test_manual_download_link() {
        let message = Message::ManualDownload(GITHUB_REPO.to_string()).to_formatted_string();
        assert!(message.ends_with("https://github.com/stafne/hp_sleep_mac/releases"));
    }

    #[test]
    fn test_confirm_prompts_default_to_no() {
        assert!(Message::ConfirmSetup.to_formatted_string().ends_with("(y/N): "));
        assert!(Message::ConfirmLaunch.to_formatted_string().ends_with("(y/N): "));
    }
}
