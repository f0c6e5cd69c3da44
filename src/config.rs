use directories::UserDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, APP_VERSION, CONFIG_DIR, CONFIG_FILE_NAME, TEMPLATE_FILE_NAME};
use crate::errors::SetupError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const DEFAULT_EVENT_TYPES: [(&str, &str); 3] =
    [("Start", "green"), ("Stop", "red"), ("Error", "orange")];
const DEFAULT_STATE_TYPES: [(&str, &str); 3] = [
    ("Recording", "blue"),
    ("Paused", "yellow"),
    ("Processing", "purple"),
];

/// Default configuration document consumed by HP Py Sleep at startup.
///
/// Field order is the on-disk key order.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DefaultConfig {
    pub app_name: String,
    pub version: String,
    pub created_by: String,
    pub created_timestamp: String,
    pub window_geometry: String,
    pub selected_signals: Vec<String>,
    /// Event label -> color
    pub event_types: Map<String, Value>,
    /// State label -> color
    pub state_types: Map<String, Value>,
    pub trace_assignments: Map<String, Value>,
    pub saved_montages: Vec<Value>,
    pub last_montage_name: Option<String>,
    pub last_h5_path_var: String,
    pub auto_output: bool,
    pub load_mode: String,
    pub max_samples: String,
    pub autoscale: String,
    pub anti_alias: bool,
    pub remove_dc: bool,
    pub window_size: String,
    pub use_icons: bool,
    pub dark_mode: bool,
    pub note: String,
}

impl DefaultConfig {
    /// Build the default document, stamped with the creating tool and the local time
    pub fn new(created_by: &str) -> Self {
        let created_timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::with_timestamp(created_by, &created_timestamp)
    }

    pub fn with_timestamp(created_by: &str, created_timestamp: &str) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            created_by: created_by.to_string(),
            created_timestamp: created_timestamp.to_string(),
            window_geometry: String::new(),
            selected_signals: Vec::new(),
            event_types: color_map(&DEFAULT_EVENT_TYPES),
            state_types: color_map(&DEFAULT_STATE_TYPES),
            trace_assignments: Map::new(),
            saved_montages: Vec::new(),
            last_montage_name: None,
            last_h5_path_var: String::new(),
            auto_output: false,
            load_mode: "all".to_string(),
            max_samples: "1000".to_string(),
            autoscale: "resize".to_string(),
            anti_alias: false,
            remove_dc: false,
            window_size: "5 min".to_string(),
            use_icons: true,
            dark_mode: false,
            note: format!("This configuration file was created by the {APP_NAME} setup script"),
        }
    }

    pub fn event_labels(&self) -> Vec<String> {
        self.event_types.keys().cloned().collect()
    }

    pub fn state_labels(&self) -> Vec<String> {
        self.state_types.keys().cloned().collect()
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> Result<String, SetupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn color_map(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(label, color)| (label.to_string(), Value::String(color.to_string())))
        .collect()
}

/// Locations of the persisted configuration files
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub template_file: PathBuf,
}

impl ConfigPaths {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            config_file: config_dir.join(CONFIG_FILE_NAME),
            template_file: config_dir.join(TEMPLATE_FILE_NAME),
        }
    }

    /// Paths under the given home directory
    pub fn from_home(home_dir: &Path) -> Self {
        Self::new(&home_dir.join(CONFIG_DIR))
    }

    /// Paths under the current user's home directory
    pub fn for_current_user() -> Result<Self, SetupError> {
        UserDirs::new()
            .ok_or(SetupError::NotFoundUserDir)
            .map(|user_dirs| Self::from_home(user_dirs.home_dir()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 22] = [
        "app_name",
        "version",
        "created_by",
        "created_timestamp",
        "window_geometry",
        "selected_signals",
        "event_types",
        "state_types",
        "trace_assignments",
        "saved_montages",
        "last_montage_name",
        "last_h5_path_var",
        "auto_output",
        "load_mode",
        "max_samples",
        "autoscale",
        "anti_alias",
        "remove_dc",
        "window_size",
        "use_icons",
        "dark_mode",
        "note",
    ];

    #[test]
    fn test_default_config_key_order() {
        let json = DefaultConfig::with_timestamp("test", "2024-01-01T00:00:00.000000")
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, KEYS);
    }

    #[test]
    fn test_default_config_values() {
        let config = DefaultConfig::with_timestamp("hp-py-sleep-config", "stamp");
        let value: Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(value["app_name"], "HP Py Sleep");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["created_by"], "hp-py-sleep-config");
        assert_eq!(value["created_timestamp"], "stamp");
        assert_eq!(value["last_montage_name"], Value::Null);
        assert_eq!(value["auto_output"], false);
        assert_eq!(value["use_icons"], true);
        assert_eq!(value["max_samples"], "1000");
        assert_eq!(value["window_size"], "5 min");
        assert_eq!(value["event_types"]["Stop"], "red");
        assert_eq!(value["state_types"]["Paused"], "yellow");
        assert!(value["trace_assignments"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_default_labels_keep_order() {
        let config = DefaultConfig::with_timestamp("test", "stamp");
        assert_eq!(config.event_labels(), vec!["Start", "Stop", "Error"]);
        assert_eq!(config.state_labels(), vec!["Recording", "Paused", "Processing"]);
    }

    #[test]
    fn test_json_uses_two_space_indent() {
        let json = DefaultConfig::with_timestamp("test", "stamp").to_json().unwrap();
        assert!(json.starts_with("{\n  \"app_name\": \"HP Py Sleep\","));
    }

    #[test]
    fn test_timestamp_format() {
        let config = DefaultConfig::new("test");
        assert!(
            chrono::NaiveDateTime::parse_from_str(&config.created_timestamp, TIMESTAMP_FORMAT)
                .is_ok(),
            "Unexpected timestamp: {}",
            config.created_timestamp
        );
    }

    #[test]
    fn test_config_paths_from_home() {
        let paths = ConfigPaths::from_home(Path::new("/Users/someone"));
        assert_eq!(
            paths.config_file,
            PathBuf::from(
                "/Users/someone/Library/Application Support/HP Py Sleep/hp_processor_config.json"
            )
        );
        assert_eq!(
            paths.template_file,
            PathBuf::from(
                "/Users/someone/Library/Application Support/HP Py Sleep/default_config_template.json"
            )
        );
    }
}
