use serde::Deserialize;

use crate::errors::SetupError;

/// Latest published release, as returned by `/repos/{owner}/{repo}/releases/latest`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

impl ReleaseInfo {
    /// First asset whose name contains `pattern` and ends with `extension`
    pub fn find_asset(&self, pattern: &str, extension: &str) -> Result<&ReleaseAsset, SetupError> {
        self.assets
            .iter()
            .find(|asset| asset.name.contains(pattern) && asset.name.ends_with(extension))
            .ok_or_else(|| SetupError::AssetNotFound {
                pattern: pattern.to_string(),
                extension: extension.to_string(),
                available: self.asset_names(),
            })
    }

    pub fn asset_names(&self) -> Vec<String> {
        self.assets.iter().map(|asset| asset.name.clone()).collect()
    }

    #[cfg(test)]
    pub fn with_assets(tag_name: &str, assets: &[(&str, u64, &str)]) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            published_at: Some("2024-05-01T12:00:00Z".to_string()),
            assets: assets
                .iter()
                .map(|(name, size, url)| ReleaseAsset {
                    name: name.to_string(),
                    size: *size,
                    browser_download_url: url.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_release() -> ReleaseInfo {
        ReleaseInfo::with_assets(
            "v1.2.0",
            &[
                ("foo.zip", 10, "https://example.com/foo.zip"),
                ("hp_py_sleep-1.2.0.zip", 20, "https://example.com/hp.zip"),
                ("readme.txt", 30, "https://example.com/readme.txt"),
            ],
        )
    }

    #[test]
    fn test_find_asset_by_pattern() {
        let release = sample_release();
        let asset = release.find_asset("hp_py_sleep", ".zip").unwrap();
        assert_eq!(asset, &release.assets[1]);
    }

    #[test]
    fn test_find_asset_takes_first_match() {
        let release = ReleaseInfo::with_assets(
            "v1",
            &[
                ("hp_py_sleep-arm64.zip", 1, "https://example.com/a.zip"),
                ("hp_py_sleep-x86_64.zip", 2, "https://example.com/b.zip"),
            ],
        );
        let asset = release.find_asset("hp_py_sleep", ".zip").unwrap();
        assert_eq!(asset.name, "hp_py_sleep-arm64.zip");
    }

    #[rstest]
    #[case(&[("readme.txt", 1, "u")])]
    #[case(&[("hp_py_sleep-1.2.0.tar.gz", 1, "u")])]
    #[case(&[("other-1.2.0.zip", 1, "u")])]
    #[case(&[])]
    fn test_find_asset_not_found(#[case] assets: &[(&str, u64, &str)]) {
        let release = ReleaseInfo::with_assets("v1", assets);
        let error = release.find_asset("hp_py_sleep", ".zip").unwrap_err();
        match error {
            SetupError::AssetNotFound { available, .. } => {
                assert_eq!(available, release.asset_names())
            }
            other => panic!("Expected AssetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_release_payload() {
        let payload = r#"{
            "tag_name": "v1.2.0",
            "published_at": "2024-05-01T12:00:00Z",
            "name": "Release 1.2.0",
            "assets": [
                {
                    "name": "hp_py_sleep-1.2.0.zip",
                    "size": 1048576,
                    "browser_download_url": "https://github.com/o/r/releases/download/v1.2.0/hp_py_sleep-1.2.0.zip",
                    "content_type": "application/zip"
                }
            ]
        }"#;
        let release: ReleaseInfo = serde_json::from_str(payload).unwrap();
        assert_eq!(release.tag_name, "v1.2.0");
        assert_eq!(release.published_at.as_deref(), Some("2024-05-01T12:00:00Z"));
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].size, 1048576);
    }

    #[test]
    fn test_parse_release_without_assets() {
        let release: ReleaseInfo =
            serde_json::from_str(r#"{"tag_name": "v1", "published_at": null}"#).unwrap();
        assert!(release.assets.is_empty());
        assert!(release.published_at.is_none());
    }

    #[test]
    fn test_parse_release_missing_tag() {
        let result = serde_json::from_str::<ReleaseInfo>(r#"{"assets": []}"#);
        assert!(result.is_err());
    }
}
