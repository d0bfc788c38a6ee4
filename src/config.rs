use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OtaError, Result};
use crate::version::DEFAULT_RELEASE_BRANCH;

/// Settings file looked up in the project directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "fw-ota.toml";

/// Topic namespace used when `ota.namespace` is not set.
pub const DEFAULT_NAMESPACE: &str = "co2monitor";

/// Build output directory used when `build.dir` is not set, relative to the
/// project directory.
pub const DEFAULT_BUILD_DIR: &str = ".pio/build";

/// Represents the complete project settings for fw-ota.
///
/// Every section is optional in the file; required OTA keys are only
/// enforced by [Config::ota_settings], so `fw-ota version` works without them.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub ota: OtaSection,

    #[serde(default)]
    pub version: VersionSection,

    #[serde(default)]
    pub build: BuildSection,
}

/// The `[ota]` section as written in the file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct OtaSection {
    /// Distribution host reached over ssh/scp
    pub host: Option<String>,
    /// Base directory on the distribution host
    pub path: Option<String>,
    /// Public URL the base directory is served under
    pub url: Option<String>,
    /// Message broker host, defaults to `host`
    pub broker: Option<String>,
    /// First topic level of the per-node command topics
    pub namespace: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionSection {
    #[serde(default = "default_release_branch")]
    pub release_branch: String,
}

fn default_release_branch() -> String {
    DEFAULT_RELEASE_BRANCH.to_string()
}

impl Default for VersionSection {
    fn default() -> Self {
        VersionSection {
            release_branch: default_release_branch(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildSection {
    #[serde(default = "default_build_dir")]
    pub dir: PathBuf,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUILD_DIR)
}

impl Default for BuildSection {
    fn default() -> Self {
        BuildSection {
            dir: default_build_dir(),
        }
    }
}

/// Validated deployment coordinates, all required keys present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaSettings {
    pub host: String,
    pub path: String,
    pub url: String,
    pub broker: String,
    pub namespace: String,
}

impl Config {
    /// Validates the `[ota]` section.
    ///
    /// Keys that are absent or blank are reported by name, in file order.
    ///
    /// # Returns
    /// * `Ok(OtaSettings)` - All of `host`, `path` and `url` are set
    /// * `Err(OtaError::Configuration)` - Naming the first missing key
    pub fn ota_settings(&self) -> Result<OtaSettings> {
        let host = required(&self.ota.host, "host")?;
        let path = required(&self.ota.path, "path")?;
        let url = required(&self.ota.url, "url")?;

        let broker = optional(&self.ota.broker).unwrap_or_else(|| host.clone());
        let namespace =
            optional(&self.ota.namespace).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(OtaSettings {
            host,
            path,
            url,
            broker,
            namespace,
        })
    }

    /// Expected location of the firmware image built for `environment`.
    ///
    /// A relative `build.dir` is taken relative to `project_dir`.
    pub fn artifact_path(&self, project_dir: &Path, environment: &str) -> PathBuf {
        project_dir
            .join(&self.build.dir)
            .join(environment)
            .join("firmware.bin")
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String> {
    optional(value).ok_or_else(|| OtaError::config(format!("missing key 'ota.{}'", key)))
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Loads settings from file or returns defaults.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `fw-ota.toml` in `project_dir`
/// 3. `fw-ota.toml` in user config directory
/// 4. Default settings if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom settings file
/// * `project_dir` - Directory the tool was pointed at with `--repo`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default settings
/// * `Err` - If a file exists (or was named explicitly) but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let project_config = project_dir.join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            OtaError::config(format!("cannot read {}: {}", path.display(), e))
        })?
    } else if project_config.exists() {
        fs::read_to_string(project_config)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses settings from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[ota]
host = "deploy.example.org"
path = "/srv/www/firmware"
url = "https://example.org/firmware"
"#;

    #[test]
    fn test_full_ota_section() {
        let config = parse_config(FULL).unwrap();
        let settings = config.ota_settings().unwrap();

        assert_eq!(settings.host, "deploy.example.org");
        assert_eq!(settings.path, "/srv/www/firmware");
        assert_eq!(settings.url, "https://example.org/firmware");
        assert_eq!(settings.broker, "deploy.example.org");
        assert_eq!(settings.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_missing_key_is_named() {
        let config = parse_config("[ota]\nhost = \"h\"\nurl = \"u\"\n").unwrap();
        let err = config.ota_settings().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: missing key 'ota.path'");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = parse_config("[ota]\nhost = \"  \"\npath = \"p\"\nurl = \"u\"\n").unwrap();
        let err = config.ota_settings().unwrap_err();
        assert!(err.to_string().contains("'ota.host'"));
    }

    #[test]
    fn test_missing_section_fails_on_host() {
        let config = parse_config("").unwrap();
        let err = config.ota_settings().unwrap_err();
        assert!(matches!(err, OtaError::Configuration(_)));
        assert!(err.to_string().contains("'ota.host'"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.version.release_branch, "main");
        assert_eq!(config.build.dir, PathBuf::from(".pio/build"));
    }

    #[test]
    fn test_artifact_path_convention() {
        let config = Config::default();
        assert_eq!(
            config.artifact_path(Path::new("."), "esp32-co2"),
            PathBuf::from("./.pio/build/esp32-co2/firmware.bin")
        );
        assert_eq!(
            config.artifact_path(Path::new("boards/co2"), "esp32-co2"),
            PathBuf::from("boards/co2/.pio/build/esp32-co2/firmware.bin")
        );
    }

    #[test]
    fn test_optional_keys_override_defaults() {
        let content = format!(
            "{}broker = \"mqtt.example.org\"\nnamespace = \"lab\"\n\n[version]\nrelease_branch = \"release\"\n\n[build]\ndir = \"out\"\n",
            FULL
        );
        let config = parse_config(&content).unwrap();
        let settings = config.ota_settings().unwrap();

        assert_eq!(settings.broker, "mqtt.example.org");
        assert_eq!(settings.namespace, "lab");
        assert_eq!(config.version.release_branch, "release");
        assert_eq!(
            config.artifact_path(Path::new("proj"), "env"),
            PathBuf::from("proj/out/env/firmware.bin")
        );
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = parse_config("[ota\nhost = ").unwrap_err();
        assert!(matches!(err, OtaError::Configuration(_)));
    }
}
