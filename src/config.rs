//! Configuration management for ado-workitems.
//!
//! This module handles loading configuration from multiple sources:
//! - TOML configuration files following XDG Base Directory specification
//! - Environment variables
//! - Command line arguments
//!
//! ## Example
//!
//! ```rust,no_run
//! use ado_workitems::Config;
//!
//! // Load configuration from file, with fallback to defaults
//! let config = Config::load_from_file().unwrap();
//!
//! // Merge configurations (env takes precedence)
//! let merged = Config::default().merge(config).merge(Config::load_from_env());
//! let client_config = merged.resolve().unwrap();
//! ```

use crate::cli::ConnectionArgs;
use crate::error::ConfigError;
use crate::models::{ClientConfig, DEFAULT_BASE_URL, StatusCheck};
use crate::parsed_property::ParsedProperty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_ORGANIZATION: &str = "ADO_WORKITEMS_ORGANIZATION";
pub const ENV_PROJECT: &str = "ADO_WORKITEMS_PROJECT";
pub const ENV_PAT: &str = "ADO_WORKITEMS_PAT";
pub const ENV_BASE_URL: &str = "ADO_WORKITEMS_BASE_URL";
pub const ENV_STRICT_STATUS: &str = "ADO_WORKITEMS_STRICT_STATUS";
pub const ENV_TIMEOUT_SECS: &str = "ADO_WORKITEMS_TIMEOUT_SECS";

const CONFIG_DIR_NAME: &str = "ado-workitems";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Temporary struct for deserializing TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub pat: Option<String>,
    pub base_url: Option<String>,
    pub strict_status: Option<bool>,
    pub timeout_secs: Option<u64>,
}

/// Configuration assembled from CLI arguments, environment variables, config file, and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Azure DevOps organization name.
    pub organization: Option<ParsedProperty<String>>,
    /// Azure DevOps project name.
    pub project: Option<ParsedProperty<String>>,
    /// Personal access token for authenticating with Azure DevOps.
    pub pat: Option<ParsedProperty<String>>,
    /// Service root, e.g. an Azure DevOps Server collection URL.
    pub base_url: Option<ParsedProperty<String>>,
    /// Whether non-success statuses fail before the body is parsed.
    pub strict_status: Option<ParsedProperty<bool>>,
    /// Whole-request timeout in seconds; 0 disables the timeout.
    pub timeout_secs: Option<ParsedProperty<u64>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: None,
            project: None,
            pat: None,
            base_url: Some(ParsedProperty::Default(DEFAULT_BASE_URL.to_string())),
            strict_status: Some(ParsedProperty::Default(false)),
            timeout_secs: Some(ParsedProperty::Default(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl Config {
    /// A config with every field unset, for use as a merge layer.
    pub fn empty() -> Self {
        Self {
            organization: None,
            project: None,
            pat: None,
            base_url: None,
            strict_status: None,
            timeout_secs: None,
        }
    }

    /// Load configuration from XDG config directory
    #[must_use = "this returns the loaded configuration which should be used"]
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific TOML file.
    ///
    /// A missing file yields an empty layer rather than an error.
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Self::empty());
        }

        let config_content =
            fs::read_to_string(config_path).map_err(|e| ConfigError::FileReadError {
                path: config_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let config_file: ConfigFile =
            toml::from_str(&config_content).map_err(|e| ConfigError::ParseError {
                path: config_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let path = config_path.to_path_buf();
        Ok(Self {
            organization: config_file
                .organization
                .map(|v| ParsedProperty::File(v.clone(), path.clone(), v)),
            project: config_file
                .project
                .map(|v| ParsedProperty::File(v.clone(), path.clone(), v)),
            pat: config_file
                .pat
                .map(|v| ParsedProperty::File(v.clone(), path.clone(), v)),
            base_url: config_file
                .base_url
                .map(|v| ParsedProperty::File(v.clone(), path.clone(), v)),
            strict_status: config_file
                .strict_status
                .map(|v| ParsedProperty::File(v, path.clone(), v.to_string())),
            timeout_secs: config_file
                .timeout_secs
                .map(|v| ParsedProperty::File(v, path.clone(), v.to_string())),
        })
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            organization: std::env::var(ENV_ORGANIZATION)
                .ok()
                .map(|v| ParsedProperty::Env(v.clone(), v)),
            project: std::env::var(ENV_PROJECT)
                .ok()
                .map(|v| ParsedProperty::Env(v.clone(), v)),
            pat: std::env::var(ENV_PAT)
                .ok()
                .map(|v| ParsedProperty::Env(v.clone(), v)),
            base_url: std::env::var(ENV_BASE_URL)
                .ok()
                .map(|v| ParsedProperty::Env(v.clone(), v)),
            strict_status: std::env::var(ENV_STRICT_STATUS).ok().and_then(|s| {
                s.parse::<bool>()
                    .ok()
                    .map(|v| ParsedProperty::Env(v, s.clone()))
            }),
            timeout_secs: std::env::var(ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok().map(|v| ParsedProperty::Env(v, s))),
        }
    }

    /// Build a config layer from command line connection arguments.
    pub fn from_connection_args(args: &ConnectionArgs) -> Self {
        Self {
            organization: args
                .organization
                .clone()
                .map(|v| ParsedProperty::Cli(v.clone(), v)),
            project: args
                .project
                .clone()
                .map(|v| ParsedProperty::Cli(v.clone(), v)),
            pat: args.pat.clone().map(|v| ParsedProperty::Cli(v.clone(), v)),
            base_url: args
                .base_url
                .clone()
                .map(|v| ParsedProperty::Cli(v.clone(), v)),
            // A bare flag can only turn strict checking on
            strict_status: args
                .strict_status
                .then(|| ParsedProperty::Cli(true, "--strict-status".to_string())),
            timeout_secs: args
                .timeout_secs
                .map(|v| ParsedProperty::Cli(v, v.to_string())),
        }
    }

    /// Get the XDG config file path for ado-workitems
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        // Use XDG_CONFIG_HOME if set, otherwise ~/.config
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or(ConfigError::NoConfigDirectory)?
                .join(".config"),
        };

        Ok(config_dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Merge this config with another, preferring values from other when they exist
    pub fn merge(self, other: Self) -> Self {
        Self {
            organization: other.organization.or(self.organization),
            project: other.project.or(self.project),
            pat: other.pat.or(self.pat),
            base_url: other.base_url.or(self.base_url),
            strict_status: other.strict_status.or(self.strict_status),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Layer defaults, config file, environment and CLI, in rising precedence.
    pub fn load_layered(cli: Self) -> Result<Self, ConfigError> {
        Ok(Self::default()
            .merge(Self::load_from_file()?)
            .merge(Self::load_from_env())
            .merge(cli))
    }

    /// Turn the merged configuration into client settings.
    pub fn resolve(self) -> Result<ClientConfig, ConfigError> {
        let organization = required(self.organization, "organization", ENV_ORGANIZATION)?;
        let project = required(self.project, "project", ENV_PROJECT)?;
        let pat = required(self.pat, "pat", ENV_PAT)?;

        let mut client_config = ClientConfig::new(pat, organization, project);
        if let Some(base_url) = self.base_url {
            client_config = client_config.with_base_url(base_url.into_value());
        }
        if self.strict_status.is_some_and(|p| p.into_value()) {
            client_config = client_config.with_status_check(StatusCheck::Strict);
        }
        match self.timeout_secs.map(ParsedProperty::into_value) {
            Some(0) | None => {}
            Some(secs) => client_config = client_config.with_timeout(Duration::from_secs(secs)),
        }

        Ok(client_config)
    }

    /// Create a sample config file for user reference.
    ///
    /// Returns the path written, or `None` if a config file already exists.
    #[must_use = "this operation can fail and the result should be checked"]
    pub fn create_sample_config() -> Result<Option<PathBuf>, ConfigError> {
        let config_path = Self::get_config_path()?;
        Self::write_sample_config(&config_path)
    }

    fn write_sample_config(config_path: &Path) -> Result<Option<PathBuf>, ConfigError> {
        // Don't overwrite existing config
        if config_path.exists() {
            return Ok(None);
        }

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::DirectoryCreationError {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        let sample_config = r#"# ado-workitems Configuration File
# This file follows the XDG Base Directory specification
# Location: ~/.config/ado-workitems/config.toml

# Azure DevOps organization (required)
# organization = "your-organization"

# Azure DevOps project (required)
# project = "your-project"

# Personal Access Token (required, but consider using environment variable ADO_WORKITEMS_PAT instead)
# pat = "your-pat-token"

# Service root (optional, defaults to "https://dev.azure.com")
# base_url = "https://tfs.example.com/tfs"

# Fail on non-success HTTP statuses instead of parsing the body (optional, defaults to false)
strict_status = false

# Request timeout in seconds, 0 disables it (optional, defaults to 30)
timeout_secs = 30
"#;

        fs::write(config_path, sample_config).map_err(|e| ConfigError::FileReadError {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Some(config_path.to_path_buf()))
    }
}

fn required(
    property: Option<ParsedProperty<String>>,
    field: &str,
    env_var: &str,
) -> Result<String, ConfigError> {
    property
        .map(ParsedProperty::into_value)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingRequired {
            field: field.to_string(),
            env_var: env_var.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::file_serial;
    use std::env;
    use tempfile::TempDir;

    const ALL_ENV_VARS: [&str; 6] = [
        ENV_ORGANIZATION,
        ENV_PROJECT,
        ENV_PAT,
        ENV_BASE_URL,
        ENV_STRICT_STATUS,
        ENV_TIMEOUT_SECS,
    ];

    fn clear_env() {
        for var in ALL_ENV_VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    /// # Config Default Values
    ///
    /// Tests that the default configuration contains expected values.
    ///
    /// ## Test Scenario
    /// - Creates a default Config instance
    ///
    /// ## Expected Outcome
    /// - Connection fields are unset, optional fields have defaults
    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.organization, None);
        assert_eq!(config.project, None);
        assert_eq!(config.pat, None);
        assert_eq!(
            config.base_url,
            Some(ParsedProperty::Default("https://dev.azure.com".to_string()))
        );
        assert_eq!(config.strict_status, Some(ParsedProperty::Default(false)));
        assert_eq!(config.timeout_secs, Some(ParsedProperty::Default(30)));
    }

    /// # Load Config from Environment Variables
    ///
    /// Tests loading configuration when all environment variables are present.
    ///
    /// ## Test Scenario
    /// - Sets all ADO_WORKITEMS_* connection variables
    ///
    /// ## Expected Outcome
    /// - Every value is read and tagged with the env source
    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_env_all_variables() {
        clear_env();
        unsafe {
            env::set_var(ENV_ORGANIZATION, "env-org");
            env::set_var(ENV_PROJECT, "env-project");
            env::set_var(ENV_PAT, "env-pat");
            env::set_var(ENV_BASE_URL, "http://localhost:9999");
            env::set_var(ENV_STRICT_STATUS, "true");
            env::set_var(ENV_TIMEOUT_SECS, "12");
        }

        let config = Config::load_from_env();
        clear_env();

        assert_eq!(
            config.organization,
            Some(ParsedProperty::Env("env-org".to_string(), "env-org".to_string()))
        );
        assert_eq!(config.project.as_deref().map(String::as_str), Some("env-project"));
        assert_eq!(config.pat.as_ref().unwrap().source_name(), "env");
        assert_eq!(
            config.base_url.as_deref().map(String::as_str),
            Some("http://localhost:9999")
        );
        assert_eq!(
            config.strict_status,
            Some(ParsedProperty::Env(true, "true".to_string()))
        );
        assert_eq!(
            config.timeout_secs,
            Some(ParsedProperty::Env(12, "12".to_string()))
        );
    }

    /// # Invalid Environment Values
    ///
    /// Tests that unparsable typed environment values are ignored.
    ///
    /// ## Test Scenario
    /// - Sets non-boolean and non-numeric values for typed fields
    ///
    /// ## Expected Outcome
    /// - Those fields are None and do not override lower layers
    #[test]
    #[file_serial(env_tests)]
    fn test_load_from_env_invalid_values() {
        clear_env();
        unsafe {
            env::set_var(ENV_STRICT_STATUS, "sometimes");
            env::set_var(ENV_TIMEOUT_SECS, "soon");
        }

        let config = Config::load_from_env();
        clear_env();

        assert_eq!(config.strict_status, None);
        assert_eq!(config.timeout_secs, None);
        let merged = Config::default().merge(config);
        assert_eq!(merged.timeout_secs, Some(ParsedProperty::Default(30)));
    }

    /// # Merge Precedence
    ///
    /// Tests that merge prefers the other side's present values.
    ///
    /// ## Test Scenario
    /// - Merges a file layer over defaults, then a CLI layer over that
    ///
    /// ## Expected Outcome
    /// - Each field comes from the highest layer that sets it
    #[test]
    fn test_config_merge_other_takes_precedence() {
        let path = PathBuf::from("/tmp/config.toml");
        let file = Config {
            organization: Some(ParsedProperty::File(
                "file-org".to_string(),
                path.clone(),
                "file-org".to_string(),
            )),
            project: Some(ParsedProperty::File(
                "file-project".to_string(),
                path.clone(),
                "file-project".to_string(),
            )),
            timeout_secs: Some(ParsedProperty::File(60, path, "60".to_string())),
            ..Config::empty()
        };
        let cli = Config {
            organization: Some(ParsedProperty::Cli(
                "cli-org".to_string(),
                "cli-org".to_string(),
            )),
            ..Config::empty()
        };

        let merged = Config::default().merge(file).merge(cli);

        assert_eq!(merged.organization.as_ref().unwrap().source_name(), "cli");
        assert_eq!(merged.organization.as_deref().map(String::as_str), Some("cli-org"));
        assert_eq!(merged.project.as_ref().unwrap().source_name(), "file");
        assert_eq!(*merged.timeout_secs.unwrap(), 60);
        assert_eq!(merged.strict_status.unwrap().source_name(), "default");
    }

    /// # Load Config from a Valid TOML File
    ///
    /// Tests parsing of every supported key.
    ///
    /// ## Test Scenario
    /// - Writes a TOML file in a temporary directory and loads it
    ///
    /// ## Expected Outcome
    /// - Values are read and tagged with the file path
    #[test]
    fn test_load_from_path_valid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
organization = "file-org"
project = "file-project"
pat = "file-pat"
base_url = "https://tfs.example.com/tfs"
strict_status = true
timeout_secs = 45
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(
            config.organization,
            Some(ParsedProperty::File(
                "file-org".to_string(),
                config_path.clone(),
                "file-org".to_string()
            ))
        );
        assert_eq!(config.pat.as_deref().map(String::as_str), Some("file-pat"));
        assert_eq!(
            config.base_url.as_deref().map(String::as_str),
            Some("https://tfs.example.com/tfs")
        );
        assert_eq!(
            config.strict_status,
            Some(ParsedProperty::File(true, config_path.clone(), "true".to_string()))
        );
        assert_eq!(
            config.timeout_secs,
            Some(ParsedProperty::File(45, config_path, "45".to_string()))
        );
    }

    /// # Missing File Returns Empty Layer
    ///
    /// ## Test Scenario
    /// - Loads a path that does not exist
    ///
    /// ## Expected Outcome
    /// - An all-None layer is returned without error
    #[test]
    fn test_load_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::empty());
    }

    /// # Invalid TOML
    ///
    /// ## Test Scenario
    /// - Loads a file with a type mismatch
    ///
    /// ## Expected Outcome
    /// - ConfigError::ParseError naming the path
    #[test]
    fn test_load_from_path_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "timeout_secs = \"thirty\"\n").unwrap();

        match Config::load_from_path(&config_path) {
            Err(ConfigError::ParseError { path, .. }) => assert_eq!(path, config_path),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    /// # XDG Config Path
    ///
    /// Tests that XDG_CONFIG_HOME decides the config file location.
    ///
    /// ## Test Scenario
    /// - Points XDG_CONFIG_HOME at a temporary directory
    ///
    /// ## Expected Outcome
    /// - Path is $XDG_CONFIG_HOME/ado-workitems/config.toml
    #[test]
    #[file_serial(env_tests)]
    fn test_get_config_path_uses_xdg_config_home() {
        let temp_dir = TempDir::new().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();

        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::get_config_path();

        match original_xdg {
            Some(val) => unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            },
            None => unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            },
        }

        assert_eq!(
            result.unwrap(),
            temp_dir.path().join("ado-workitems").join("config.toml")
        );
    }

    /// # Sample Config Creation
    ///
    /// Tests writing the sample file and refusing to overwrite it.
    ///
    /// ## Test Scenario
    /// - Writes the sample into a fresh nested directory
    /// - Modifies it and writes again
    ///
    /// ## Expected Outcome
    /// - First call creates directories and file, and the file parses
    /// - Second call returns None and leaves the file untouched
    #[test]
    fn test_sample_config_created_once() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("ado-workitems").join("config.toml");

        let written = Config::write_sample_config(&config_path).unwrap();
        assert_eq!(written, Some(config_path.clone()));

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(*loaded.timeout_secs.unwrap(), 30);
        assert!(!*loaded.strict_status.unwrap());
        assert!(loaded.organization.is_none());

        fs::write(&config_path, "organization = \"mine\"\n").unwrap();
        assert_eq!(Config::write_sample_config(&config_path).unwrap(), None);
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "organization = \"mine\"\n"
        );
    }

    /// # Resolve Into Client Settings
    ///
    /// Tests conversion of a complete configuration.
    ///
    /// ## Test Scenario
    /// - Resolves defaults plus connection values, strict status and a timeout
    ///
    /// ## Expected Outcome
    /// - ClientConfig carries every value, token included
    #[test]
    fn test_resolve_complete_config() {
        let config = Config {
            organization: Some("org".to_string().into()),
            project: Some("proj".to_string().into()),
            pat: Some("pat".to_string().into()),
            strict_status: Some(true.into()),
            timeout_secs: Some(5.into()),
            ..Config::default()
        };

        let client_config = config.resolve().unwrap();

        assert_eq!(client_config.organization, "org");
        assert_eq!(client_config.project, "proj");
        assert_eq!(client_config.token.expose_secret(), "pat");
        assert_eq!(client_config.base_url, "https://dev.azure.com");
        assert_eq!(client_config.status_check, StatusCheck::Strict);
        assert_eq!(client_config.timeout, Some(Duration::from_secs(5)));
    }

    /// # Zero Timeout Disables Deadline
    ///
    /// ## Test Scenario
    /// - Resolves a config with timeout_secs = 0
    ///
    /// ## Expected Outcome
    /// - ClientConfig has no timeout and permissive status checking
    #[test]
    fn test_resolve_zero_timeout() {
        let config = Config {
            organization: Some("org".to_string().into()),
            project: Some("proj".to_string().into()),
            pat: Some("pat".to_string().into()),
            timeout_secs: Some(0.into()),
            ..Config::default()
        };

        let client_config = config.resolve().unwrap();
        assert_eq!(client_config.timeout, None);
        assert_eq!(client_config.status_check, StatusCheck::Permissive);
    }

    /// # Missing Required Fields
    ///
    /// Tests the error produced for each absent or blank connection field.
    ///
    /// ## Test Scenario
    /// - Resolves configs lacking organization, project or PAT
    ///
    /// ## Expected Outcome
    /// - MissingRequired names the field and its environment variable
    #[test]
    fn test_resolve_missing_required() {
        let full = Config {
            organization: Some("org".to_string().into()),
            project: Some("proj".to_string().into()),
            pat: Some("pat".to_string().into()),
            ..Config::default()
        };

        let cases = [
            (
                Config {
                    organization: None,
                    ..full.clone()
                },
                "organization",
                ENV_ORGANIZATION,
            ),
            (
                Config {
                    project: Some(" ".to_string().into()),
                    ..full.clone()
                },
                "project",
                ENV_PROJECT,
            ),
            (
                Config {
                    pat: None,
                    ..full.clone()
                },
                "pat",
                ENV_PAT,
            ),
        ];

        for (config, expected_field, expected_env) in cases {
            match config.resolve() {
                Err(ConfigError::MissingRequired { field, env_var }) => {
                    assert_eq!(field, expected_field);
                    assert_eq!(env_var, expected_env);
                }
                other => panic!("expected MissingRequired, got {:?}", other),
            }
        }
    }
}
