use crate::error::CoreError;
use config::{Config as ConfigLoader, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use url::Url;

// Helper for deserializing Duration from milliseconds
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Environment variables holding the credential fixtures.
pub const STANDARD_USER_ENV: &str = "STANDARD_USER";
pub const LOCKED_OUT_USER_ENV: &str = "LOCKED_OUT_USER";
pub const PASSWORD_ENV: &str = "PASSWORD";

// Main configuration structure
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)] // Ensure fields default if missing in config source
pub struct Config {
    pub global: GlobalConfig,
    pub target: TargetConfig,
    pub browser: BrowserConfig,
    pub artifacts: ArtifactsConfig,
    pub credentials: CredentialsConfig,
}

// Global settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    pub log_level: String,
    /// Upper bound for every element-level wait.
    #[serde(rename = "default_timeout_ms", with = "duration_ms_serde")]
    pub default_timeout: Duration,
    /// Upper bound for page loads triggered by `navigate`.
    #[serde(rename = "navigation_timeout_ms", with = "duration_ms_serde")]
    pub navigation_timeout: Duration,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_timeout: Duration::from_secs(10),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

// The application under test
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.saucedemo.com".to_string(),
        }
    }
}

impl TargetConfig {
    /// Joins an application path (e.g. `/cart.html`) onto the base URL.
    pub fn url_for(&self, path: &str) -> Result<String, CoreError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| CoreError::InvalidConfig(format!("target.base_url: {}", e)))?;
        base.join(path.trim_start_matches('/'))
            .map(String::from)
            .map_err(|e| CoreError::InvalidConfig(format!("cannot join {:?}: {}", path, e)))
    }
}

// Configuration for launching the browser
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BrowserConfig {
    pub executable_path: Option<PathBuf>,
    pub headless: bool,
    pub args: Vec<String>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable_path: None,
            headless: true,
            args: Vec::new(),
            window_width: 1280,
            window_height: 720,
        }
    }
}

// Where run artifacts are written
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Persisted pre-authenticated identity written by the bootstrapper.
    pub storage_state_path: PathBuf,
    /// Diagnostic screenshots captured on failure paths.
    pub screenshot_dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            storage_state_path: PathBuf::from("auth-state.json"),
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

// Credential fixtures, resolved once at load time
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CredentialsConfig {
    pub standard_user: String,
    pub locked_out_user: String,
    pub password: SecretString,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            standard_user: "standard_user".to_string(),
            locked_out_user: "locked_out_user".to_string(),
            password: SecretString::from("secret_sauce".to_string()),
        }
    }
}

impl Config {
    /// Rejects values that would only fail later, deep inside a scenario.
    pub fn validate(&self) -> Result<(), CoreError> {
        Url::parse(&self.target.base_url)
            .map_err(|e| CoreError::InvalidConfig(format!("target.base_url: {}", e)))?;
        if self.global.default_timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "global.default_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.global.navigation_timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "global.navigation_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// --- Loading Logic ---

/// Loads configuration from a file and environment variables.
///
/// Looks for `storewright.toml` (or `.json`, `.yaml`, etc.) in the current directory
/// unless `source_path` names a file explicitly, in which case that file must exist.
/// Overrides with environment variables prefixed with `STOREWRIGHT_`, using `__` for
/// nested fields (e.g. `STOREWRIGHT_TARGET__BASE_URL=http://localhost:3000`).
/// Finally `STANDARD_USER`, `LOCKED_OUT_USER` and `PASSWORD` override the credentials.
pub fn load_config(source_path: Option<PathBuf>) -> Result<Config, CoreError> {
    let default_config_name = "storewright"; // Base name for config files

    let mut builder = ConfigLoader::builder();

    if let Some(path) = source_path {
        if !path.exists() {
            return Err(CoreError::ConfigFileNotFound(path));
        }
        log::debug!("Loading configuration from: {:?}", path);
        builder = builder.add_source(File::from(path).required(true));
    } else {
        log::debug!(
            "Attempting to load configuration from default locations (e.g., {}.toml)",
            default_config_name
        );
        builder = builder.add_source(File::with_name(default_config_name).required(false));
    }

    builder = builder
        .add_source(
            Environment::with_prefix("STOREWRIGHT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("browser.args"),
        )
        .set_override_option("credentials.standard_user", std::env::var(STANDARD_USER_ENV).ok())?
        .set_override_option(
            "credentials.locked_out_user",
            std::env::var(LOCKED_OUT_USER_ENV).ok(),
        )?
        .set_override_option("credentials.password", std::env::var(PASSWORD_ENV).ok())?;

    let cfg = builder.build()?.try_deserialize::<Config>()?;
    cfg.validate()?;

    log::debug!("Successfully loaded configuration: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn defaults_point_at_the_public_demo_store() {
        let cfg = Config::default();
        assert_eq!(cfg.target.base_url, "https://www.saucedemo.com");
        assert_eq!(cfg.global.default_timeout, Duration::from_secs(10));
        assert_eq!(cfg.artifacts.storage_state_path, PathBuf::from("auth-state.json"));
        assert_eq!(cfg.credentials.password.expose_secret(), "secret_sauce");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn loads_overrides_from_an_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[global]
log_level = "debug"
default_timeout_ms = 2500

[target]
base_url = "http://localhost:8080"

[browser]
headless = false
args = ["--no-sandbox"]
"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.global.log_level, "debug");
        assert_eq!(cfg.global.default_timeout, Duration::from_millis(2500));
        // untouched sections keep their defaults
        assert_eq!(cfg.global.navigation_timeout, Duration::from_secs(30));
        assert_eq!(cfg.target.base_url, "http://localhost:8080");
        assert!(!cfg.browser.headless);
        assert_eq!(cfg.browser.args, vec!["--no-sandbox".to_string()]);
        assert_eq!(cfg.artifacts.screenshot_dir, PathBuf::from("screenshots"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        match load_config(Some(missing.clone())) {
            Err(CoreError::ConfigFileNotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected ConfigFileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_timeouts_and_bad_urls() {
        let mut cfg = Config::default();
        cfg.global.default_timeout = Duration::ZERO;
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));

        let mut cfg = Config::default();
        cfg.target.base_url = "not a url".to_string();
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn url_for_joins_paths_onto_the_base() {
        let target = TargetConfig {
            base_url: "http://localhost:3000/".to_string(),
        };
        assert_eq!(
            target.url_for("/inventory.html").unwrap(),
            "http://localhost:3000/inventory.html"
        );
        assert_eq!(target.url_for("").unwrap(), "http://localhost:3000/");
    }
}
