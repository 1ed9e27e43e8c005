//! Server configuration.
//!
//! Values are layered: built-in defaults, then `<config_dir>/mdocs/config.toml`
//! (or `--config`), then environment variables, then `serve` flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default HTTP port when neither the file nor `PORT` sets one.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(u16),

    #[error("host must not be empty")]
    EmptyHost,

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Errors reading, parsing or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {origin}{}: {message}", location_suffix(.location))]
    Parse {
        origin: String,
        location: Option<(usize, usize)>,
        message: String,
    },

    #[error("cannot write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the mdocs server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP listener configuration.
    pub server: ServerConfig,

    /// Document and static asset locations.
    pub docs: DocsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

/// Document and static asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocsConfig {
    /// Directory holding the Markdown documents. Only files directly inside it
    /// are served.
    pub docs_dir: PathBuf,

    /// Directory holding the application shell, client script and stylesheet.
    pub public_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mdocs")
        .join("config.toml")
}

/// Outcome of [`Config::apply_env_overrides`].
///
/// Logging is not initialized when overrides are applied, so the caller
/// reports these once it is.
#[derive(Debug, Default, PartialEq)]
pub struct EnvOverrides {
    /// Variables whose values were applied.
    pub applied: Vec<&'static str>,
    /// Variables that were set but could not be parsed, with their value.
    pub rejected: Vec<(&'static str, String)>,
}

/// Read a non-empty environment variable.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values. Empty
    /// values are ignored. Supported variables:
    /// - PORT: HTTP port
    /// - MDOCS_HOST: bind address
    /// - MDOCS_DOCS_DIR: documents directory
    /// - MDOCS_PUBLIC_DIR: static assets directory
    /// - MDOCS_LOG_LEVEL: log level (trace, debug, info, warn, error)
    pub fn apply_env_overrides(&mut self) -> EnvOverrides {
        let mut overrides = EnvOverrides::default();

        if let Some(port) = non_empty_env("PORT") {
            match port.parse() {
                Ok(parsed) => {
                    self.server.port = parsed;
                    overrides.applied.push("PORT");
                }
                Err(_) => overrides.rejected.push(("PORT", port)),
            }
        }

        if let Some(host) = non_empty_env("MDOCS_HOST") {
            self.server.host = host;
            overrides.applied.push("MDOCS_HOST");
        }

        if let Some(dir) = non_empty_env("MDOCS_DOCS_DIR") {
            self.docs.docs_dir = PathBuf::from(dir);
            overrides.applied.push("MDOCS_DOCS_DIR");
        }

        if let Some(dir) = non_empty_env("MDOCS_PUBLIC_DIR") {
            self.docs.public_dir = PathBuf::from(dir);
            overrides.applied.push("MDOCS_PUBLIC_DIR");
        }

        if let Some(level) = non_empty_env("MDOCS_LOG_LEVEL") {
            self.logging.log_level = level;
            overrides.applied.push("MDOCS_LOG_LEVEL");
        }

        overrides
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort(self.server.port));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        let level = self.logging.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(
                self.logging.log_level.clone(),
            ));
        }

        Ok(())
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults. Parse errors carry the file name
    /// and the line and column of the offending value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigFileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        parse_toml(&path.display().to_string(), &contents)
    }

    /// Load configuration from [`default_config_path`].
    pub fn load_default() -> Result<Self, ConfigFileError> {
        Self::load(default_config_path())
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigFileError> {
        parse_toml("<inline>", toml_str)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigFileError> {
        let path = path.as_ref();
        let write_error = |source: io::Error| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, self.to_toml()?).map_err(write_error)?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Serialize the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn parse_toml(origin: &str, contents: &str) -> Result<Config, ConfigFileError> {
    toml::from_str(contents).map_err(|e| ConfigFileError::Parse {
        origin: origin.to_string(),
        location: e.span().map(|span| line_column(contents, span.start)),
        message: e.message().to_string(),
    })
}

/// 1-based line and column of a byte offset.
fn line_column(contents: &str, offset: usize) -> (usize, usize) {
    let before = contents.get(..offset).unwrap_or(contents);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);

    (
        before.matches('\n').count() + 1,
        before[line_start..].chars().count() + 1,
    )
}

fn location_suffix(location: &Option<(usize, usize)>) -> String {
    match location {
        Some((line, column)) => format!(":{line}:{column}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "PORT",
        "MDOCS_HOST",
        "MDOCS_DOCS_DIR",
        "MDOCS_PUBLIC_DIR",
        "MDOCS_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.docs.docs_dir, PathBuf::from("docs"));
        assert_eq!(config.docs.public_dir, PathBuf::from("public"));
        assert_eq!(config.logging.log_level, "info");
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_from_toml_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let toml = r#"
[server]
port = 8080

[logging]
log_level = "debug"
"#;
        let config = Config::from_toml(toml).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.log_level, "debug");
        // Other values should be defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.docs, DocsConfig::default());
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 4000

[docs]
docs_dir = "/srv/manuals"
public_dir = "/srv/www"

[logging]
log_level = "trace"
log_dir = "/var/log/mdocs"
"#;
        let config = Config::from_toml(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.docs.docs_dir, PathBuf::from("/srv/manuals"));
        assert_eq!(config.docs.public_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.logging.log_level, "trace");
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("/var/log/mdocs")));
    }

    #[test]
    fn test_from_toml_invalid_syntax() {
        let toml = r#"
[server
port = 1
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::Parse {
                location: Some(_),
                ..
            }
        ));
        assert!(err.to_string().starts_with("invalid configuration in <inline>:"));
    }

    #[test]
    fn test_from_toml_wrong_type() {
        let toml = r#"
[server]
port = "not a number"
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::Parse {
                location: Some((3, _)),
                ..
            }
        ));
    }

    #[test]
    fn test_line_column() {
        let text = "a = 1\nbb = 2\n";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 4), (1, 5));
        assert_eq!(line_column(text, 6), (2, 1));
        assert_eq!(line_column(text, 11), (2, 6));
        assert_eq!(line_column(text, 1000), (3, 1));
    }

    #[test]
    fn test_load_unreadable_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigFileError::Read { .. }));
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = Config::default()
            .save(blocker.join("config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigFileError::Write { .. }));
    }

    #[test]
    fn test_from_toml_port_out_of_range() {
        let toml = r#"
[server]
port = 70000
"#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn test_roundtrip_custom() {
        let mut original = Config::default();
        original.server.port = 9000;
        original.docs.docs_dir = PathBuf::from("/data/docs");
        original.logging.log_dir = Some(PathBuf::from("/tmp/logs"));

        let toml = original.to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[docs]"));
        assert!(toml.contains("[logging]"));

        let loaded = Config::from_toml(&toml).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_to_toml_omits_unset_log_dir() {
        let toml = Config::default().to_toml().unwrap();
        assert!(!toml.contains("log_dir"));
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config::load("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = Config::default();
        original.server.host = "localhost".to_string();
        original.logging.log_level = "warn".to_string();

        original.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();

        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "invalid [ toml").unwrap();

        let err = Config::load(&config_path).unwrap_err().to_string();
        assert!(err.contains("config.toml:1:"), "unexpected message: {err}");
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.to_string_lossy().contains("mdocs"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    #[serial]
    fn test_env_override_port() {
        clear_env();
        std::env::set_var("PORT", "8081");

        let mut config = Config::default();
        let overrides = config.apply_env_overrides();

        assert_eq!(config.server.port, 8081);
        assert_eq!(overrides.applied, vec!["PORT"]);
        assert!(overrides.rejected.is_empty());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_unparsable_port_is_ignored() {
        clear_env();
        std::env::set_var("PORT", "eighty");

        let mut config = Config::default();
        let overrides = config.apply_env_overrides();

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(overrides.applied.is_empty());
        assert_eq!(overrides.rejected, vec![("PORT", "eighty".to_string())]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_empty_does_not_override() {
        clear_env();
        std::env::set_var("MDOCS_DOCS_DIR", "");
        std::env::set_var("PORT", "");

        let mut config = Config::default();
        let overrides = config.apply_env_overrides();

        assert_eq!(config, Config::default());
        assert_eq!(overrides, EnvOverrides::default());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_all() {
        clear_env();
        std::env::set_var("MDOCS_HOST", "127.0.0.1");
        std::env::set_var("MDOCS_DOCS_DIR", "/srv/docs");
        std::env::set_var("MDOCS_PUBLIC_DIR", "/srv/public");
        std::env::set_var("MDOCS_LOG_LEVEL", "debug");

        let mut config = Config::default();
        let overrides = config.apply_env_overrides();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.docs.docs_dir, PathBuf::from("/srv/docs"));
        assert_eq!(config.docs.public_dir, PathBuf::from("/srv/public"));
        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(overrides.applied.len(), 4);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_unset_does_not_override() {
        clear_env();

        let mut config = Config::default();
        assert_eq!(config.apply_env_overrides(), EnvOverrides::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPort(0)));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn test_validate_log_level_case_insensitive() {
        let mut config = Config::default();

        config.logging.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.logging.log_level = "Warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_log_level_invalid() {
        let mut config = Config::default();
        config.logging.log_level = "verbose".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel("verbose".to_string()))
        );
    }
}
