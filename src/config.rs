use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Widget and data source settings, read from YAML. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub endpoint: String,
    pub debounce_ms: u64,
    pub placeholder: String,
    /// `0` shows every row.
    pub max_visible: usize,
    pub timeout_ms: u64,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: "users".to_string(),
            debounce_ms: 500,
            placeholder: "Search type here...".to_string(),
            max_visible: 8,
            timeout_ms: 10_000,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(debounce_ms) = overrides.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if let Some(log_file) = overrides.log_file {
            self.log_file = Some(log_file);
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn max_visible_rows(&self) -> Option<usize> {
        (self.max_visible > 0).then_some(self.max_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, DEFAULT_BASE_URL, Overrides};
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "debounce_ms: 250\nmax_visible: 0").expect("write config");

        let config = Config::load(file.path()).expect("config should load");
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.max_visible_rows(), None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.endpoint, "users");
        assert_eq!(config.placeholder, "Search type here...");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let config = Config::load(file.path()).expect("empty config should load");
        assert_eq!(config, Config::default());
        assert_eq!(config.max_visible_rows(), Some(8));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.yaml");
        let err = Config::load(&path).expect_err("missing file should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "debounce: 10").expect("write config");
        let err = Config::load(file.path()).expect_err("unknown key should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn no_path_means_defaults() {
        let config = Config::load_or_default(None).expect("defaults");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = Config::from_yaml_str("base_url: http://file\nlog_level: warn\n")
            .expect("yaml")
            .with_overrides(Overrides {
                base_url: Some("http://cli".to_string()),
                debounce_ms: Some(5),
                log_file: Some(PathBuf::from("typeahead.log")),
                log_level: None,
            });
        assert_eq!(config.base_url, "http://cli");
        assert_eq!(config.debounce_ms, 5);
        assert_eq!(config.log_file, Some(PathBuf::from("typeahead.log")));
        assert_eq!(config.log_level, "warn");
    }
}
