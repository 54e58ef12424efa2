/// Configuration system for code-segmenter
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, SegmenterError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Watcher configuration
    pub watch: WatchConfig,
}

/// Watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Directory tree to monitor for source changes
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions that qualify for segmentation
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Quiet period after the last event before re-segmenting, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum file size to segment (in bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_file_size() -> usize {
    1_048_576 // 1 MB
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            debounce_ms: default_debounce_ms(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, SegmenterError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file, or fall back to defaults, then apply
    /// environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self, SegmenterError> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                tracing::info!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), SegmenterError> {
        if self.watch.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "watch.extensions".to_string(),
                reason: "must list at least one extension".to_string(),
            }
            .into());
        }

        if self.watch.extensions.iter().any(|ext| ext.is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "watch.extensions".to_string(),
                reason: "extensions must not be empty strings".to_string(),
            }
            .into());
        }

        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "watch.debounce_ms".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.watch.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "watch.max_file_size".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("CODE_SEGMENTER_ROOT") {
            self.watch.root = PathBuf::from(root);
        }

        if let Ok(extensions) = std::env::var("CODE_SEGMENTER_EXTENSIONS") {
            self.watch.extensions = parse_extension_list(&extensions);
        }

        if let Ok(debounce) = std::env::var("CODE_SEGMENTER_DEBOUNCE_MS")
            && let Ok(ms) = debounce.parse()
        {
            self.watch.debounce_ms = ms;
        }

        if let Ok(max_size) = std::env::var("CODE_SEGMENTER_MAX_FILE_SIZE")
            && let Ok(size) = max_size.parse()
        {
            self.watch.max_file_size = size;
        }
    }
}

/// Split a comma-separated extension list, dropping empty entries and any
/// leading dots
fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.watch.extensions, vec!["py".to_string()]);
        assert_eq!(config.watch.debounce_ms, 500);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.watch.debounce_ms, config.watch.debounce_ms);
        assert_eq!(restored.watch.extensions, config.watch.extensions);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[watch]\nroot = \"/src\"\n").unwrap();
        assert_eq!(config.watch.root, PathBuf::from("/src"));
        assert_eq!(config.watch.extensions, vec!["py".to_string()]);
        assert_eq!(config.watch.max_file_size, 1_048_576);
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut config = Config::default();
        config.watch.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_debounce() {
        let mut config = Config::default();
        config.watch.debounce_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_file_size() {
        let mut config = Config::default();
        config.watch.max_file_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(Path::new("/nonexistent/segmenter.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("segmenter.toml");
        std::fs::write(
            &path,
            "[watch]\nroot = \"/projects\"\nextensions = [\"py\", \"pyi\"]\ndebounce_ms = 250\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.watch.root, PathBuf::from("/projects"));
        assert_eq!(
            config.watch.extensions,
            vec!["py".to_string(), "pyi".to_string()]
        );
        assert_eq!(config.watch.debounce_ms, 250);
    }

    #[test]
    fn test_parse_extension_list() {
        assert_eq!(
            parse_extension_list("py, .pyi,,js"),
            vec!["py".to_string(), "pyi".to_string(), "js".to_string()]
        );
        assert!(parse_extension_list("").is_empty());
    }
}
