//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings, defaults filled in
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(Path::new(".")),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        tracing::debug!(path = ?config_path, "loader configuration resolved");

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load the first configuration file found under `dir`, or defaults
    pub fn discover(dir: &Path) -> Result<Self> {
        let config_path = find_config_file(dir);
        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };
        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "builddesc.toml",
        ".builddesc.toml",
        ".config/builddesc.toml",
    ];

    candidates
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorCode::ConfigError,
            format!("Failed to read config file {}: {}", path.display(), e),
        )
        .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path.display(), e),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.sdk.min_floor, 21);
        assert_eq!(config.schema.signing.implicit_configs, vec!["debug"]);
    }

    #[test]
    fn test_config_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/builddesc.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [flutter]
            compile_sdk_version = 34
            "#,
        )
        .unwrap();
        assert_eq!(config.schema.flutter.compile_sdk_version, 34);
        assert_eq!(config.schema.flutter.target_sdk_version, 35);
        assert!(config.schema.validation.warn_unknown_keys);
    }

    #[test]
    fn test_config_discover_in_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".builddesc.toml"),
            "[sdk]\nmin_floor = 23\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.schema.sdk.min_floor, 23);
        assert!(config.path.is_some());
    }

    #[test]
    fn test_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("builddesc.toml");
        std::fs::write(&path, "[sdk\nmin_floor = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }
}
