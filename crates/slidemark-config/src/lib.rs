use serde::{Deserialize, Serialize};
use slidemark_engine::{EditorOptions, ParseOptions, Theme};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Editor preferences persisted in the user's config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Light or dark code-highlight theme.
    pub theme: Theme,
    /// GFM tables in the preview.
    pub tables: bool,
    /// Render single line breaks as hard breaks.
    pub hard_breaks: bool,
    /// Auto-close `` ` ``, `*`, `_`, and `[` while typing.
    pub autopair: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            tables: true,
            hard_breaks: false,
            autopair: true,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/slidemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Parser options implied by this config.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            tables: self.tables,
            strikethrough: true,
            hard_breaks: self.hard_breaks,
        }
    }

    /// Editor options implied by this config.
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            autopair: self.autopair,
            theme: self.theme,
            parse: self.parse_options(),
            ..EditorOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/slidemark/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            theme: Theme::Dark,
            tables: false,
            hard_breaks: true,
            autopair: false,
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.tables);
        assert!(config.autopair);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "theme = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let test_config = Config {
            theme: Theme::Dark,
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");

        Config::default().save_to_path(&config_file).unwrap();
        assert!(config_file.exists());
    }

    #[test]
    fn test_options_projection() {
        let config = Config {
            hard_breaks: true,
            tables: false,
            autopair: false,
            theme: Theme::Dark,
        };
        let parse = config.parse_options();
        assert!(parse.hard_breaks);
        assert!(!parse.tables);

        let editor = config.editor_options();
        assert!(!editor.autopair);
        assert_eq!(editor.theme, Theme::Dark);
    }
}
