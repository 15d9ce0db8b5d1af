//! Generator configuration.
//!
//! ```toml
//! [format]
//! indent_size = 4
//! indent_with_tabs = false
//! max_blank_lines = 1
//! ```
//!
//! Every key is optional. The CLI reads TOML files; the browser host
//! passes the same structure as JSON.

use std::path::{Path, PathBuf};

use avrblocks_codegen::FormatOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest indentation accepted.
pub const MAX_INDENT_SIZE: usize = 16;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("indent_size must be between 1 and {MAX_INDENT_SIZE}, got {0}")]
    IndentSize(usize),
}

/// Settings for a generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub format: FormatOptions,
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.format.indent_size;
        if !self.format.indent_with_tabs && !(1..=MAX_INDENT_SIZE).contains(&size) {
            return Err(ConfigError::IndentSize(size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.format.indent_size, 4);
        assert!(!config.format.indent_with_tabs);
        assert_eq!(config.format.max_blank_lines, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_documents_are_default() {
        assert_eq!(
            GeneratorConfig::from_toml_str("").unwrap(),
            GeneratorConfig::default()
        );
        assert_eq!(
            GeneratorConfig::from_json_str("{}").unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = GeneratorConfig::from_toml_str("[format]\nindent_with_tabs = true\n").unwrap();
        assert!(config.format.indent_with_tabs);
        assert_eq!(config.format.indent_size, 4);
    }

    #[test]
    fn test_json_options() {
        let config =
            GeneratorConfig::from_json_str(r#"{ "format": { "indent_size": 2, "max_blank_lines": 0 } }"#)
                .unwrap();
        assert_eq!(config.format.indent_size, 2);
        assert_eq!(config.format.max_blank_lines, 0);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("[format]\nindent_size = 0\n"),
            Err(ConfigError::IndentSize(0))
        ));
        // Width is irrelevant with tabs.
        assert!(GeneratorConfig::from_toml_str("[format]\nindent_size = 0\nindent_with_tabs = true\n").is_ok());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("[format\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/avrblocks.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/avrblocks.toml"));
    }
}
