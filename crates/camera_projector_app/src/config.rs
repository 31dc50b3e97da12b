// SPDX-License-Identifier: MIT OR Apache-2.0
//! Projector configuration.
//!
//! Stored as RON. A missing file yields the defaults.

use camera_projector_graph::graphs::camera_project::description::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "camera_projector.ron";

/// Projector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Horizontal distance between node columns
    pub column_spacing: f32,
    /// Aspect ratio used when the render settings are degenerate
    pub fallback_aspect: f32,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            column_spacing: 250.0,
            fallback_aspect: 1.0,
            log_filter: "camera_projector=info".to_string(),
        }
    }
}

impl ProjectorConfig {
    /// Load configuration from a file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ProjectorConfig = ron::from_str(&content)?;
        if !(config.fallback_aspect.is_finite() && config.fallback_aspect > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fallback_aspect must be positive, got {}",
                config.fallback_aspect
            )));
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Node layout derived from this configuration
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            column_spacing: self.column_spacing,
        }
    }
}

/// Error loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File access failed
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid RON
    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Config serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectorConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ProjectorConfig::default());
        assert_eq!(config.layout().column_spacing, 250.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = ProjectorConfig {
            column_spacing: 300.0,
            fallback_aspect: 1.5,
            log_filter: "camera_projector=debug".to_string(),
        };

        config.save(&path).unwrap();
        assert_eq!(ProjectorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "(column_spacing: 100.0)").unwrap();

        let config = ProjectorConfig::load(&path).unwrap();
        assert_eq!(config.column_spacing, 100.0);
        assert_eq!(config.fallback_aspect, 1.0);
    }

    #[test]
    fn test_bad_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "(column_spacing: ").unwrap();
        assert!(matches!(ProjectorConfig::load(&path), Err(ConfigError::Parse(_))));

        std::fs::write(&path, "(fallback_aspect: 0.0)").unwrap();
        assert!(matches!(ProjectorConfig::load(&path), Err(ConfigError::Invalid(_))));
    }
}
