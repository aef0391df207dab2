//! Editor preferences — loaded from ~/.beatmapper/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::time::SnapIncrement;
use crate::visible::GraphicsLevel;

/// Errors reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Persistent editor preferences. Every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum gap between accepted scroll steps.
    pub scroll_throttle_ms: u64,
    /// Frames further apart than this never trigger the window lock.
    pub window_lock_liveness_ms: u64,
    pub snap: SnapIncrement,
    /// Index into the beat depth table.
    pub zoom: usize,
    /// Index into the events-view window table.
    pub event_zoom: usize,
    pub graphics: GraphicsLevel,
    pub playback_rate: f64,
    pub volume: f32,
    pub window_lock: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: 50,
            window_lock_liveness_ms: 100,
            snap: SnapIncrement::default(),
            zoom: 2,
            event_zoom: 1,
            graphics: GraphicsLevel::default(),
            playback_rate: 1.0,
            volume: 1.0,
            window_lock: false,
        }
    }
}

impl EditorConfig {
    /// Default path for the config file.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".beatmapper");
        path.push("config.yaml");
        path
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, logging and falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(%err, "using default config");
                Self::default()
            }
        }
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.scroll_throttle_ms, 50);
        assert_eq!(config.window_lock_liveness_ms, 100);
        assert_eq!(config.snap, SnapIncrement::Half);
        assert_eq!(config.graphics, GraphicsLevel::High);
        assert!(!config.window_lock);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
snap: "1/16"
graphics: low
window_lock: true
"#;
        let config: EditorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.snap, SnapIncrement::Sixteenth);
        assert_eq!(config.graphics, GraphicsLevel::Low);
        assert!(config.window_lock);
        assert_eq!(config.scroll_throttle_ms, 50);
    }

    #[test]
    fn unknown_snap_is_rejected() {
        let result: Result<EditorConfig, _> = serde_yaml::from_str("snap: \"1/5\"");
        assert!(result.is_err());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let config = EditorConfig {
            snap: SnapIncrement::Third,
            zoom: 4,
            volume: 0.5,
            ..EditorConfig::default()
        };
        config.save(file.path()).unwrap();
        assert_eq!(EditorConfig::load(file.path()).unwrap(), config);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        EditorConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn invalid_yaml_falls_back() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "zoom: [not, a, number]").unwrap();
        assert!(matches!(
            EditorConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(EditorConfig::load_or_default(file.path()), EditorConfig::default());
    }
}
