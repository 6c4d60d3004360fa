//! Optional TOML settings file for the server binary.
//!
//! The launcher tokens decide *which* transport runs; this file supplies the
//! values the launcher cannot pass positionally: the fallback port, the
//! per-connection queue depth, the video settings for the direct socket, and
//! the display table the device reports.
//!
//! ```toml
//! default_port = 8886
//! outbound_queue_capacity = 256
//! platform_api_level = 33
//!
//! [video]
//! display_id = 0
//! bit_rate = 8000000
//! encoder_name = "c2.android.avc.encoder"
//! known_encoders = ["c2.android.avc.encoder", "OMX.google.h264.encoder"]
//!
//! [[displays]]
//! display_id = 0
//! size = { width = 1080, height = 1920 }
//! ```
//!
//! Every field has a `#[serde(default = "...")]`, so an empty file, or no file
//! at all, yields [`ServerSettings::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mirror_core::DisplayInfo;

use crate::application::hub::DEFAULT_OUTBOUND_CAPACITY;
use crate::domain::config::DEFAULT_PORT;
use crate::domain::video::VideoSettings;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    /// Port used when the launcher does not pass one.
    #[serde(default = "default_port")]
    pub default_port: u16,
    /// Depth of each connection's outbound queue.
    #[serde(default = "default_queue_capacity")]
    pub outbound_queue_capacity: usize,
    /// Platform API level; selects the display-id query form.
    #[serde(default = "default_api_level")]
    pub platform_api_level: u32,
    #[serde(default)]
    pub video: VideoSettings,
    /// Displays reported by the device.  Empty means a single default
    /// portrait display.
    #[serde(default)]
    pub displays: Vec<DisplayInfo>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_queue_capacity() -> usize {
    DEFAULT_OUTBOUND_CAPACITY
}
fn default_api_level() -> u32 {
    33
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            outbound_queue_capacity: default_queue_capacity(),
            platform_api_level: default_api_level(),
            video: VideoSettings::default(),
            displays: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }
}

/// Loads settings from `path`, or returns the defaults when no path is given.
///
/// An explicitly named file must exist: a missing file is an error here,
/// unlike a first-run config directory.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if the file cannot be read and
/// [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: Option<&Path>) -> Result<ServerSettings, SettingsError> {
    let Some(path) = path else {
        return Ok(ServerSettings::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ServerSettings::from_toml_str(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_settings_use_default_port_and_capacity() {
        let settings = ServerSettings::default();

        assert_eq!(settings.default_port, 8886);
        assert_eq!(settings.outbound_queue_capacity, 256);
        assert!(settings.displays.is_empty());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        // Act
        let settings = ServerSettings::from_toml_str("").expect("empty toml");

        // Assert
        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn test_partial_video_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
default_port = 27183

[video]
display_id = 2
known_encoders = ["c2.android.avc.encoder"]
"#;

        // Act
        let settings = ServerSettings::from_toml_str(toml_str).expect("partial toml");

        // Assert
        assert_eq!(settings.default_port, 27183);
        assert_eq!(settings.video.display_id, 2);
        assert_eq!(settings.video.known_encoders.len(), 1);
        // Unspecified fields keep their defaults
        assert_eq!(settings.video.bit_rate, 8_000_000);
        assert_eq!(settings.outbound_queue_capacity, 256);
    }

    #[test]
    fn test_display_table_is_parsed() {
        let toml_str = r#"
[[displays]]
display_id = 0
size = { width = 1080, height = 2400 }

[[displays]]
display_id = 3
size = { width = 1920, height = 1080 }
rotation = 1
"#;

        let settings = ServerSettings::from_toml_str(toml_str).expect("displays");

        assert_eq!(settings.displays.len(), 2);
        assert_eq!(settings.displays[1].display_id, 3);
        assert_eq!(settings.displays[1].rotation, 1);
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let result = ServerSettings::from_toml_str("[[[ not valid toml");

        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_load_settings_without_path_returns_defaults() {
        let settings = load_settings(None).expect("defaults");

        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn test_load_settings_missing_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/mirror.toml");

        let result = load_settings(Some(&path));

        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_load_settings_reads_file_from_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("mirror_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "outbound_queue_capacity = 8\n").unwrap();

        // Act
        let settings = load_settings(Some(&path)).expect("load");

        // Assert
        assert_eq!(settings.outbound_queue_capacity, 8);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }
}
