//! Video settings handed to the direct-socket endpoint.
//!
//! The capture/encode pipeline itself lives outside this crate; these are the
//! values it is started with.

use serde::{Deserialize, Serialize};

use mirror_core::DEFAULT_DISPLAY;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoSettings {
    /// Display to capture.
    #[serde(default = "default_display_id")]
    pub display_id: i32,
    /// Longest side in pixels; `0` keeps the native size.
    #[serde(default)]
    pub max_size: u16,
    /// Encoder bit rate in bits per second.
    #[serde(default = "default_bit_rate")]
    pub bit_rate: u32,
    /// Frame rate cap; `0` means uncapped.
    #[serde(default)]
    pub max_fps: u16,
    /// Explicit encoder name; `None` lets the pipeline pick.
    #[serde(default)]
    pub encoder_name: Option<String>,
    /// Encoder names the pipeline offers on this device.  Empty skips the
    /// encoder name check.
    #[serde(default)]
    pub known_encoders: Vec<String>,
}

fn default_display_id() -> i32 {
    DEFAULT_DISPLAY
}

fn default_bit_rate() -> u32 {
    8_000_000
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            display_id: default_display_id(),
            max_size: 0,
            bit_rate: default_bit_rate(),
            max_fps: 0,
            encoder_name: None,
            known_encoders: Vec::new(),
        }
    }
}
