//! Display metadata port.
//!
//! The platform exposes display information (size, rotation, layer stack)
//! through services whose method signatures change between OS releases.  The
//! server only ever needs the resulting plain data, so this module defines:
//!
//! - [`DisplayInfo`] – a plain, versioned snapshot of one display.
//! - [`DisplayService`] – the narrow capability trait a platform adapter
//!   implements.  Each historical signature of "list display ids" is its own
//!   trait method; adapters return [`DisplayError::Unsupported`] for the forms
//!   the running platform does not offer.
//! - [`DisplayManager`] – picks the right signature for the platform API level
//!   and degrades to the default display when the capability is missing.
//!
//! A [`StaticDisplayService`] backed by a fixed list is always compiled; it is
//! used for headless runs and in tests.

mod fixed;

pub use fixed::StaticDisplayService;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Id of the built-in display, always present on a device.
pub const DEFAULT_DISPLAY: i32 = 0;

/// First platform API level whose "list display ids" call takes an
/// `include_disabled` flag.
pub const FILTERED_DISPLAY_IDS_API_LEVEL: u32 = 33;

/// Error type for display metadata lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayError {
    /// The platform does not offer the requested call in this form.
    #[error("display capability not available: {0}")]
    Unsupported(String),

    /// The platform call exists but failed.
    #[error("display service error: {0}")]
    Platform(String),
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Read-only snapshot of one display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub display_id: i32,
    /// Logical size; already accounts for `rotation`.
    pub size: Size,
    /// Rotation in quarter turns (0–3).
    #[serde(default)]
    pub rotation: u8,
    #[serde(default)]
    pub layer_stack: i32,
    #[serde(default)]
    pub flags: u32,
}

/// Platform adapter for display metadata.
///
/// Implementations must not panic; a call the platform cannot serve returns
/// [`DisplayError::Unsupported`].
#[cfg_attr(test, mockall::automock)]
pub trait DisplayService: Send + Sync {
    /// Returns the snapshot for `display_id`, or `None` if no such display.
    fn display_info(&self, display_id: i32) -> Result<Option<DisplayInfo>, DisplayError>;

    /// Lists display ids using the pre-33 signature (no arguments).
    fn display_ids(&self) -> Result<Vec<i32>, DisplayError>;

    /// Lists display ids using the 33+ signature.
    fn display_ids_filtered(&self, include_disabled: bool) -> Result<Vec<i32>, DisplayError>;
}

/// Version-aware front end over a [`DisplayService`].
pub struct DisplayManager<S> {
    service: S,
    api_level: u32,
}

impl<S: DisplayService> DisplayManager<S> {
    pub fn new(service: S, api_level: u32) -> Self {
        Self { service, api_level }
    }

    /// Returns the snapshot for `display_id`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Propagates any [`DisplayError`] from the service.
    pub fn display_info(&self, display_id: i32) -> Result<Option<DisplayInfo>, DisplayError> {
        self.service.display_info(display_id)
    }

    /// Returns the ordered list of available display ids.
    ///
    /// Uses the call signature matching the platform API level.  If the
    /// platform lacks that call, logs a warning and returns
    /// `[DEFAULT_DISPLAY]` instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Platform`] if the call exists but fails.
    pub fn display_ids(&self) -> Result<Vec<i32>, DisplayError> {
        let ids = if self.api_level < FILTERED_DISPLAY_IDS_API_LEVEL {
            self.service.display_ids()
        } else {
            self.service.display_ids_filtered(false)
        };
        match ids {
            Ok(ids) => Ok(ids),
            Err(DisplayError::Unsupported(detail)) => {
                warn!("failed to get display ids ({detail}); falling back to display {DEFAULT_DISPLAY}");
                Ok(vec![DEFAULT_DISPLAY])
            }
            Err(e) => Err(e),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
