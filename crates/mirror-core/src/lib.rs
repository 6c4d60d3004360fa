//! # mirror-core
//!
//! Shared library for the device-side mirroring server containing the
//! device-to-client message model, the binary frame codec, and the display
//! metadata port.
//!
//! It has zero dependencies on sockets, async runtimes, or platform APIs.
//!
//! # Architecture overview (for beginners)
//!
//! The mirroring server runs on the device whose screen is being mirrored.
//! Besides the video stream, the device sends small discrete events to the
//! connected client: "the clipboard changed", "I applied your clipboard
//! request", "your file push finished".  Every one of those events travels as
//! one compact binary *frame*.
//!
//! This crate (`mirror-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How device events become bytes.  Each frame is a 1-byte
//!   type tag followed by a variant-specific payload.  There is no outer
//!   header and no delimiter: a client reads frames strictly left to right.
//!
//! - **`display`** – A narrow, plain-data view of the device displays
//!   (size, rotation, layer stack) behind a trait, so the rest of the server
//!   never depends on how the platform exposes that information.

pub mod display;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `mirror_core::DeviceMessage` instead of the full module path.
pub use display::{
    DisplayError, DisplayInfo, DisplayManager, DisplayService, Size, StaticDisplayService,
    DEFAULT_DISPLAY,
};
pub use protocol::codec::{decode_device_message, ProtocolError};
pub use protocol::messages::{DeviceMessage, MessageType};
