//! Domain layer for mirror-server.
//!
//! Pure types with no I/O: the validated session configuration, the video
//! settings, and the logical device events that become wire messages.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - File I/O or environment variable reading

pub mod config;
pub mod events;
pub mod video;

pub use config::{BindScope, LogLevel, SessionConfig, TransportKind, DEFAULT_PORT};
pub use events::{produce, DeviceEvent};
pub use video::VideoSettings;
