//! Infrastructure layer for mirror-server.
//!
//! Everything that touches a socket or the file system lives here.
//!
//! # Responsibilities
//!
//! - Loading the optional TOML settings file
//! - Binding the WebSocket listener (`SO_REUSEADDR`) and running its sessions
//! - Binding the loopback direct socket and serving its single client
//! - Dispatching to exactly one of the two transports
//!
//! # What does NOT belong here?
//!
//! - Handshake token validation (that is the application layer)
//! - Frame layout (that is `mirror-core`)

pub mod dispatcher;
pub mod local_socket;
pub mod settings;
pub mod ws_server;

pub use dispatcher::run_transport;
pub use local_socket::LocalSocketEndpoint;
pub use settings::{load_settings, ServerSettings, SettingsError};
pub use ws_server::WsListener;
