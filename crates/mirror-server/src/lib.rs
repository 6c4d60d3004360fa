//! mirror-server library crate.
//!
//! The device-side endpoint of a screen-mirroring session.  A launcher starts
//! the binary with a few positional tokens; the server validates them, picks a
//! transport, and streams device messages (clipboard text, clipboard acks,
//! push results) to the connected client(s) as binary frames.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! launcher tokens ──► application::bootstrap ──► SessionConfig
//!                                                    │
//!                         infrastructure::dispatcher ┤
//!                       ┌────────────────────────────┴──────────────┐
//!                  local_socket (1 client, loopback)     ws_server (N clients)
//!                       └──────────── EventHub queues ──────────────┘
//!                                         ▲
//!                            producers: DeviceEvent
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `mirror-core`; the hub uses tokio
//!   channels but never a socket.
//! - `infrastructure` depends on all other layers plus `tokio` and
//!   `tokio-tungstenite`.

/// Domain layer: session configuration, video settings, device events.
pub mod domain;

/// Application layer: handshake parsing, event fan-out, supervision.
pub mod application;

/// Infrastructure layer: settings file, listeners, transport dispatch.
pub mod infrastructure;
