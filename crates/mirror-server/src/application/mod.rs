//! Application layer for mirror-server.
//!
//! Knows *what* happens at startup and while a session runs, but delegates
//! *how* bytes reach a socket to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Validating the launcher's handshake tokens (`bootstrap`)
//! - Checking video settings against the device displays (`capture`)
//! - Fanning device messages out to connections in order (`hub`)
//! - Supervising the transport run loop and printing fix hints (`supervisor`)

pub mod bootstrap;
pub mod capture;
pub mod hub;
pub mod supervisor;

pub use bootstrap::{parse_handshake, BootstrapError, SERVER_VERSION};
pub use capture::check_video_settings;
pub use hub::EventHub;
pub use supervisor::{suggest_fix, supervise, SessionFault};
