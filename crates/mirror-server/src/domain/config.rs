//! Session configuration types.
//!
//! [`SessionConfig`] is produced exactly once, by the handshake bootstrap,
//! and is immutable afterwards.  Wrap it in an `Arc` to share it with every
//! connection task; no locking is needed because nothing ever writes to it.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

/// Port used when the launcher does not pass one.
pub const DEFAULT_PORT: u16 = 8886;

/// Which listener the process runs.  Exactly one per process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Single client over a raw local socket.
    DirectSocket,
    /// Multi-client WebSocket listener.
    WebSocket,
}

/// Which interfaces the listener binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindScope {
    Loopback,
    AllInterfaces,
}

impl BindScope {
    /// The unspecified or loopback IPv4 address for this scope.
    pub fn ip(self) -> IpAddr {
        match self {
            BindScope::Loopback => IpAddr::V4(Ipv4Addr::LOCALHOST),
            BindScope::AllInterfaces => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }
}

/// Log verbosity selected by the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Every accepted level name, most verbose first.
    pub const NAMES: [&'static str; 5] = ["verbose", "debug", "info", "warn", "error"];

    /// Maps the level onto a `tracing` filter (`verbose` is `TRACE`).
    pub fn as_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Verbose => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    /// Parses a level name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, ()> {
        match s.to_ascii_lowercase().as_str() {
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Validated startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub transport: TransportKind,
    pub log_level: LogLevel,
    pub port: u16,
    pub bind_scope: BindScope,
}

impl SessionConfig {
    /// Configuration of the legacy direct-socket branch.
    ///
    /// The direct socket only ever serves a client on the same host, so it is
    /// always bound to loopback.
    pub fn direct_socket(port: u16) -> Self {
        Self {
            transport: TransportKind::DirectSocket,
            log_level: LogLevel::Info,
            port,
            bind_scope: BindScope::Loopback,
        }
    }

    /// Configuration of the WebSocket branch before optional tokens apply.
    pub fn websocket(port: u16) -> Self {
        Self {
            transport: TransportKind::WebSocket,
            log_level: LogLevel::Info,
            port,
            bind_scope: BindScope::AllInterfaces,
        }
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_scope.ip(), self.port)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse_ignores_case() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("Warn".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("verbose".parse::<LogLevel>(), Ok(LogLevel::Verbose));
    }

    #[test]
    fn test_log_level_parse_rejects_unknown_name() {
        assert_eq!("trace".parse::<LogLevel>(), Err(()));
        assert_eq!("".parse::<LogLevel>(), Err(()));
    }

    #[test]
    fn test_every_listed_name_parses_and_displays_back() {
        for name in LogLevel::NAMES {
            let level: LogLevel = name.parse().expect("listed name must parse");
            assert_eq!(level.to_string(), name);
        }
    }

    #[test]
    fn test_verbose_maps_to_trace_filter() {
        assert_eq!(LogLevel::Verbose.as_level_filter(), LevelFilter::TRACE);
        assert_eq!(LogLevel::Error.as_level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn test_direct_socket_binds_loopback() {
        // Arrange / Act
        let cfg = SessionConfig::direct_socket(27183);

        // Assert
        assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:27183");
    }

    #[test]
    fn test_websocket_defaults_to_all_interfaces() {
        let cfg = SessionConfig::websocket(DEFAULT_PORT);
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8886");
        assert_eq!(cfg.log_level, LogLevel::Info);
    }
}
