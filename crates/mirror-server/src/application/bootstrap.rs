//! Startup handshake: launcher tokens → [`SessionConfig`].
//!
//! The launcher passes an ordered list of string tokens:
//!
//! | Position | Meaning                                   | Required |
//! |----------|-------------------------------------------|----------|
//! | `[0]`    | protocol version, exact match             | yes      |
//! | `[1]`    | transport, `web` (any case) or legacy     | no       |
//! | `[2]`    | log level name (web only)                 | no       |
//! | `[3]`    | port number (web only)                    | no       |
//! | `[4]`    | listen on all interfaces `true`/`false`   | no       |
//!
//! Parsing is linear and never retried.  Any failure aborts startup before a
//! single socket is bound, and the error names the failing position and value.

use thiserror::Error;

use crate::domain::config::{BindScope, LogLevel, SessionConfig};

/// The version string a client must present.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const VERSION_TOKEN: usize = 0;
pub const TRANSPORT_TOKEN: usize = 1;
pub const LOG_LEVEL_TOKEN: usize = 2;
pub const PORT_TOKEN: usize = 3;
pub const LISTEN_ALL_TOKEN: usize = 4;

/// Transport selector value choosing the WebSocket listener.
const WEB_TRANSPORT: &str = "web";

/// Fatal startup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("missing client version (token [0])")]
    MissingVersion,

    #[error("the server version ({server}) does not match the client ({client})")]
    VersionMismatch { server: String, client: String },

    #[error("token [{position}]: unknown log level '{value}' (expected one of: verbose, debug, info, warn, error)")]
    BadLogLevel { position: usize, value: String },

    #[error("token [{position}]: invalid port number '{value}': {reason}")]
    BadPort {
        position: usize,
        value: String,
        reason: String,
    },

    #[error("token [{position}]: invalid listen-on-all-interfaces flag '{value}' (expected true or false)")]
    BadFlag { position: usize, value: String },
}

/// Validates the handshake tokens and builds the session configuration.
///
/// `expected_version` is normally [`SERVER_VERSION`]; `default_port` applies
/// when no port token is given.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered, in token order.
///
/// # Example
///
/// ```rust
/// use mirror_server::application::bootstrap::parse_handshake;
/// use mirror_server::domain::{BindScope, TransportKind};
///
/// let cfg = parse_handshake(&["1.2.0", "WEB", "debug", "9000", "false"], "1.2.0", 8886).unwrap();
/// assert_eq!(cfg.transport, TransportKind::WebSocket);
/// assert_eq!(cfg.port, 9000);
/// assert_eq!(cfg.bind_scope, BindScope::Loopback);
/// ```
pub fn parse_handshake<T: AsRef<str>>(
    tokens: &[T],
    expected_version: &str,
    default_port: u16,
) -> Result<SessionConfig, BootstrapError> {
    let token = |position: usize| tokens.get(position).map(|t| t.as_ref());

    let client_version = token(VERSION_TOKEN).ok_or(BootstrapError::MissingVersion)?;
    if client_version != expected_version {
        return Err(BootstrapError::VersionMismatch {
            server: expected_version.to_string(),
            client: client_version.to_string(),
        });
    }

    match token(TRANSPORT_TOKEN) {
        Some(selector) if selector.eq_ignore_ascii_case(WEB_TRANSPORT) => {}
        // Legacy options are not parsed; the direct socket runs on defaults.
        _ => return Ok(SessionConfig::direct_socket(default_port)),
    }

    let mut config = SessionConfig::websocket(default_port);

    if let Some(value) = token(LOG_LEVEL_TOKEN) {
        config.log_level = value
            .parse::<LogLevel>()
            .map_err(|()| BootstrapError::BadLogLevel {
                position: LOG_LEVEL_TOKEN,
                value: value.to_string(),
            })?;
    }

    if let Some(value) = token(PORT_TOKEN) {
        config.port = value.parse::<u16>().map_err(|e| BootstrapError::BadPort {
            position: PORT_TOKEN,
            value: value.to_string(),
            reason: e.to_string(),
        })?;
    }

    if let Some(value) = token(LISTEN_ALL_TOKEN) {
        config.bind_scope = if value.eq_ignore_ascii_case("true") {
            BindScope::AllInterfaces
        } else if value.eq_ignore_ascii_case("false") {
            BindScope::Loopback
        } else {
            return Err(BootstrapError::BadFlag {
                position: LISTEN_ALL_TOKEN,
                value: value.to_string(),
            });
        };
    }

    Ok(config)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{TransportKind, DEFAULT_PORT};

    const V: &str = "1.19-ws6";

    fn parse(tokens: &[&str]) -> Result<SessionConfig, BootstrapError> {
        parse_handshake(tokens, V, DEFAULT_PORT)
    }

    // ── Version ──────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_token_list_is_missing_version() {
        assert_eq!(parse(&[]), Err(BootstrapError::MissingVersion));
    }

    #[test]
    fn test_version_mismatch_reports_both_versions() {
        // Act
        let err = parse(&["1.18", "web"]).unwrap_err();

        // Assert
        assert_eq!(
            err,
            BootstrapError::VersionMismatch {
                server: V.to_string(),
                client: "1.18".to_string()
            }
        );
        let message = err.to_string();
        assert!(message.contains(V));
        assert!(message.contains("1.18"));
    }

    #[test]
    fn test_version_must_match_exactly() {
        // Case and surrounding whitespace both count.
        assert!(parse(&["1.19-WS6"]).is_err());
        assert!(parse(&[" 1.19-ws6"]).is_err());
    }

    #[test]
    fn test_version_is_checked_before_transport_options() {
        // A bad log level must not hide the version mismatch.
        assert!(matches!(
            parse(&["0.0", "web", "loud"]),
            Err(BootstrapError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_server_version_comes_from_package() {
        assert_eq!(SERVER_VERSION, env!("CARGO_PKG_VERSION"));
    }

    // ── Transport selection ──────────────────────────────────────────────────

    #[test]
    fn test_web_selector_is_case_insensitive() {
        for selector in ["web", "WEB", "Web", "wEb"] {
            let cfg = parse(&[V, selector]).expect("valid");
            assert_eq!(cfg.transport, TransportKind::WebSocket, "{selector}");
        }
    }

    #[test]
    fn test_other_selectors_fall_back_to_direct_socket() {
        for selector in ["", "tcp", "webs", "legacy", "websocket"] {
            let cfg = parse(&[V, selector]).expect("valid");
            assert_eq!(cfg.transport, TransportKind::DirectSocket, "{selector}");
        }
    }

    #[test]
    fn test_missing_selector_falls_back_to_direct_socket() {
        let cfg = parse(&[V]).expect("valid");
        assert_eq!(cfg, SessionConfig::direct_socket(DEFAULT_PORT));
    }

    #[test]
    fn test_legacy_branch_ignores_trailing_tokens() {
        let cfg = parse(&[V, "legacy", "not-a-level", "not-a-port"]).expect("valid");
        assert_eq!(cfg.transport, TransportKind::DirectSocket);
    }

    // ── WebSocket options ────────────────────────────────────────────────────

    #[test]
    fn test_web_defaults_when_no_options_given() {
        let cfg = parse(&[V, "web"]).expect("valid");
        assert_eq!(cfg, SessionConfig::websocket(DEFAULT_PORT));
    }

    #[test]
    fn test_web_full_option_set() {
        // Act
        let cfg = parse(&[V, "web", "VERBOSE", "8080", "false"]).expect("valid");

        // Assert
        assert_eq!(cfg.log_level, LogLevel::Verbose);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bind_scope, BindScope::Loopback);
    }

    #[test]
    fn test_web_options_are_positional_and_independently_optional() {
        let cfg = parse(&[V, "web", "error"]).expect("valid");
        assert_eq!(cfg.log_level, LogLevel::Error);
        assert_eq!(cfg.port, DEFAULT_PORT);

        let cfg = parse(&[V, "web", "info", "9001"]).expect("valid");
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.bind_scope, BindScope::AllInterfaces);
    }

    #[test]
    fn test_listen_flag_accepts_true_in_any_case() {
        let cfg = parse(&[V, "web", "info", "9001", "TRUE"]).expect("valid");
        assert_eq!(cfg.bind_scope, BindScope::AllInterfaces);
    }

    #[test]
    fn test_bad_log_level_names_position_and_value() {
        let err = parse(&[V, "web", "loud"]).unwrap_err();
        assert_eq!(
            err,
            BootstrapError::BadLogLevel {
                position: 2,
                value: "loud".to_string()
            }
        );
        assert!(err.to_string().contains("[2]"));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        for value in ["abc", "-1", "65536", "80.5", ""] {
            let err = parse(&[V, "web", "info", value]).unwrap_err();
            assert!(
                matches!(err, BootstrapError::BadPort { position: 3, .. }),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn test_port_zero_is_accepted() {
        let cfg = parse(&[V, "web", "info", "0"]).expect("valid");
        assert_eq!(cfg.port, 0);
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        let err = parse(&[V, "web", "info", "8886", "yes"]).unwrap_err();
        assert_eq!(
            err,
            BootstrapError::BadFlag {
                position: 4,
                value: "yes".to_string()
            }
        );
    }

    #[test]
    fn test_owned_string_tokens_are_accepted() {
        let tokens: Vec<String> = vec![V.to_string(), "web".to_string()];
        assert!(parse_handshake(&tokens, V, 1234).is_ok());
    }
}
