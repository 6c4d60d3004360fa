//! WebSocket transport: accept loop and per-connection session tasks.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured scope and port, with
//!    `SO_REUSEADDR` set so a restarted server can rebind immediately.
//! 2. Accepting any number of client connections.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Registering the session with the [`EventHub`] and running two
//!    concurrent halves:
//!    - **Writer**: drains the session's queue, one binary frame per
//!      device message, in queue order.
//!    - **Reader**: consumes inbound frames; they are logged and otherwise
//!      ignored at this layer.
//! 5. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Scalability
//!
//! Each session runs in its own Tokio task, so one slow client never blocks
//! another.  A client that cannot keep up is dropped by the hub when its queue
//! fills.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::application::hub::EventHub;
use crate::domain::config::SessionConfig;

/// Listen backlog for the WebSocket socket.
const LISTEN_BACKLOG: u32 = 1024;

/// How often the accept loop re-checks the `running` flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// A bound, listening WebSocket endpoint.
pub struct WsListener {
    listener: TcpListener,
    config: Arc<SessionConfig>,
}

impl WsListener {
    /// Binds the listener for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be created or bound (e.g. the
    /// port is already in use).
    pub fn bind(config: Arc<SessionConfig>) -> anyhow::Result<Self> {
        let addr = config.bind_addr();
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .context("failed to create WebSocket socket")?;

        socket
            .set_reuseaddr(true)
            .context("failed to set SO_REUSEADDR")?;
        socket
            .bind(addr)
            .with_context(|| format!("failed to bind WebSocket listener on {addr}"))?;
        let listener = socket
            .listen(LISTEN_BACKLOG)
            .with_context(|| format!("failed to listen on {addr}"))?;

        Ok(Self { listener, config })
    }

    /// The address actually bound (resolves port `0`).
    ///
    /// # Errors
    ///
    /// Propagates the OS error from `getsockname`.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read WebSocket listener address")
    }

    /// Runs the accept loop until `running` is set to `false`.
    ///
    /// # Errors
    ///
    /// Only setup failures are returned; per-connection failures are logged
    /// and end that connection alone.
    pub async fn run(self, hub: Arc<EventHub>, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        info!(
            "WebSocket server listening on {} (log level {})",
            self.local_addr()?,
            self.config.log_level
        );

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            match timeout(ACCEPT_POLL, self.listener.accept()).await {
                Ok(Ok((stream, peer_addr))) => {
                    info!("new WebSocket connection from {peer_addr}");
                    let hub = Arc::clone(&hub);
                    tokio::spawn(async move {
                        handle_client_session(stream, peer_addr, hub).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient (e.g. EMFILE); keep serving the others.
                    error!("accept error: {e}");
                }
                Err(_) => {}
            }
        }

        Ok(())
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_client_session(raw_stream: TcpStream, peer_addr: SocketAddr, hub: Arc<EventHub>) {
    match run_session(raw_stream, peer_addr, hub).await {
        Ok(()) => info!("session {peer_addr} closed normally"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs one WebSocket session from handshake to close.
///
/// The session is registered with the hub only after the handshake succeeds,
/// and is always unregistered before returning.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    hub: Arc<EventHub>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (session_id, mut outbound) = hub.register().await;
    info!("session {session_id}: WebSocket established with {peer_addr}");

    // ── Writer: hub queue → client ────────────────────────────────────────────
    let writer = async {
        while let Some(msg) = outbound.recv().await {
            let tag = msg.message_type();
            if let Err(e) = ws_tx.send(WsMessage::Binary(msg.to_bytes())).await {
                debug!("session {session_id}: send failed ({e}); client gone");
                return;
            }
            debug!("session {session_id}: sent {tag:?}");
        }
        debug!("session {session_id}: outbound queue closed");
    };

    // ── Reader: client → (ignored) ────────────────────────────────────────────
    let reader = async {
        loop {
            match ws_rx.next().await {
                Some(Ok(WsMessage::Close(_))) | None => {
                    debug!("session {session_id}: client closed the WebSocket");
                    break;
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    debug!(
                        "session {session_id}: inbound binary frame ({} bytes, ignored)",
                        data.len()
                    );
                }
                Some(Ok(WsMessage::Text(text))) => {
                    debug!(
                        "session {session_id}: inbound text frame ({} bytes, ignored)",
                        text.len()
                    );
                }
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                    debug!("session {session_id}: WebSocket closed");
                    break;
                }
                Some(Err(e)) => {
                    warn!("session {session_id}: WebSocket error: {e}");
                    break;
                }
            }
        }
    };

    // Whichever half finishes first ends the session.
    tokio::select! {
        _ = writer => {}
        _ = reader => {}
    }

    hub.unregister(session_id).await;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
