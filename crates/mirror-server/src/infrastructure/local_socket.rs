//! Direct-socket transport: a single loopback connection carrying raw frames.
//!
//! This is the legacy path used when the launcher does not ask for the
//! WebSocket server.  The client lives on the same host (typically reached
//! through a port forward), so the endpoint:
//!
//! - binds loopback only,
//! - accepts exactly one connection, and
//! - writes device frames back to back with no extra framing.
//!
//! The video settings and resolved display are carried for the capture
//! pipeline, which is started by an external collaborator.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use mirror_core::protocol::messages::{MAX_EVENT_SIZE, MESSAGE_MAX_SIZE};
use mirror_core::{DeviceMessage, DisplayInfo};

use crate::application::hub::EventHub;
use crate::domain::config::SessionConfig;
use crate::domain::video::VideoSettings;

const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// A bound, not yet connected, direct-socket endpoint.
pub struct LocalSocketEndpoint {
    listener: TcpListener,
    video: VideoSettings,
    display: DisplayInfo,
}

impl LocalSocketEndpoint {
    /// Binds the endpoint on loopback at `config.port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound.
    pub async fn bind(
        config: &SessionConfig,
        video: VideoSettings,
        display: DisplayInfo,
    ) -> anyhow::Result<Self> {
        let addr = SocketAddr::new(std::net::Ipv4Addr::LOCALHOST.into(), config.port);
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind direct socket on {addr}"))?;
        Ok(Self {
            listener,
            video,
            display,
        })
    }

    /// The address actually bound (resolves port `0`).
    ///
    /// # Errors
    ///
    /// Propagates the OS error from `getsockname`.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read direct socket address")
    }

    /// Waits for the single client, then streams device frames to it until
    /// either side closes or `running` is cleared.
    ///
    /// Returns `Ok(())` without serving anyone if `running` is cleared before
    /// a client connects.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting fails or a frame cannot be written.
    pub async fn run(self, hub: Arc<EventHub>, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        info!(
            "direct socket listening on {} (display {} {}x{}, bit rate {})",
            self.local_addr()?,
            self.display.display_id,
            self.display.size.width,
            self.display.size.height,
            self.video.bit_rate
        );

        let (stream, peer_addr) = loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set before a client connected");
                return Ok(());
            }
            match timeout(ACCEPT_POLL, self.listener.accept()).await {
                Ok(accepted) => break accepted.context("direct socket accept failed")?,
                Err(_) => continue,
            }
        };
        // One client only; later connection attempts are refused.
        drop(self.listener);

        let (session_id, outbound) = hub.register().await;
        info!("session {session_id}: direct socket connected from {peer_addr}");

        let (read_half, write_half) = stream.into_split();
        let result = tokio::select! {
            r = write_frames(session_id, write_half, outbound) => r,
            r = discard_inbound(session_id, read_half) => r,
            () = wait_for_shutdown(&running) => {
                info!("session {session_id}: shutdown flag set; closing direct socket");
                Ok(())
            }
        };

        hub.unregister(session_id).await;
        result
    }
}

/// Resolves once `running` is cleared, checking every [`ACCEPT_POLL`].
async fn wait_for_shutdown(running: &AtomicBool) {
    let mut ticker = interval(ACCEPT_POLL);
    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
    }
}

/// Writes every queued message into a reused scratch buffer and then onto
/// the socket, preserving queue order.
async fn write_frames(
    session_id: Uuid,
    mut socket: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<Arc<DeviceMessage>>,
) -> anyhow::Result<()> {
    let mut scratch = vec![0u8; MESSAGE_MAX_SIZE];
    while let Some(msg) = outbound.recv().await {
        let len = msg.write_into(&mut scratch, 0)?;
        socket
            .write_all(&scratch[..len])
            .await
            .with_context(|| format!("session {session_id}: frame write failed"))?;
        debug!("session {session_id}: sent {:?} ({len} bytes)", msg.message_type());
    }
    debug!("session {session_id}: outbound queue closed");
    Ok(())
}

/// Drains client bytes until EOF.  Control messages are decoded by another
/// component; this endpoint only needs to notice the disconnect.
async fn discard_inbound(session_id: Uuid, mut socket: OwnedReadHalf) -> anyhow::Result<()> {
    let mut buf = [0u8; MAX_EVENT_SIZE];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) => {
                info!("session {session_id}: client disconnected");
                return Ok(());
            }
            Ok(n) => debug!("session {session_id}: {n} inbound bytes (ignored)"),
            Err(e) => {
                warn!("session {session_id}: read error: {e}");
                bail!("session {session_id}: read failed: {e}");
            }
        }
    }
}
