//! Binary codec for device-to-client frames.
//!
//! Wire format:
//! ```text
//! frame := tag:u8 payload
//! tag=0   (Clipboard):     len:u32be text:len bytes (UTF-8)
//! tag=1   (AckClipboard):  sequence:i64be
//! tag=101 (PushResponse):  id:i16be result:u8
//! ```
//! Frames are written back to back with no delimiter and no outer header, so
//! a reader relies on each variant's fixed or self-described length to find
//! the next frame.

use crate::protocol::messages::{
    DeviceMessage, MessageType, ACK_CLIPBOARD_LEN, CLIPBOARD_LENGTH_FIELD_SIZE,
    CLIPBOARD_TEXT_MAX_LENGTH, PUSH_RESPONSE_LEN, TAG_SIZE,
};
use thiserror::Error;

/// Errors that can occur during frame encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The caller-supplied buffer cannot hold the frame at the given offset.
    #[error("buffer too small: frame needs bytes up to {needed}, buffer has {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// The byte slice is shorter than the frame it starts.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The tag byte is not a recognized message type.
    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// The payload could not be parsed (length over the limit, UTF-8 error).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

// ── Encoding ──────────────────────────────────────────────────────────────────

impl DeviceMessage {
    /// Writes this frame into `buf[offset..offset + self.encoded_len()]`.
    ///
    /// Bytes outside that range are left untouched, so several frames (or a
    /// frame preceded by an out-of-band header) can be packed into one
    /// caller-owned buffer.  Returns the number of bytes written, which is
    /// always [`DeviceMessage::encoded_len`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BufferTooSmall`] if the frame does not fit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mirror_core::DeviceMessage;
    ///
    /// let mut buf = [0xAAu8; 8];
    /// let written = DeviceMessage::push_response(7, 0).write_into(&mut buf, 2).unwrap();
    /// assert_eq!(written, 4);
    /// assert_eq!(buf, [0xAA, 0xAA, 0x65, 0x00, 0x07, 0x00, 0xAA, 0xAA]);
    /// ```
    pub fn write_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, ProtocolError> {
        let len = self.encoded_len();
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= buf.len())
            .ok_or(ProtocolError::BufferTooSmall {
                needed: offset.saturating_add(len),
                available: buf.len(),
            })?;

        let frame = &mut buf[offset..end];
        frame[0] = self.message_type() as u8;
        match self {
            DeviceMessage::Clipboard(text) => {
                let payload_start = TAG_SIZE + CLIPBOARD_LENGTH_FIELD_SIZE;
                // Length fits in u32: bounded by CLIPBOARD_TEXT_MAX_LENGTH.
                frame[TAG_SIZE..payload_start].copy_from_slice(&(text.len() as u32).to_be_bytes());
                frame[payload_start..].copy_from_slice(text.as_str().as_bytes());
            }
            DeviceMessage::AckClipboard { sequence } => {
                frame[TAG_SIZE..].copy_from_slice(&sequence.to_be_bytes());
            }
            DeviceMessage::PushResponse { id, result } => {
                frame[TAG_SIZE..TAG_SIZE + 2].copy_from_slice(&id.to_be_bytes());
                frame[TAG_SIZE + 2] = *result;
            }
        }
        Ok(len)
    }

    /// Encodes this frame into a freshly allocated, exactly sized buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_with_header_room(0)
    }

    /// Encodes this frame after `offset` zeroed bytes reserved for a
    /// caller-supplied header.  The returned buffer is `offset + encoded_len`
    /// bytes long.
    pub fn to_bytes_with_header_room(&self, offset: usize) -> Vec<u8> {
        let mut buf = vec![0u8; offset + self.encoded_len()];
        let written = self.write_into(&mut buf, offset);
        debug_assert_eq!(written, Ok(self.encoded_len()));
        buf
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes one [`DeviceMessage`] from the beginning of `bytes`.
///
/// Returns the decoded message and the number of bytes consumed, so the caller
/// can advance their read cursor to the next frame.
///
/// # Errors
///
/// - [`ProtocolError::InsufficientData`] if the frame is incomplete (read more
///   bytes and retry).
/// - [`ProtocolError::UnknownMessageType`] for an unrecognized tag.
/// - [`ProtocolError::MalformedPayload`] for an oversized or non-UTF-8
///   clipboard payload.
///
/// # Examples
///
/// ```rust
/// use mirror_core::{decode_device_message, DeviceMessage};
///
/// let bytes = DeviceMessage::ack_clipboard(42).to_bytes();
/// let (decoded, n) = decode_device_message(&bytes).unwrap();
/// assert_eq!(decoded, DeviceMessage::ack_clipboard(42));
/// assert_eq!(n, 9);
/// ```
pub fn decode_device_message(bytes: &[u8]) -> Result<(DeviceMessage, usize), ProtocolError> {
    let Some(&tag) = bytes.first() else {
        return Err(ProtocolError::InsufficientData {
            needed: TAG_SIZE,
            available: 0,
        });
    };
    let msg_type = MessageType::try_from(tag).map_err(|_| ProtocolError::UnknownMessageType(tag))?;

    match msg_type {
        MessageType::Clipboard => decode_clipboard(bytes),
        MessageType::AckClipboard => {
            require_len(bytes, ACK_CLIPBOARD_LEN)?;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[TAG_SIZE..ACK_CLIPBOARD_LEN]);
            Ok((
                DeviceMessage::ack_clipboard(i64::from_be_bytes(raw)),
                ACK_CLIPBOARD_LEN,
            ))
        }
        MessageType::PushResponse => {
            require_len(bytes, PUSH_RESPONSE_LEN)?;
            let id = i16::from_be_bytes([bytes[1], bytes[2]]);
            Ok((DeviceMessage::push_response(id, bytes[3]), PUSH_RESPONSE_LEN))
        }
    }
}

fn decode_clipboard(bytes: &[u8]) -> Result<(DeviceMessage, usize), ProtocolError> {
    let payload_start = TAG_SIZE + CLIPBOARD_LENGTH_FIELD_SIZE;
    require_len(bytes, payload_start)?;
    let len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
    if len > CLIPBOARD_TEXT_MAX_LENGTH {
        return Err(ProtocolError::MalformedPayload(format!(
            "clipboard length {len} exceeds maximum {CLIPBOARD_TEXT_MAX_LENGTH}"
        )));
    }
    let end = payload_start + len;
    require_len(bytes, end)?;
    let text = std::str::from_utf8(&bytes[payload_start..end])
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid UTF-8: {e}")))?;
    Ok((DeviceMessage::clipboard(text), end))
}

fn require_len(bytes: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if bytes.len() < needed {
        Err(ProtocolError::InsufficientData {
            needed,
            available: bytes.len(),
        })
    } else {
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
