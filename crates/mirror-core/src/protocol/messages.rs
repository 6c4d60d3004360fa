//! Device-to-client message types.
//!
//! A [`DeviceMessage`] is built immediately before it is serialized, is never
//! mutated, and is dropped once its bytes are written.  Every variant knows
//! its exact encoded length up front (see [`DeviceMessage::encoded_len`]) so
//! callers can pre-size their buffers.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Framing ceiling for a single device message (256 KiB).
pub const MESSAGE_MAX_SIZE: usize = 1 << 18;

/// Ceiling used by downstream consumers of single events.
///
/// Not enforced by the encoder.
pub const MAX_EVENT_SIZE: usize = 4096;

/// Size of the tag byte that opens every frame.
pub const TAG_SIZE: usize = 1;

/// Size of the big-endian length prefix of a clipboard payload.
pub const CLIPBOARD_LENGTH_FIELD_SIZE: usize = 4;

/// Largest clipboard payload that still fits in [`MESSAGE_MAX_SIZE`]
/// (tag: 1 byte, length: 4 bytes).
pub const CLIPBOARD_TEXT_MAX_LENGTH: usize =
    MESSAGE_MAX_SIZE - TAG_SIZE - CLIPBOARD_LENGTH_FIELD_SIZE;

/// Encoded size of an [`DeviceMessage::AckClipboard`] frame.
pub const ACK_CLIPBOARD_LEN: usize = TAG_SIZE + 8;

/// Encoded size of a [`DeviceMessage::PushResponse`] frame.
pub const PUSH_RESPONSE_LEN: usize = TAG_SIZE + 2 + 1;

/// Reserved sequence number meaning "no specific request is acknowledged".
///
/// Shared with the inbound control-message numbering space.
pub const SEQUENCE_INVALID: i64 = -1;

// ── Message type codes ────────────────────────────────────────────────────────

/// Tag byte identifying the payload that follows it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Clipboard = 0,
    AckClipboard = 1,
    PushResponse = 101,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(MessageType::Clipboard),
            1 => Ok(MessageType::AckClipboard),
            101 => Ok(MessageType::PushResponse),
            _ => Err(()),
        }
    }
}

// ── Clipboard payload ─────────────────────────────────────────────────────────

/// Clipboard text already truncated to [`CLIPBOARD_TEXT_MAX_LENGTH`] bytes.
///
/// Truncation happens once, at construction, and always lands on a UTF-8
/// code point boundary.  The encoded length and the encoded bytes are both
/// derived from this single stored string, so they cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardText {
    text: String,
}

impl ClipboardText {
    /// Wraps `text`, silently dropping trailing code points that do not fit.
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        let len = utf8_truncation_index(&text, CLIPBOARD_TEXT_MAX_LENGTH);
        text.truncate(len);
        Self { text }
    }

    /// The (possibly truncated) text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Returns the largest prefix length `<= max_len` that does not split a
/// multi-byte UTF-8 sequence.
///
/// If `text` already fits, its full byte length is returned.
pub fn utf8_truncation_index(text: &str, max_len: usize) -> usize {
    if text.len() <= max_len {
        return text.len();
    }
    let mut len = max_len;
    // Step back over continuation bytes (0b10xx_xxxx); a boundary exists at
    // most 3 bytes before any index in valid UTF-8.
    while !text.is_char_boundary(len) {
        len -= 1;
    }
    len
}

// ── Top-level message enum ────────────────────────────────────────────────────

/// Every message the device can send to the client.
///
/// # Example
///
/// ```rust
/// use mirror_core::protocol::messages::{DeviceMessage, MessageType};
///
/// let msg = DeviceMessage::push_response(7, 0);
/// assert_eq!(msg.message_type(), MessageType::PushResponse);
/// assert_eq!(msg.to_bytes(), vec![0x65, 0x00, 0x07, 0x00]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceMessage {
    /// The device clipboard changed; carries the new text.
    Clipboard(ClipboardText),
    /// Acknowledges a client "set clipboard" request by its sequence number.
    AckClipboard { sequence: i64 },
    /// Outcome of a file push started by the client.
    ///
    /// `result` is an unsigned status code in `0..=255`.
    PushResponse { id: i16, result: u8 },
}

impl DeviceMessage {
    /// Builds a clipboard message, truncating the text if needed.
    pub fn clipboard(text: impl Into<String>) -> Self {
        DeviceMessage::Clipboard(ClipboardText::new(text))
    }

    /// Builds a clipboard acknowledgement.  Any value is accepted, including
    /// [`SEQUENCE_INVALID`].
    pub fn ack_clipboard(sequence: i64) -> Self {
        DeviceMessage::AckClipboard { sequence }
    }

    /// Builds a file push response.
    pub fn push_response(id: i16, result: u8) -> Self {
        DeviceMessage::PushResponse { id, result }
    }

    /// Builds a file push response from a wider status integer, keeping only
    /// its low 8 bits.
    ///
    /// Callers should keep `result` within `0..=255`; anything wider wraps.
    pub fn push_response_from_status(id: i16, result: i32) -> Self {
        DeviceMessage::PushResponse {
            id,
            result: (result & 0xFF) as u8,
        }
    }

    /// Returns the wire tag for this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            DeviceMessage::Clipboard(_) => MessageType::Clipboard,
            DeviceMessage::AckClipboard { .. } => MessageType::AckClipboard,
            DeviceMessage::PushResponse { .. } => MessageType::PushResponse,
        }
    }

    /// Exact number of bytes [`DeviceMessage::write_into`] will write.
    pub fn encoded_len(&self) -> usize {
        match self {
            DeviceMessage::Clipboard(text) => TAG_SIZE + CLIPBOARD_LENGTH_FIELD_SIZE + text.len(),
            DeviceMessage::AckClipboard { .. } => ACK_CLIPBOARD_LEN,
            DeviceMessage::PushResponse { .. } => PUSH_RESPONSE_LEN,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
