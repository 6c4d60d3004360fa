//! Logical device events handed to the server by capture, clipboard, and
//! file-transfer subsystems.
//!
//! Producing a [`DeviceMessage`] from an event is the only translation step
//! between those subsystems and the wire.

use mirror_core::DeviceMessage;

/// Something happened on the device that the client must hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The device clipboard now holds `text`.
    ClipboardChanged(String),
    /// A client "set clipboard" request numbered `sequence` was applied.
    ClipboardSet { sequence: i64 },
    /// The file push identified by `id` finished with status `result`.
    PushResult { id: i16, result: u8 },
}

/// Builds the wire message for `event`.
///
/// Clipboard text longer than the frame limit is truncated here, silently.
pub fn produce(event: DeviceEvent) -> DeviceMessage {
    match event {
        DeviceEvent::ClipboardChanged(text) => DeviceMessage::clipboard(text),
        DeviceEvent::ClipboardSet { sequence } => DeviceMessage::ack_clipboard(sequence),
        DeviceEvent::PushResult { id, result } => DeviceMessage::push_response(id, result),
    }
}

impl From<DeviceEvent> for DeviceMessage {
    fn from(event: DeviceEvent) -> Self {
        produce(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::protocol::messages::SEQUENCE_INVALID;
    use mirror_core::MessageType;

    #[test]
    fn test_clipboard_changed_produces_clipboard_message() {
        let msg = produce(DeviceEvent::ClipboardChanged("copied".into()));
        assert_eq!(msg, DeviceMessage::clipboard("copied"));
    }

    #[test]
    fn test_clipboard_set_with_invalid_sequence_still_produces_ack() {
        let msg = produce(DeviceEvent::ClipboardSet {
            sequence: SEQUENCE_INVALID,
        });
        assert_eq!(msg.message_type(), MessageType::AckClipboard);
        assert_eq!(msg.encoded_len(), 9);
    }

    #[test]
    fn test_push_result_converts_via_from() {
        let msg: DeviceMessage = DeviceEvent::PushResult { id: 7, result: 0 }.into();
        assert_eq!(msg.to_bytes(), vec![0x65, 0x00, 0x07, 0x00]);
    }
}
