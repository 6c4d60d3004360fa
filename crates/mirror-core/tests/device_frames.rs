//! Integration tests for the mirror-core frame codec.
//!
//! These tests go through the public API only and check the properties a
//! client decoder depends on: declared lengths match written lengths, clipboard
//! truncation stays on code point boundaries, fixed-size variants stay fixed,
//! and a stream of frames can be read back strictly left to right.

use mirror_core::{
    decode_device_message,
    protocol::messages::{
        DeviceMessage, MessageType, CLIPBOARD_TEXT_MAX_LENGTH, MESSAGE_MAX_SIZE, SEQUENCE_INVALID,
    },
    ProtocolError,
};

/// A spread of messages covering every variant and its boundary values.
fn sample_messages() -> Vec<DeviceMessage> {
    vec![
        DeviceMessage::clipboard(""),
        DeviceMessage::clipboard("café"),
        DeviceMessage::clipboard("日本語のテキスト"),
        DeviceMessage::clipboard("x".repeat(CLIPBOARD_TEXT_MAX_LENGTH)),
        DeviceMessage::clipboard("y".repeat(CLIPBOARD_TEXT_MAX_LENGTH + 100)),
        DeviceMessage::ack_clipboard(SEQUENCE_INVALID),
        DeviceMessage::ack_clipboard(0),
        DeviceMessage::ack_clipboard(i64::MAX),
        DeviceMessage::ack_clipboard(i64::MIN),
        DeviceMessage::push_response(0, 0),
        DeviceMessage::push_response(i16::MAX, 255),
        DeviceMessage::push_response(i16::MIN, 128),
    ]
}

#[test]
fn test_encoded_length_always_matches_declared_length() {
    for msg in sample_messages() {
        let bytes = msg.to_bytes();
        assert_eq!(
            bytes.len(),
            msg.encoded_len(),
            "length mismatch for {:?}",
            msg.message_type()
        );
        assert_eq!(bytes[0], msg.message_type() as u8);
    }
}

#[test]
fn test_fixed_size_variants_have_fixed_lengths() {
    for msg in sample_messages() {
        match msg.message_type() {
            MessageType::AckClipboard => assert_eq!(msg.to_bytes().len(), 9),
            MessageType::PushResponse => assert_eq!(msg.to_bytes().len(), 4),
            MessageType::Clipboard => {}
        }
    }
}

#[test]
fn test_clipboard_at_limit_is_kept_verbatim() {
    // Arrange
    let text = "z".repeat(CLIPBOARD_TEXT_MAX_LENGTH);

    // Act
    let bytes = DeviceMessage::clipboard(text.clone()).to_bytes();

    // Assert
    assert_eq!(bytes.len(), MESSAGE_MAX_SIZE);
    assert_eq!(&bytes[5..], text.as_bytes());
}

#[test]
fn test_clipboard_over_limit_is_truncated_to_valid_utf8() {
    // Arrange: 4-byte code points after a 2-byte prefix, so no multiple of 4
    // lines up with the limit.
    let mut text = String::from("ab");
    while text.len() <= CLIPBOARD_TEXT_MAX_LENGTH {
        text.push('\u{1F680}');
    }

    // Act
    let bytes = DeviceMessage::clipboard(text.clone()).to_bytes();

    // Assert
    let payload = &bytes[5..];
    assert!(payload.len() <= CLIPBOARD_TEXT_MAX_LENGTH);
    let decoded = std::str::from_utf8(payload).expect("payload must be valid UTF-8");
    assert!(text.starts_with(decoded));
    // The cut is the largest boundary under the limit: at most 3 bytes lost.
    assert!(CLIPBOARD_TEXT_MAX_LENGTH - payload.len() < 4);
}

#[test]
fn test_documented_example_frames() {
    assert_eq!(
        DeviceMessage::clipboard("café").to_bytes(),
        [0x00, 0x00, 0x00, 0x00, 0x05, 0x63, 0x61, 0x66, 0xC3, 0xA9]
    );
    assert_eq!(
        DeviceMessage::ack_clipboard(-1).to_bytes(),
        [0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
    );
    assert_eq!(
        DeviceMessage::push_response(7, 0).to_bytes(),
        [0x65, 0x00, 0x07, 0x00]
    );
}

#[test]
fn test_offset_write_places_frame_exactly() {
    let msg = DeviceMessage::clipboard("offset");
    let offset = 11;
    let mut buf = vec![0x5Au8; offset + msg.encoded_len() + 1];

    msg.write_into(&mut buf, offset).expect("fits");

    assert!(buf[..offset].iter().all(|b| *b == 0x5A));
    assert_eq!(&buf[offset..offset + msg.encoded_len()], msg.to_bytes().as_slice());
    assert_eq!(buf[offset + msg.encoded_len()], 0x5A);
}

#[test]
fn test_stream_of_frames_decodes_left_to_right() {
    // Arrange: pack every sample into one contiguous buffer.
    let messages = sample_messages();
    let total: usize = messages.iter().map(DeviceMessage::encoded_len).sum();
    let mut stream = vec![0u8; total];
    let mut cursor = 0;
    for msg in &messages {
        cursor += msg.write_into(&mut stream, cursor).expect("fits");
    }
    assert_eq!(cursor, total);

    // Act
    let mut decoded = Vec::new();
    let mut pos = 0;
    while pos < stream.len() {
        let (msg, n) = decode_device_message(&stream[pos..]).expect("decode");
        decoded.push(msg);
        pos += n;
    }

    // Assert
    assert_eq!(decoded, messages);
}

#[test]
fn test_partial_frame_asks_for_more_data() {
    let bytes = DeviceMessage::clipboard("partial").to_bytes();
    for cut in 0..bytes.len() {
        assert!(
            matches!(
                decode_device_message(&bytes[..cut]),
                Err(ProtocolError::InsufficientData { .. })
            ),
            "cut at {cut}"
        );
    }
}
