//! Protocol module containing the device message types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_device_message, ProtocolError};
pub use messages::*;
