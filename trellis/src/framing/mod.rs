//! The streaming frame format: every unit of a response body is a
//! 1-byte flag, a 4-byte big-endian payload length and the payload
//! itself. A zero flag is a data frame holding one encoded message; a
//! flag with its high bit set is a trailer frame holding `key: value`
//! status metadata and ends the stream. In text-safe mode the framed
//! bytes are additionally base64-wrapped.

mod decoder;
mod encoder;
mod text;

use bytes::Bytes;

pub use decoder::FrameDecoder;
pub use encoder::FrameEncoder;
pub use text::{encode_text, TextDecoder};

/// One de-framed unit of a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An encoded message.
    Data(Bytes),
    /// Raw status metadata; the stream is over.
    Trailer(Bytes),
}
