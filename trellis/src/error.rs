use thiserror::Error;

use crate::wire::WireError;

/// Convenience result type for call operations.
pub type CallResult<T> = Result<T, CallError>;

/// Failure of the transport, or of the frame protocol layered on it.
///
/// Framing violations live here rather than beside the wire codec
/// errors: a frame that cannot be delimited is indistinguishable from a
/// broken connection as far as the caller is concerned, and neither is
/// retried internally.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    #[error("call failed with grpc-status {code}: {message}")]
    Grpc { code: u32, message: String },
    #[error("unsupported frame flag {0:#04x}")]
    InvalidFrameFlag(u8),
    #[error("frame of {0} bytes exceeds the receive limit")]
    FrameTooLarge(usize),
    #[error("response body ended mid-frame")]
    TruncatedFrame,
    #[error("stream ended without a trailer frame")]
    MissingTrailer,
    #[error("response carried no message frame")]
    MissingResponse,
    #[error("bytes received after the final frame")]
    TrailingData,
    #[error("trailer frame is not valid status metadata")]
    InvalidTrailer,
    #[error("text-mode body is not valid base64")]
    InvalidBase64,
}

/// Any failure mode of an RPC call: the message bytes were corrupt, or
/// the channel carrying them broke.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("malformed wire data")]
    Wire(#[from] WireError),
    #[error("transport failure")]
    Transport(#[from] TransportError),
}
