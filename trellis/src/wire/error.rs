use thiserror::Error;

/// Convenience result type.
pub type WireResult<T> = Result<T, WireError>;

/// Error arising from encoding or decoding a wire record.
///
/// Decode-side variants describe malformed input; none of them are
/// recoverable and a failed decode never yields a partial message.
/// [UnknownField](WireError::UnknownField) and
/// [WrongKind](WireError::WrongKind) are encode-side misuse of the
/// message model. Unrecognized field *numbers* on the wire are not an
/// error at all; they are skipped.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("varint ended before its final byte")]
    TruncatedVarint,
    #[error("varint exceeds ten bytes")]
    VarintOverflow,
    #[error("need {needed} bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },
    #[error("length prefix {len} exceeds {remaining} remaining bytes")]
    LengthOverrun { len: u64, remaining: usize },
    #[error("tag has undefined wire kind {0}")]
    InvalidWireKind(u8),
    #[error("string field is not valid utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("message {message} has no field {number}")]
    UnknownField {
        message: &'static str,
        number: u32,
    },
    #[error("value does not match the declared type of {message}.{field}")]
    WrongKind {
        message: &'static str,
        field: &'static str,
    },
}
