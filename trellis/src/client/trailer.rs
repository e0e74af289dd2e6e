use crate::{error::TransportError, metadata::Metadata};

/// Trailer key carrying the terminal status code.
pub const STATUS_KEY: &str = "grpc-status";
/// Trailer key carrying the human-readable status message.
pub const MESSAGE_KEY: &str = "grpc-message";

/// Parse a trailer frame payload: `key: value` lines separated by CRLF.
pub fn parse_trailers(payload: &[u8]) -> Result<Metadata, TransportError> {
    let text = std::str::from_utf8(payload).map_err(|_| TransportError::InvalidTrailer)?;
    let mut metadata = Metadata::new();
    for line in text.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or(TransportError::InvalidTrailer)?;
        metadata.insert(key.trim(), value.trim());
    }
    Ok(metadata)
}

/// Resolve the terminal status carried by trailer metadata. A missing
/// status key counts as success.
pub fn check_status(trailers: &Metadata) -> Result<(), TransportError> {
    let code = match trailers.get(STATUS_KEY) {
        None => 0,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| TransportError::InvalidTrailer)?,
    };
    if code == 0 {
        Ok(())
    } else {
        Err(TransportError::Grpc {
            code,
            message: trailers.get(MESSAGE_KEY).unwrap_or_default().to_string(),
        })
    }
}
