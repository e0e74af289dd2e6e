use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::TransportError;

/// Base64-wrap a framed request body for the text-safe mode.
pub fn encode_text(framed: &[u8]) -> Bytes {
    Bytes::from(STANDARD.encode(framed))
}

/// Incremental base64 stage for text-mode response bodies.
///
/// Servers emit one independently padded base64 block per frame, and the
/// HTTP layer may split the body anywhere, so the stage decodes every
/// complete four-character quantum as it arrives and holds the
/// remainder. Decoding quantum by quantum is what makes back-to-back
/// padded blocks legal where a single whole-body decode would choke on
/// interior padding.
#[derive(Debug, Default)]
pub struct TextDecoder {
    pending: Vec<u8>,
}

impl TextDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Feed a body chunk, appending decoded bytes to `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut BytesMut) -> Result<(), TransportError> {
        self.pending.extend_from_slice(chunk);
        let usable = self.pending.len() - self.pending.len() % 4;
        for quantum in self.pending[..usable].chunks(4) {
            let decoded = STANDARD
                .decode(quantum)
                .map_err(|_| TransportError::InvalidBase64)?;
            out.put_slice(&decoded);
        }
        self.pending.drain(..usable);
        Ok(())
    }

    /// End of body: leftover characters mean it was cut short.
    pub fn finish(&self) -> Result<(), TransportError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(TransportError::InvalidBase64)
        }
    }
}
