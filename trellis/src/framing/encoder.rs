use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec;

use crate::{
    constants::{FRAME_HEADER_SIZE, MAX_FRAME_SIZE},
    error::TransportError,
};

/// Writes data frames. Clients only ever send data frames; trailers are
/// a server-to-client construct.
#[derive(Debug, Clone, Default)]
pub struct FrameEncoder;

impl codec::Encoder<Bytes> for FrameEncoder {
    type Error = TransportError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.len() > MAX_FRAME_SIZE {
            return Err(TransportError::FrameTooLarge(item.len()));
        }
        dst.reserve(FRAME_HEADER_SIZE + item.len());
        dst.put_u8(0);
        dst.put_u32(item.len() as u32);
        dst.put_slice(&item);
        Ok(())
    }
}
