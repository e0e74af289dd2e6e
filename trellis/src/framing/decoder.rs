use bytes::{Buf, BytesMut};
use tokio_util::codec;

use crate::{
    constants::{FRAME_HEADER_SIZE, MAX_FRAME_SIZE, TRAILER_FLAG},
    error::TransportError,
    framing::Frame,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    ReadHeader,
    ReadBody { trailer: bool, len: usize },
}

/// Splits a response body into [Frames](Frame), tolerating arbitrary
/// chunk boundaries: `decode` returns `Ok(None)` until a full frame has
/// arrived.
pub struct FrameDecoder {
    state: State,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: State::ReadHeader,
        }
    }

    /// Whether a frame header has been consumed whose payload has not
    /// fully arrived. Distinguishes clean end-of-stream from a frame cut
    /// short.
    pub fn in_progress(&self) -> bool {
        self.state != State::ReadHeader
    }
}

impl codec::Decoder for FrameDecoder {
    type Error = TransportError;
    type Item = Frame;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let State::ReadHeader = self.state {
            if src.remaining() < FRAME_HEADER_SIZE {
                return Ok(None);
            }
            let flag = src.get_u8();
            // the only meaningful bit is the trailer marker; anything
            // else (e.g. a compression bit) is unsupported
            if flag & !TRAILER_FLAG != 0 {
                return Err(TransportError::InvalidFrameFlag(flag));
            }
            let len = src.get_u32() as usize;
            if len > MAX_FRAME_SIZE {
                return Err(TransportError::FrameTooLarge(len));
            }
            src.reserve(len);
            self.state = State::ReadBody {
                trailer: flag & TRAILER_FLAG != 0,
                len,
            };
        }

        if let State::ReadBody { trailer, len } = self.state {
            if src.remaining() < len {
                Ok(None)
            } else {
                let payload = src.split_to(len).freeze();
                self.state = State::ReadHeader;
                Ok(Some(if trailer {
                    Frame::Trailer(payload)
                } else {
                    Frame::Data(payload)
                }))
            }
        } else {
            Ok(None)
        }
    }
}
