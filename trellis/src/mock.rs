//! Library-local testing utilities: a scripted in-memory transport.

use std::{collections::VecDeque, io, sync::Mutex};

use async_stream::stream;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    client::{BodyStream, HttpTransport, TransportRequest, TransportResponse},
    constants::TRAILER_FLAG,
    error::TransportError,
};

type Chunks = Vec<Result<Bytes, TransportError>>;

/// Builds one scripted HTTP response, frame by frame. By default each
/// frame arrives as its own body chunk; [ResponseBuilder::chunked]
/// re-splits the body to exercise arbitrary boundaries.
pub struct ResponseBuilder {
    status: u16,
    text: bool,
    chunks: Chunks,
}

impl ResponseBuilder {
    pub fn ok() -> Self {
        Self::with_status(200)
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            text: false,
            chunks: Vec::new(),
        }
    }

    /// Emit each frame as its own padded base64 block, the way
    /// text-mode servers do.
    pub fn text(mut self) -> Self {
        self.text = true;
        self
    }

    fn push_frame(&mut self, flag: u8, payload: &[u8]) {
        let mut frame = BytesMut::new();
        frame.put_u8(flag);
        frame.put_u32(payload.len() as u32);
        frame.put_slice(payload);
        let frame = if self.text {
            Bytes::from(STANDARD.encode(&frame))
        } else {
            frame.freeze()
        };
        self.chunks.push(Ok(frame));
    }

    /// Append a data frame holding an encoded message.
    pub fn data(mut self, payload: &[u8]) -> Self {
        self.push_frame(0, payload);
        self
    }

    /// Append a success trailer.
    pub fn trailer_ok(self) -> Self {
        self.trailer(0, "")
    }

    /// Append a trailer with an explicit status.
    pub fn trailer(mut self, code: u32, message: &str) -> Self {
        let body = format!("grpc-status: {code}\r\ngrpc-message: {message}\r\n");
        self.push_frame(TRAILER_FLAG, body.as_bytes());
        self
    }

    /// Append raw bytes as a body chunk, bypassing framing.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.chunks.push(Ok(Bytes::copy_from_slice(bytes)));
        self
    }

    /// End the body with a transport error.
    pub fn error(mut self, error: TransportError) -> Self {
        self.chunks.push(Err(error));
        self
    }

    /// Re-split everything appended so far into body chunks of `size`
    /// bytes. Errors stay at the end of the body.
    pub fn chunked(mut self, size: usize) -> Self {
        let mut all = BytesMut::new();
        let mut tail: Chunks = Vec::new();
        for chunk in self.chunks {
            match chunk {
                Ok(bytes) => all.put_slice(&bytes),
                Err(error) => tail.push(Err(error)),
            }
        }
        let mut rest = all.freeze();
        let mut chunks: Chunks = Vec::new();
        while rest.len() > size {
            chunks.push(Ok(rest.split_to(size)));
        }
        if !rest.is_empty() {
            chunks.push(Ok(rest));
        }
        chunks.extend(tail);
        self.chunks = chunks;
        self
    }
}

/// An in-memory transport answering each request from a queue of canned
/// responses, recording requests for inspection. Don't use this for any
/// real-life purpose.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<(u16, Chunks)>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Default::default()
    }

    /// Queue the response for the next request.
    pub fn respond_with(&self, response: ResponseBuilder) {
        self.responses
            .lock()
            .unwrap()
            .push_back((response.status, response.chunks));
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let (status, chunks) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                TransportError::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "no scripted response",
                ))
            })?;
        let body: BodyStream = Box::pin(stream! {
            for chunk in chunks {
                yield chunk;
            }
        });
        Ok(TransportResponse { status, body })
    }
}
