use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::{error::TransportError, metadata::Metadata};

/// Response body chunks, yielded incrementally as they arrive.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// A fully prepared outgoing call: one HTTP POST with a framed (and
/// possibly base64-wrapped) body.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: Metadata,
    pub body: Bytes,
}

/// The transport's answer: an HTTP status and a streaming body.
pub struct TransportResponse {
    pub status: u16,
    pub body: BodyStream,
}

/// The HTTP collaborator the client drives. Implementations must stream
/// response bytes incrementally rather than buffering whole bodies;
/// connection management, TLS and retry policy are their business, not
/// the client's.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
