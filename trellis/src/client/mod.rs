//! The streaming RPC client. A [Client] serializes a request message
//! with the wire codec, frames it, submits it over an abstract
//! [HttpTransport] and reassembles one ([unary](Client::unary)) or many
//! ([server_streaming](Client::server_streaming)) response messages from
//! the returned byte stream.
//!
//! Calls are independent: arbitrarily many may run concurrently against
//! one client, which holds nothing mutable between them.
//!
//! Example usage:
//!
//! ``` no_run
//! use trellis::client::{Client, HttpTransport};
//! use trellis::wire::{DynamicMessage, MethodDescriptor, Value};
//! use trellis::Metadata;
//!
//! async fn greet<T: HttpTransport>(
//!     transport: T,
//!     method: &'static MethodDescriptor,
//! ) -> anyhow::Result<()> {
//!     let client = Client::new(transport, "https://example.com:8080");
//!     let mut request = DynamicMessage::new(method.request);
//!     request.set(1, Value::String("hello".into()))?;
//!     let reply = client.unary(method, &request, Metadata::new()).await?;
//!     println!("{:?}", reply.get_or_default(1)?);
//!     Ok(())
//! }
//! ```

mod call;
pub mod trailer;
mod transport;

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;
use tracing::debug;

pub use call::{AbortHandle, StreamingCall};
pub use transport::{BodyStream, HttpTransport, TransportRequest, TransportResponse};

use crate::{
    error::{CallError, CallResult, TransportError},
    framing::{encode_text, FrameEncoder},
    metadata::Metadata,
    wire::{self, DynamicMessage, MethodDescriptor},
};

/// Whether frames travel as raw bytes or base64-wrapped for transports
/// that only pass text through cleanly.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WireMode {
    Binary,
    Text,
}

impl WireMode {
    fn content_type(&self) -> &'static str {
        match self {
            WireMode::Binary => "application/grpc-web+proto",
            WireMode::Text => "application/grpc-web-text",
        }
    }
}

/// Issues calls to methods on one remote endpoint.
pub struct Client<T> {
    transport: Arc<T>,
    base_url: String,
    mode: WireMode,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
            mode: self.mode,
        }
    }
}

impl<T: HttpTransport> Client<T> {
    /// A client speaking raw binary frames.
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self::with_mode(transport, base_url, WireMode::Binary)
    }

    pub fn with_mode(transport: T, base_url: impl Into<String>, mode: WireMode) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            transport: Arc::new(transport),
            base_url,
            mode,
        }
    }

    pub fn mode(&self) -> WireMode {
        self.mode
    }

    fn build_request(
        &self,
        method: &MethodDescriptor,
        message: &DynamicMessage,
        metadata: Metadata,
    ) -> CallResult<TransportRequest> {
        let encoded = wire::encode(message)?;
        let mut framed = BytesMut::new();
        FrameEncoder.encode(encoded, &mut framed)?;
        let body = match self.mode {
            WireMode::Binary => framed.freeze(),
            WireMode::Text => encode_text(&framed),
        };
        let mut headers = metadata;
        headers.insert("content-type", self.mode.content_type());
        headers.insert("x-grpc-web", "1");
        Ok(TransportRequest {
            url: format!("{}{}", self.base_url, method.path()),
            headers,
            body,
        })
    }

    async fn start(
        &self,
        method: &MethodDescriptor,
        message: &DynamicMessage,
        metadata: Metadata,
        require_trailer: bool,
    ) -> CallResult<StreamingCall> {
        let request = self.build_request(method, message, metadata)?;
        debug!(url = %request.url, "sending call");
        let response = self.transport.send(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(TransportError::HttpStatus(response.status).into());
        }
        Ok(StreamingCall::new(
            method.response,
            response.body,
            self.mode == WireMode::Text,
            require_trailer,
        ))
    }

    /// Issue a unary call and await its single response message.
    ///
    /// The body is read to its end: exactly one data frame must arrive,
    /// and a trailer carrying a non-success status rejects the call even
    /// though a message was received. A body that simply ends after the
    /// data frame resolves.
    pub async fn unary(
        &self,
        method: &MethodDescriptor,
        request: &DynamicMessage,
        metadata: Metadata,
    ) -> CallResult<DynamicMessage> {
        debug_assert!(!method.server_streaming);
        let mut call = self.start(method, request, metadata, false).await?;
        let message = match call.next().await {
            Some(Ok(message)) => message,
            Some(Err(error)) => return Err(error),
            None => return Err(TransportError::MissingResponse.into()),
        };
        match call.next().await {
            None => Ok(message),
            Some(Ok(_)) => Err(TransportError::TrailingData.into()),
            Some(Err(error)) => Err(error),
        }
    }

    /// Open a server-streaming call. Response messages are pulled off
    /// the returned [StreamingCall] one at a time; the stream completes
    /// on a success trailer and fails on anything else.
    pub async fn server_streaming(
        &self,
        method: &MethodDescriptor,
        request: &DynamicMessage,
        metadata: Metadata,
    ) -> CallResult<StreamingCall> {
        debug_assert!(method.server_streaming);
        self.start(method, request, metadata, true).await
    }
}
