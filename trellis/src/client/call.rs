use std::sync::mpsc;

use bytes::BytesMut;
use futures::{Stream, StreamExt};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::{
    client::{trailer, transport::BodyStream},
    error::{CallError, TransportError},
    framing::{Frame, FrameDecoder, TextDecoder},
    metadata::Metadata,
    util::should_abort,
    wire::{self, DynamicMessage, MessageDescriptor},
};

/// Requests cooperative cancellation of an in-flight call.
///
/// Cloneable and cheap. Aborting stops the call from requesting further
/// response bytes; a read already in flight finishes and is discarded,
/// and messages already delivered stand. Dropping every handle without
/// calling [abort](AbortHandle::abort) does not cancel the call.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    tx: mpsc::Sender<()>,
}

impl AbortHandle {
    pub fn abort(&self) {
        // the call may already have finished; nothing to tell it then
        let _ = self.tx.send(());
    }
}

/// Where the call is in its life. There is no way back: once completed
/// or failed, a call yields `None` forever.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum CallState {
    Receiving,
    Completed,
    Failed,
}

/// One in-flight call, reading response frames as the consumer asks for
/// them.
///
/// The request has already been sent by the time a `StreamingCall`
/// exists. Reading is pull-driven: no body chunk is requested until
/// [next](StreamingCall::next) is awaited, so a consumer processing
/// messages slower than they arrive pauses the transport instead of
/// buffering unboundedly.
pub struct StreamingCall {
    response: &'static MessageDescriptor,
    body: BodyStream,
    decoder: FrameDecoder,
    buffer: BytesMut,
    /// Present in text mode only.
    text: Option<TextDecoder>,
    state: CallState,
    /// Set once the trailer frame has been seen.
    trailers: Option<Metadata>,
    /// Server-streaming calls must end with a trailer; unary bodies may
    /// simply end.
    require_trailer: bool,
    abort_tx: mpsc::Sender<()>,
    abort_rx: mpsc::Receiver<()>,
}

impl StreamingCall {
    pub(crate) fn new(
        response: &'static MessageDescriptor,
        body: BodyStream,
        text: bool,
        require_trailer: bool,
    ) -> Self {
        let (abort_tx, abort_rx) = mpsc::channel();
        Self {
            response,
            body,
            decoder: FrameDecoder::new(),
            buffer: BytesMut::new(),
            text: text.then(TextDecoder::new),
            state: CallState::Receiving,
            trailers: None,
            require_trailer,
            abort_tx,
            abort_rx,
        }
    }

    /// A handle with which any task may cancel this call.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            tx: self.abort_tx.clone(),
        }
    }

    /// Trailer metadata, available once the stream has completed via a
    /// trailer frame.
    pub fn trailers(&self) -> Option<&Metadata> {
        self.trailers.as_ref()
    }

    fn fail(&mut self, error: impl Into<CallError>) -> Option<Result<DynamicMessage, CallError>> {
        self.state = CallState::Failed;
        Some(Err(error.into()))
    }

    /// The next decoded response message, or `None` once the call has
    /// completed, failed or been aborted.
    ///
    /// A decode or transport error terminates the stream: it is yielded
    /// once and every later poll returns `None`. Messages delivered
    /// before the error remain valid.
    pub async fn next(&mut self) -> Option<Result<DynamicMessage, CallError>> {
        loop {
            if self.state != CallState::Receiving {
                return None;
            }
            if should_abort(&mut self.abort_rx) {
                debug!("call aborted by caller");
                self.state = CallState::Completed;
                return None;
            }
            match self.decoder.decode(&mut self.buffer) {
                Err(error) => return self.fail(error),
                Ok(Some(Frame::Data(payload))) => {
                    trace!(len = payload.len(), "data frame");
                    match wire::decode(self.response, payload) {
                        Ok(message) => return Some(Ok(message)),
                        Err(error) => return self.fail(error),
                    }
                }
                Ok(Some(Frame::Trailer(payload))) => {
                    let trailers = match trailer::parse_trailers(&payload) {
                        Ok(trailers) => trailers,
                        Err(error) => return self.fail(error),
                    };
                    if let Err(error) = trailer::check_status(&trailers) {
                        return self.fail(error);
                    }
                    // nothing may follow the trailer, whether already
                    // buffered or still held by the transport
                    if let Err(error) = self.expect_end_of_body().await {
                        return self.fail(error);
                    }
                    debug!("call completed");
                    self.trailers = Some(trailers);
                    self.state = CallState::Completed;
                    return None;
                }
                Ok(None) => match self.body.next().await {
                    Some(Ok(chunk)) => {
                        trace!(len = chunk.len(), "body chunk");
                        if let Some(text) = self.text.as_mut() {
                            if let Err(error) = text.feed(&chunk, &mut self.buffer) {
                                return self.fail(error);
                            }
                        } else {
                            self.buffer.extend_from_slice(&chunk);
                        }
                    }
                    Some(Err(error)) => return self.fail(error),
                    None => {
                        if let Some(text) = &self.text {
                            if let Err(error) = text.finish() {
                                return self.fail(error);
                            }
                        }
                        if self.decoder.in_progress() || !self.buffer.is_empty() {
                            return self.fail(TransportError::TruncatedFrame);
                        }
                        if self.require_trailer {
                            return self.fail(TransportError::MissingTrailer);
                        }
                        self.state = CallState::Completed;
                        return None;
                    }
                },
            }
        }
    }

    /// Read the body to its end, requiring that no payload bytes follow
    /// the trailer frame.
    async fn expect_end_of_body(&mut self) -> Result<(), CallError> {
        loop {
            if self.decoder.in_progress() || !self.buffer.is_empty() {
                return Err(TransportError::TrailingData.into());
            }
            match self.body.next().await {
                Some(Ok(chunk)) => {
                    if let Some(text) = self.text.as_mut() {
                        text.feed(&chunk, &mut self.buffer)?;
                    } else {
                        self.buffer.extend_from_slice(&chunk);
                    }
                }
                Some(Err(error)) => return Err(error.into()),
                None => {
                    if let Some(text) = &self.text {
                        text.finish()?;
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Adapt the call to a [Stream] of response messages. The stream
    /// ends after the terminal item; an error, if any, is always last.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<DynamicMessage, CallError>> {
        async_stream::stream! {
            while let Some(item) = self.next().await {
                yield item;
            }
        }
    }
}
