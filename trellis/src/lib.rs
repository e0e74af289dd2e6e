//! # Trellis
//!
//! Trellis is a descriptor-driven binary wire codec paired with a
//! streaming RPC client for gRPC-Web style transports: unary and
//! server-streaming calls carried over plain HTTP, framed as
//! length-prefixed units and optionally base64-wrapped for text-only
//! channels.
//!
//! The two halves are independent and composable:
//!
//! - [wire] encodes and decodes structured records (scalar fields,
//!   nested records, repeated fields, mutually-exclusive field groups)
//!   against static [MessageDescriptor] tables. It has no opinion about
//!   how bytes move.
//! - [client] turns a request message into a framed HTTP POST and
//!   reassembles one or many response messages from the returned byte
//!   stream, via whatever [HttpTransport] implementation you hand it.
//!
//! Descriptors are immutable `'static` tables, so arbitrarily many
//! calls may share them concurrently with no synchronization; the codec
//! itself is pure and synchronous, and each call owns its own state.
//!
//! ## Crate feature flags
//!
//! - `mocks`: Library local testing utilities, including a scripted
//!   in-memory [HttpTransport].

pub mod client;
pub(crate) mod constants;
pub mod error;
pub mod framing;
mod metadata;
#[cfg(any(test, feature = "mocks"))]
pub mod mock;
mod util;
pub mod wire;

pub use client::{AbortHandle, Client, HttpTransport, StreamingCall, WireMode};
pub use error::{CallError, CallResult, TransportError};
pub use metadata::Metadata;
pub use wire::{DynamicMessage, MessageDescriptor, MethodDescriptor, Value, WireError};
