//! Static descriptions of message layouts.
//!
//! A [MessageDescriptor] is the compile-time-known metadata the codec is
//! parameterized by: which field numbers exist, what logical type each
//! carries and how it appears on the wire. Descriptors are plain `static`
//! tables, immutable and freely shared across calls and threads. They
//! would ordinarily be emitted by a schema compiler; the tests in this
//! crate write them by hand.

use crate::wire::WireError;

/// The on-the-wire encoding category of a field, distinct from its
/// logical type. The discriminants are the low three bits of a tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum WireKind {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireKind {
    /// Decode the low three bits of a tag. Values 3 and 4 (the retired
    /// group markers) and 6 and 7 are undefined.
    pub fn from_tag(tag: u64) -> Result<Self, WireError> {
        match (tag & 0x7) as u8 {
            0 => Ok(WireKind::Varint),
            1 => Ok(WireKind::Fixed64),
            2 => Ok(WireKind::LengthDelimited),
            5 => Ok(WireKind::Fixed32),
            other => Err(WireError::InvalidWireKind(other)),
        }
    }
}

/// The logical type of a field. Each kind maps to exactly one
/// [WireKind].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    Float,
    Double,
    String,
    Bytes,
    Message(&'static MessageDescriptor),
}

impl FieldKind {
    pub fn wire_kind(&self) -> WireKind {
        match self {
            FieldKind::Bool | FieldKind::Int32 | FieldKind::Int64 | FieldKind::UInt32 => {
                WireKind::Varint
            }
            FieldKind::Float => WireKind::Fixed32,
            FieldKind::Double => WireKind::Fixed64,
            FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) => {
                WireKind::LengthDelimited
            }
        }
    }
}

/// Whether a field holds one value or an ordered sequence. Repeated
/// fields are encoded unpacked: one tagged entry per element.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// A single field of a message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Positive, unique within the message, never reordered once
    /// assigned.
    pub number: u32,
    pub name: &'static str,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    /// Index into [MessageDescriptor::oneofs] if this field belongs to a
    /// mutual-exclusion group.
    pub oneof: Option<usize>,
}

impl FieldDescriptor {
    /// Whether absence of this field is distinguishable from a
    /// present-but-default value. Message-typed fields and oneof members
    /// have explicit presence; everything else singular follows the
    /// implicit-presence rule and repeated fields are present iff
    /// non-empty.
    pub fn explicit_presence(&self) -> bool {
        self.oneof.is_some() || matches!(self.kind, FieldKind::Message(_))
    }
}

/// A named group of fields of which at most one may be present at a
/// time. Setting a member clears its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDescriptor {
    pub name: &'static str,
    /// Member field numbers.
    pub fields: &'static [u32],
}

/// The full static layout of one message type.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub name: &'static str,
    /// Listed in ascending field-number order.
    pub fields: &'static [FieldDescriptor],
    pub oneofs: &'static [OneofDescriptor],
}

impl MessageDescriptor {
    /// Look up a field by number.
    pub fn field(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Look up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The other members of `field`'s oneof group, if it has one.
    pub fn oneof_siblings(&self, field: &FieldDescriptor) -> &[u32] {
        match field.oneof {
            Some(index) => self.oneofs[index].fields,
            None => &[],
        }
    }
}

/// A remote procedure: where it lives and what it exchanges. The call
/// path is `/{service}/{name}`.
#[derive(Debug)]
pub struct MethodDescriptor {
    pub service: &'static str,
    pub name: &'static str,
    pub request: &'static MessageDescriptor,
    pub response: &'static MessageDescriptor,
    /// Whether the server answers with a stream of messages rather than
    /// exactly one.
    pub server_streaming: bool,
}

impl MethodDescriptor {
    pub fn path(&self) -> String {
        format!("/{}/{}", self.service, self.name)
    }
}
