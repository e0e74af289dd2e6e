//! The wire codec: a compact tagged binary format for structured
//! records, compatible with the protobuf binary wire format subset it
//! exercises (unpacked repeated fields, no zig-zag, no maps).
//!
//! Encoding and decoding are pure synchronous functions of a message and
//! its [MessageDescriptor]. Descriptors are `'static` tables, safe to
//! share across every call and thread without synchronization. Unknown
//! field numbers on decode are skipped, never rejected, so old readers
//! keep working against new writers.

mod decode;
mod descriptor;
mod encode;
mod error;
mod value;
pub(crate) mod varint;

pub use decode::decode;
pub use descriptor::{
    Cardinality, FieldDescriptor, FieldKind, MessageDescriptor, MethodDescriptor, OneofDescriptor,
    WireKind,
};
pub use encode::{encode, encode_to};
pub use error::{WireError, WireResult};
pub use value::{DynamicMessage, Value};

#[cfg(test)]
pub(crate) mod testing {
    //! Hand-written descriptor tables standing in for what a schema
    //! compiler would emit.

    use super::*;

    pub static POINT: MessageDescriptor = MessageDescriptor {
        name: "Point",
        fields: &[
            FieldDescriptor {
                number: 1,
                name: "x",
                kind: FieldKind::Int32,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 2,
                name: "y",
                kind: FieldKind::Int32,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
        ],
        oneofs: &[],
    };

    pub static SCALARS: MessageDescriptor = MessageDescriptor {
        name: "Scalars",
        fields: &[
            FieldDescriptor {
                number: 1,
                name: "flag",
                kind: FieldKind::Bool,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 2,
                name: "count",
                kind: FieldKind::Int32,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 3,
                name: "total",
                kind: FieldKind::Int64,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 4,
                name: "index",
                kind: FieldKind::UInt32,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 5,
                name: "ratio",
                kind: FieldKind::Float,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 6,
                name: "mean",
                kind: FieldKind::Double,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 7,
                name: "name",
                kind: FieldKind::String,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 8,
                name: "blob",
                kind: FieldKind::Bytes,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
        ],
        oneofs: &[],
    };

    pub static SHAPE: MessageDescriptor = MessageDescriptor {
        name: "Shape",
        fields: &[
            FieldDescriptor {
                number: 1,
                name: "label",
                kind: FieldKind::String,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 2,
                name: "visible",
                kind: FieldKind::Bool,
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 3,
                name: "sides",
                kind: FieldKind::Int32,
                cardinality: Cardinality::Repeated,
                oneof: None,
            },
            FieldDescriptor {
                number: 4,
                name: "origin",
                kind: FieldKind::Message(&POINT),
                cardinality: Cardinality::Singular,
                oneof: None,
            },
            FieldDescriptor {
                number: 5,
                name: "holes",
                kind: FieldKind::Message(&POINT),
                cardinality: Cardinality::Repeated,
                oneof: None,
            },
            FieldDescriptor {
                number: 6,
                name: "circle_radius",
                kind: FieldKind::Double,
                cardinality: Cardinality::Singular,
                oneof: Some(0),
            },
            FieldDescriptor {
                number: 7,
                name: "polygon_corners",
                kind: FieldKind::Int32,
                cardinality: Cardinality::Singular,
                oneof: Some(0),
            },
        ],
        oneofs: &[OneofDescriptor {
            name: "outline",
            fields: &[6, 7],
        }],
    };

    pub mod numbers {
        pub const LABEL: u32 = 1;
        pub const VISIBLE: u32 = 2;
        pub const SIDES: u32 = 3;
        pub const ORIGIN: u32 = 4;
        pub const HOLES: u32 = 5;
        pub const CIRCLE_RADIUS: u32 = 6;
        pub const POLYGON_CORNERS: u32 = 7;
    }

    pub fn shape() -> DynamicMessage {
        DynamicMessage::new(&SHAPE)
    }

    pub fn scalars() -> DynamicMessage {
        DynamicMessage::new(&SCALARS)
    }

    /// A point with only its non-default coordinates present, so that
    /// instances compare equal across an encode/decode round trip.
    pub fn point(x: i32, y: i32) -> DynamicMessage {
        let mut message = DynamicMessage::new(&POINT);
        if x != 0 {
            message.set(1, Value::Int32(x)).unwrap();
        }
        if y != 0 {
            message.set(2, Value::Int32(y)).unwrap();
        }
        message
    }
}
