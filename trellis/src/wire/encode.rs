use bytes::{BufMut, Bytes, BytesMut};

use crate::wire::{
    descriptor::{Cardinality, FieldDescriptor, WireKind},
    value::{DynamicMessage, Value},
    varint::put_varint,
    WireError, WireResult,
};

/// Encode a message to its wire record.
pub fn encode(message: &DynamicMessage) -> WireResult<Bytes> {
    let mut buf = BytesMut::new();
    encode_to(message, &mut buf)?;
    Ok(buf.freeze())
}

/// Encode a message into the supplied buffer.
///
/// Fields are emitted in ascending field-number order. Implicit-presence
/// scalars equal to their default and empty repeated fields are omitted;
/// message-typed fields and oneof members are emitted whenever present,
/// even when their payload is all defaults.
pub fn encode_to(message: &DynamicMessage, buf: &mut BytesMut) -> WireResult<()> {
    for (number, value) in message.fields() {
        // assignment already validated the number; don't panic if the
        // descriptor and instance somehow disagree
        let field = message
            .descriptor()
            .field(number)
            .ok_or(WireError::UnknownField {
                message: message.descriptor().name,
                number,
            })?;
        match (field.cardinality, value) {
            (Cardinality::Repeated, Value::List(elements)) => {
                // unpacked: one tagged entry per element, in order
                for element in elements {
                    put_field(buf, field, element)?;
                }
            }
            (Cardinality::Repeated, _) => {
                return Err(WireError::WrongKind {
                    message: message.descriptor().name,
                    field: field.name,
                });
            }
            (Cardinality::Singular, value) => {
                if field.explicit_presence() || !value.is_default() {
                    put_field(buf, field, value)?;
                }
            }
        }
    }
    Ok(())
}

fn put_tag(buf: &mut BytesMut, number: u32, kind: WireKind) {
    put_varint(buf, (u64::from(number) << 3) | kind as u64);
}

fn put_len_delimited(buf: &mut BytesMut, bytes: &[u8]) {
    put_varint(buf, bytes.len() as u64);
    buf.put_slice(bytes);
}

fn put_field(buf: &mut BytesMut, field: &FieldDescriptor, value: &Value) -> WireResult<()> {
    put_tag(buf, field.number, field.kind.wire_kind());
    match value {
        Value::Bool(v) => put_varint(buf, u64::from(*v)),
        // plain int32/int64 semantics: sign-extend, no zig-zag
        Value::Int32(v) => put_varint(buf, *v as i64 as u64),
        Value::Int64(v) => put_varint(buf, *v as u64),
        Value::UInt32(v) => put_varint(buf, u64::from(*v)),
        Value::Float(v) => buf.put_f32_le(*v),
        Value::Double(v) => buf.put_f64_le(*v),
        Value::String(v) => put_len_delimited(buf, v.as_bytes()),
        Value::Bytes(v) => put_len_delimited(buf, v),
        Value::Message(nested) => {
            let body = encode(nested)?;
            put_len_delimited(buf, &body);
        }
        Value::List(_) => {
            return Err(WireError::WrongKind {
                message: "<list element>",
                field: field.name,
            });
        }
    }
    Ok(())
}
