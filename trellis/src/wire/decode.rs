use bytes::{Buf, Bytes};

use crate::wire::{
    descriptor::{Cardinality, FieldKind, MessageDescriptor, WireKind},
    value::{DynamicMessage, Value},
    varint::get_varint,
    WireError, WireResult,
};

/// Decode a wire record against a descriptor.
///
/// Unrecognized field numbers are skipped by wire-kind length rules and
/// never rejected. Repeated fields append in arrival order; duplicate
/// entries for singular fields (including oneof members) are
/// last-one-wins. Any malformed input fails the whole decode; a partial
/// instance is never returned.
pub fn decode(descriptor: &'static MessageDescriptor, mut buf: Bytes) -> WireResult<DynamicMessage> {
    let mut message = DynamicMessage::new(descriptor);
    while buf.has_remaining() {
        let tag = get_varint(&mut buf)?;
        let kind = WireKind::from_tag(tag)?;
        let number = u32::try_from(tag >> 3).ok();
        let field = number.and_then(|n| descriptor.field(n));
        match field {
            Some(field) if field.kind.wire_kind() == kind => {
                let value = get_value(&mut buf, field.kind)?;
                match field.cardinality {
                    Cardinality::Repeated => message.push(field.number, value)?,
                    Cardinality::Singular => message.set(field.number, value)?,
                }
            }
            // unknown number, or a known number arriving under an
            // unexpected wire kind: the tag alone tells us how far to
            // skip
            _ => skip_value(&mut buf, kind)?,
        }
    }
    Ok(message)
}

fn need(buf: &Bytes, needed: usize) -> WireResult<()> {
    if buf.remaining() < needed {
        return Err(WireError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn get_len_delimited(buf: &mut Bytes) -> WireResult<Bytes> {
    let len = get_varint(buf)?;
    if len > buf.remaining() as u64 {
        return Err(WireError::LengthOverrun {
            len,
            remaining: buf.remaining(),
        });
    }
    Ok(buf.copy_to_bytes(len as usize))
}

fn get_value(buf: &mut Bytes, kind: FieldKind) -> WireResult<Value> {
    Ok(match kind {
        FieldKind::Bool => Value::Bool(get_varint(buf)? != 0),
        FieldKind::Int32 => Value::Int32(get_varint(buf)? as i32),
        FieldKind::Int64 => Value::Int64(get_varint(buf)? as i64),
        FieldKind::UInt32 => Value::UInt32(get_varint(buf)? as u32),
        FieldKind::Float => {
            need(buf, 4)?;
            Value::Float(buf.get_f32_le())
        }
        FieldKind::Double => {
            need(buf, 8)?;
            Value::Double(buf.get_f64_le())
        }
        FieldKind::String => {
            let bytes = get_len_delimited(buf)?;
            Value::String(String::from_utf8(bytes.to_vec())?)
        }
        FieldKind::Bytes => Value::Bytes(get_len_delimited(buf)?),
        FieldKind::Message(descriptor) => {
            // the length prefix bounds the nested decode; it cannot
            // consume the enclosing record's bytes
            Value::Message(decode(descriptor, get_len_delimited(buf)?)?)
        }
    })
}

fn skip_value(buf: &mut Bytes, kind: WireKind) -> WireResult<()> {
    match kind {
        WireKind::Varint => {
            get_varint(buf)?;
        }
        WireKind::Fixed64 => {
            need(buf, 8)?;
            buf.advance(8);
        }
        WireKind::Fixed32 => {
            need(buf, 4)?;
            buf.advance(4);
        }
        WireKind::LengthDelimited => {
            get_len_delimited(buf)?;
        }
    }
    Ok(())
}
