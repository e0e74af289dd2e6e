use std::collections::BTreeMap;

use bytes::Bytes;

use crate::wire::{
    descriptor::{Cardinality, FieldDescriptor, FieldKind, MessageDescriptor},
    WireError, WireResult,
};

/// A single field value. `List` only ever appears at the top level of a
/// repeated field; elements are always scalar or `Message`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Bytes),
    Message(DynamicMessage),
    List(Vec<Value>),
}

impl Value {
    /// The value an absent implicit-presence field reads back as.
    pub fn default_for(kind: FieldKind) -> Value {
        match kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Int32 => Value::Int32(0),
            FieldKind::Int64 => Value::Int64(0),
            FieldKind::UInt32 => Value::UInt32(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::Double => Value::Double(0.0),
            FieldKind::String => Value::String(String::new()),
            FieldKind::Bytes => Value::Bytes(Bytes::new()),
            FieldKind::Message(descriptor) => Value::Message(DynamicMessage::new(descriptor)),
        }
    }

    /// Whether this is the type default, i.e. indistinguishable from
    /// absence under implicit presence.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Bool(v) => !v,
            Value::Int32(v) => *v == 0,
            Value::Int64(v) => *v == 0,
            Value::UInt32(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Double(v) => *v == 0.0,
            Value::String(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            // explicit presence kinds are never treated as absent
            Value::Message(_) => false,
            Value::List(v) => v.is_empty(),
        }
    }

    fn matches(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Value::Bool(_), FieldKind::Bool)
            | (Value::Int32(_), FieldKind::Int32)
            | (Value::Int64(_), FieldKind::Int64)
            | (Value::UInt32(_), FieldKind::UInt32)
            | (Value::Float(_), FieldKind::Float)
            | (Value::Double(_), FieldKind::Double)
            | (Value::String(_), FieldKind::String)
            | (Value::Bytes(_), FieldKind::Bytes) => true,
            (Value::Message(message), FieldKind::Message(descriptor)) => {
                std::ptr::eq(message.descriptor(), *descriptor)
            }
            _ => false,
        }
    }
}

/// A message instance: a sparse mapping from field number to present
/// value, bound to the [MessageDescriptor] that gives those numbers
/// meaning.
///
/// Presence follows the per-field rule of the wire format: singular
/// scalars have implicit presence (absent reads back as the type
/// default and defaults are never transmitted), message-typed fields and
/// oneof members have explicit presence, repeated fields are present iff
/// non-empty.
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    descriptor: &'static MessageDescriptor,
    fields: BTreeMap<u32, Value>,
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self.fields == other.fields
    }
}

impl DynamicMessage {
    /// Create an instance with every field absent.
    pub fn new(descriptor: &'static MessageDescriptor) -> Self {
        Self {
            descriptor,
            fields: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &'static MessageDescriptor {
        self.descriptor
    }

    /// Iterate present fields in ascending field-number order.
    pub fn fields(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.fields.iter().map(|(number, value)| (*number, value))
    }

    fn checked_field(&self, number: u32) -> WireResult<&FieldDescriptor> {
        self.descriptor
            .field(number)
            .ok_or(WireError::UnknownField {
                message: self.descriptor.name,
                number,
            })
    }

    /// Set a field. Replaces any existing value; assigning a member of a
    /// oneof group clears its siblings.
    pub fn set(&mut self, number: u32, value: Value) -> WireResult<()> {
        let field = self.checked_field(number)?;
        let accepted = match field.cardinality {
            Cardinality::Singular => value.matches(&field.kind),
            Cardinality::Repeated => match &value {
                Value::List(elements) => elements.iter().all(|v| v.matches(&field.kind)),
                _ => false,
            },
        };
        if !accepted {
            return Err(WireError::WrongKind {
                message: self.descriptor.name,
                field: field.name,
            });
        }
        for sibling in self.descriptor.oneof_siblings(field) {
            if *sibling != number {
                self.fields.remove(sibling);
            }
        }
        self.fields.insert(number, value);
        Ok(())
    }

    /// Append one element to a repeated field, preserving order.
    pub fn push(&mut self, number: u32, value: Value) -> WireResult<()> {
        let field = self.checked_field(number)?;
        if field.cardinality != Cardinality::Repeated || !value.matches(&field.kind) {
            return Err(WireError::WrongKind {
                message: self.descriptor.name,
                field: field.name,
            });
        }
        match self
            .fields
            .entry(number)
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(elements) => elements.push(value),
            // entry is only ever created as a list above
            _ => unreachable!("repeated field holds a non-list value"),
        }
        Ok(())
    }

    /// The raw present value, if any.
    pub fn get(&self, number: u32) -> Option<&Value> {
        self.fields.get(&number)
    }

    /// Whether the field is present. For implicit-presence scalars a
    /// stored default still counts as present here; it simply will not
    /// be transmitted.
    pub fn has(&self, number: u32) -> bool {
        self.fields.contains_key(&number)
    }

    /// The present value, or the type default for an absent field. An
    /// absent repeated field reads back as an empty list.
    pub fn get_or_default(&self, number: u32) -> WireResult<Value> {
        let field = self.checked_field(number)?;
        if let Some(value) = self.fields.get(&number) {
            return Ok(value.clone());
        }
        Ok(match field.cardinality {
            Cardinality::Singular => Value::default_for(field.kind),
            Cardinality::Repeated => Value::List(Vec::new()),
        })
    }

    /// Remove a field, returning it to the absent state.
    pub fn clear(&mut self, number: u32) -> Option<Value> {
        self.fields.remove(&number)
    }
}
