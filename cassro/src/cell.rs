//! The value cell: a lazy, memoized holder of a value and/or its wire bytes.
use bytes::{Bytes, BytesMut};

use crate::{
    common::verbose,
    error::{DecodeError, EncodeError},
    types::{TypeDef, lookup},
    value::Value,
};

/// One-shot dispatch: resolve the codec for `def` and encode `value`.
///
/// Used when a single conversion is needed without keeping a [`Cell`]
/// around, e.g. encoding one column value inline.
pub fn encode_with(def: &TypeDef, value: &Value) -> crate::Result<Bytes> {
    let mut buf = BytesMut::new();
    lookup(def.id()).binary(value, def, &mut buf)?;
    Ok(buf.freeze())
}

/// Build a typed [`Cell`] for a possibly absent value.
///
/// Protocol convention: an absent value yields no typed object at all,
/// hence `None` rather than a cell holding a null.
pub fn materialize(def: TypeDef, value: Option<Value>) -> Option<Cell> {
    Some(Cell::new(def, value?))
}

/// Holder of a decoded value, its encoded binary form, or both, plus the
/// type definition needed to convert between them.
///
/// Conversion is lazy and memoized: decoding happens only when the value is
/// read, encoding only when the binary is read, and neither is recomputed
/// from the same source afterward. A cell is built and discarded per
/// message, conversion takes `&mut self` and single-owner use is assumed.
#[derive(Debug, Clone)]
pub struct Cell {
    def: TypeDef,
    value: Option<Value>,
    binary: Option<Bytes>,
}

impl Cell {
    /// Cell holding a decoded value.
    pub fn new(def: TypeDef, value: Value) -> Cell {
        Cell { def, value: Some(value), binary: None }
    }

    /// Cell hydrated from a wire read.
    pub fn from_binary(def: TypeDef, binary: Bytes) -> Cell {
        Cell { def, value: None, binary: Some(binary) }
    }

    /// Attach or replace the binary form.
    ///
    /// A previously memoized value is invalidated, it may have been derived
    /// from different bytes and must not drift from the new binary.
    pub fn with_binary(mut self, binary: Bytes) -> Cell {
        self.value = None;
        self.binary = Some(binary);
        self
    }

    /// The type definition this cell converts under.
    pub fn definition(&self) -> &TypeDef {
        &self.def
    }

    /// The encoded binary form, converting and memoizing on first read.
    pub fn encode(&mut self) -> crate::Result<&Bytes> {
        if self.binary.is_none() {
            let Some(value) = &self.value else {
                return Err(EncodeError::Empty.into());
            };
            verbose!("encode {:?} cell", self.def.id());
            self.binary = Some(encode_with(&self.def, value)?);
        }
        match &self.binary {
            Some(binary) => Ok(binary),
            None => Err(EncodeError::Empty.into()),
        }
    }

    /// The decoded value, converting and memoizing on first read.
    pub fn decode(&mut self) -> crate::Result<&Value> {
        if self.value.is_none() {
            let Some(binary) = &self.binary else {
                return Err(DecodeError::Empty.into());
            };
            verbose!("decode {:?} cell", self.def.id());
            let mut body = binary.clone();
            let value = lookup(self.def.id()).parse(&mut body, &self.def)?;
            if !body.is_empty() {
                return Err(DecodeError::Trailing(body.len(), self.def.id()).into());
            }
            self.value = Some(value);
        }
        match &self.value {
            Some(value) => Ok(value),
            None => Err(DecodeError::Empty.into()),
        }
    }

    /// Text rendition of the decoded value for logging and debugging.
    ///
    /// Decodes and memoizes like [`decode`][Cell::decode], nothing else.
    pub fn display(&mut self) -> crate::Result<String> {
        Ok(self.decode()?.to_string())
    }
}
