//! Scalar codecs.
//!
//! Fixed-width numbers honor their exact widths in big-endian byte order,
//! variable-length payloads consume the whole body handed to them, the
//! length framing belongs to the caller.
use std::net::IpAddr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Codec, TypeDef, TypeId};
use crate::{
    error::{DecodeError, EncodeError},
    ext::BytesExt,
    value::Value,
};

/// ascii: raw bytes, restricted to the 7-bit range on both directions.
pub(super) struct Ascii;

impl Codec for Ascii {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let s = match value {
            Value::Ascii(s) | Value::Varchar(s) => s,
            other => return Err(EncodeError::mismatch(TypeId::Ascii, other)),
        };
        if !s.is_ascii() {
            return Err(EncodeError::NonAscii);
        }
        buf.put_slice(s.as_bytes());
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        let raw = body.split_to(body.len());
        if !raw.is_ascii() {
            return Err(DecodeError::NonAscii);
        }
        Ok(Value::Ascii(String::from_utf8_lossy(&raw).into_owned()))
    }
}

/// varchar: raw UTF-8 bytes. Also serves the deprecated text identifier.
pub(super) struct Varchar;

impl Codec for Varchar {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let s = match value {
            Value::Varchar(s) | Value::Ascii(s) => s,
            other => return Err(EncodeError::mismatch(TypeId::Varchar, other)),
        };
        buf.put_slice(s.as_bytes());
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        let raw = body.split_to(body.len());
        let s = String::from_utf8(raw.into()).map_err(|e| DecodeError::Utf8(e.utf8_error()))?;
        Ok(Value::Varchar(s))
    }
}

/// 8-byte signed integer, serves bigint, counter and timestamp.
pub(super) struct Long;

impl Codec for Long {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let n = match value {
            Value::Bigint(n) | Value::Counter(n) | Value::Timestamp(n) => *n,
            other => return Err(EncodeError::mismatch(def.id(), other)),
        };
        buf.put_i64(n);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        body.ensure_remaining(8)?;
        let n = body.get_i64();
        Ok(match def.id() {
            TypeId::Counter => Value::Counter(n),
            TypeId::Timestamp => Value::Timestamp(n),
            _ => Value::Bigint(n),
        })
    }
}

/// 4-byte signed integer.
pub(super) struct Int;

impl Codec for Int {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Int(n) = value else {
            return Err(EncodeError::mismatch(TypeId::Int, value));
        };
        buf.put_i32(*n);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        body.ensure_remaining(4)?;
        Ok(Value::Int(body.get_i32()))
    }
}

/// Single byte, zero is false, anything else is true.
pub(super) struct Boolean;

impl Codec for Boolean {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Boolean(b) = value else {
            return Err(EncodeError::mismatch(TypeId::Boolean, value));
        };
        buf.put_u8(*b as u8);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        body.ensure_remaining(1)?;
        Ok(Value::Boolean(body.get_u8() != 0))
    }
}

/// 8-byte IEEE 754 floating point.
pub(super) struct Double;

impl Codec for Double {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Double(n) = value else {
            return Err(EncodeError::mismatch(TypeId::Double, value));
        };
        buf.put_f64(*n);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        body.ensure_remaining(8)?;
        Ok(Value::Double(body.get_f64()))
    }
}

/// 4-byte IEEE 754 floating point.
pub(super) struct Float;

impl Codec for Float {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Float(n) = value else {
            return Err(EncodeError::mismatch(TypeId::Float, value));
        };
        buf.put_f32(*n);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        body.ensure_remaining(4)?;
        Ok(Value::Float(body.get_f32()))
    }
}

/// 4-byte scale followed by an unscaled big-endian two's complement integer.
pub(super) struct Decimal;

impl Codec for Decimal {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Decimal { scale, unscaled } = value else {
            return Err(EncodeError::mismatch(TypeId::Decimal, value));
        };
        buf.put_i32(*scale);
        buf.put_slice(unscaled);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        let scale = body.get_int4()?;
        let unscaled = body.split_to(body.len()).to_vec();
        Ok(Value::Decimal { scale, unscaled })
    }
}

/// Big-endian two's complement integer of arbitrary width.
pub(super) struct Varint;

impl Codec for Varint {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Varint(raw) = value else {
            return Err(EncodeError::mismatch(TypeId::Varint, value));
        };
        buf.put_slice(raw);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        if body.is_empty() {
            return Err(DecodeError::Length(TypeId::Varint, 0));
        }
        Ok(Value::Varint(body.split_to(body.len()).to_vec()))
    }
}

/// 16 raw bytes, serves uuid and timeuuid.
pub(super) struct Uuid;

impl Codec for Uuid {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let u = match value {
            Value::Uuid(u) | Value::Timeuuid(u) => u,
            other => return Err(EncodeError::mismatch(def.id(), other)),
        };
        buf.put_slice(u.as_bytes());
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        if body.len() != 16 {
            return Err(DecodeError::Length(def.id(), body.len()));
        }
        let u = uuid::Uuid::from_slice(&body[..])
            .map_err(|_| DecodeError::Length(def.id(), body.len()))?;
        body.advance(16);
        Ok(match def.id() {
            TypeId::Timeuuid => Value::Timeuuid(u),
            _ => Value::Uuid(u),
        })
    }
}

/// 4 or 16 raw address bytes.
pub(super) struct Inet;

impl Codec for Inet {
    fn binary(&self, value: &Value, _: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Value::Inet(addr) = value else {
            return Err(EncodeError::mismatch(TypeId::Inet, value));
        };
        match addr {
            IpAddr::V4(v4) => buf.put_slice(&v4.octets()),
            IpAddr::V6(v6) => buf.put_slice(&v6.octets()),
        }
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, _: &TypeDef) -> Result<Value, DecodeError> {
        let addr = match body.len() {
            4 => {
                let mut octets = [0u8; 4];
                body.copy_to_slice(&mut octets);
                IpAddr::from(octets)
            }
            16 => {
                let mut octets = [0u8; 16];
                body.copy_to_slice(&mut octets);
                IpAddr::from(octets)
            }
            len => return Err(DecodeError::Length(TypeId::Inet, len)),
        };
        Ok(Value::Inet(addr))
    }
}

/// Raw opaque bytes, serves blob and custom.
pub(super) struct Blob;

impl Codec for Blob {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let raw = match value {
            Value::Blob(raw) | Value::Custom(raw) => raw,
            other => return Err(EncodeError::mismatch(def.id(), other)),
        };
        buf.put_slice(raw);
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        let raw = body.split_to(body.len());
        Ok(match def.id() {
            TypeId::Custom => Value::Custom(raw),
            _ => Value::Blob(raw),
        })
    }
}
