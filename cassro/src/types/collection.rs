//! Composite codecs: list, set, map, tuple and udt.
//!
//! Every constituent field is framed as `[int bytes]` and encoded by
//! recursively dispatching on its nested definition. A null field is the
//! negative sentinel length, never an omission.
use bytes::{BufMut, Bytes, BytesMut};

use super::{Codec, TypeDef, TypeId, lookup};
use crate::{
    error::{DecodeError, EncodeError},
    ext::{BufMutExt, BytesExt, UsizeExt},
    value::Value,
};

/// Encode one length-prefixed element under its nested definition.
fn put_element(buf: &mut BytesMut, def: &TypeDef, value: &Value) -> Result<(), EncodeError> {
    if let Value::Null = value {
        buf.put_null_bytes();
        return Ok(());
    }
    let mut element = BytesMut::new();
    lookup(def.id()).binary(value, def, &mut element)?;
    buf.put_int_bytes(&element);
    Ok(())
}

/// Decode one length-prefixed element under its nested definition.
fn get_element(body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
    let Some(mut raw) = body.get_int_bytes()? else {
        return Ok(Value::Null);
    };
    let value = lookup(def.id()).parse(&mut raw, def)?;
    if !raw.is_empty() {
        return Err(DecodeError::Trailing(raw.len(), def.id()));
    }
    Ok(value)
}

/// 4-byte element count followed by length-prefixed elements,
/// serves list and set.
pub(super) struct Collection;

impl Codec for Collection {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let element = def.element().ok_or(EncodeError::MissingDefinition(def.id()))?;
        let items = match value {
            Value::List(items) | Value::Set(items) => items,
            other => return Err(EncodeError::mismatch(def.id(), other)),
        };
        buf.put_i32(items.len().to_i32());
        for item in items {
            put_element(buf, element, item)?;
        }
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        let element = def.element().ok_or(DecodeError::MissingDefinition(def.id()))?;
        let count = body.get_int4()?;
        if count < 0 {
            return Err(DecodeError::Count(def.id()));
        }
        let mut items = Vec::with_capacity((count as usize).min(body.len()));
        for _ in 0..count {
            items.push(get_element(body, element)?);
        }
        Ok(match def.id() {
            TypeId::Set => Value::Set(items),
            _ => Value::List(items),
        })
    }
}

/// 4-byte pair count followed by alternating length-prefixed keys and values.
pub(super) struct Map;

impl Codec for Map {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let (key, val) = def.pair().ok_or(EncodeError::MissingDefinition(def.id()))?;
        let Value::Map(pairs) = value else {
            return Err(EncodeError::mismatch(TypeId::Map, value));
        };
        buf.put_i32(pairs.len().to_i32());
        for (k, v) in pairs {
            put_element(buf, key, k)?;
            put_element(buf, val, v)?;
        }
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        let (key, val) = def.pair().ok_or(DecodeError::MissingDefinition(def.id()))?;
        let count = body.get_int4()?;
        if count < 0 {
            return Err(DecodeError::Count(TypeId::Map));
        }
        let mut pairs = Vec::with_capacity((count as usize).min(body.len()));
        for _ in 0..count {
            let k = get_element(body, key)?;
            let v = get_element(body, val)?;
            pairs.push((k, v));
        }
        Ok(Value::Map(pairs))
    }
}

/// Length-prefixed fields in positional order, no count prefix.
pub(super) struct Tuple;

impl Codec for Tuple {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let fields = def.fields().ok_or(EncodeError::MissingDefinition(def.id()))?;
        let Value::Tuple(items) = value else {
            return Err(EncodeError::mismatch(TypeId::Tuple, value));
        };
        if items.len() != fields.len() {
            return Err(EncodeError::Arity {
                id: TypeId::Tuple,
                expected: fields.len(),
                got: items.len(),
            });
        }
        for (field, item) in fields.iter().zip(items) {
            put_element(buf, field, item)?;
        }
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        let fields = def.fields().ok_or(DecodeError::MissingDefinition(def.id()))?;
        let mut items = Vec::with_capacity(fields.len());
        for field in fields {
            items.push(get_element(body, field)?);
        }
        Ok(Value::Tuple(items))
    }
}

/// Length-prefixed fields in declared order, resolved by field name.
pub(super) struct Udt;

impl Codec for Udt {
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let fields = def.named_fields().ok_or(EncodeError::MissingDefinition(def.id()))?;
        let Value::Udt(items) = value else {
            return Err(EncodeError::mismatch(TypeId::Udt, value));
        };
        if items.len() != fields.len() {
            return Err(EncodeError::Arity {
                id: TypeId::Udt,
                expected: fields.len(),
                got: items.len(),
            });
        }
        for (name, field) in fields {
            let item = items
                .iter()
                .find_map(|(n, v)| (n == name).then_some(v))
                .ok_or_else(|| EncodeError::MissingField(name.clone()))?;
            put_element(buf, field, item)?;
        }
        Ok(())
    }

    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError> {
        let fields = def.named_fields().ok_or(DecodeError::MissingDefinition(def.id()))?;
        let mut items = Vec::with_capacity(fields.len());
        for (name, field) in fields {
            items.push((name.clone(), get_element(body, field)?));
        }
        Ok(Value::Udt(items))
    }
}

#[cfg(test)]
mod test {
    use super::super::lookup;
    use super::*;

    fn encode(def: &TypeDef, value: &Value) -> Bytes {
        let mut buf = BytesMut::new();
        lookup(def.id()).binary(value, def, &mut buf).unwrap();
        buf.freeze()
    }

    fn decode(def: &TypeDef, mut body: Bytes) -> Value {
        let value = lookup(def.id()).parse(&mut body, def).unwrap();
        assert!(body.is_empty(), "codec left {} bytes", body.len());
        value
    }

    fn varchar(s: &str) -> Value {
        Value::Varchar(s.into())
    }

    #[test]
    fn list_of_varchar_wire_layout() {
        // count=2, then each element length-prefixed
        let def = TypeDef::list(TypeDef::Simple(TypeId::Varchar));
        let value = Value::List(vec![varchar("a"), varchar("bb")]);
        let bytes = encode(&def, &value);
        assert_eq!(
            &bytes[..],
            b"\x00\x00\x00\x02\x00\x00\x00\x01a\x00\x00\x00\x02bb",
        );
        assert_eq!(decode(&def, bytes), value);
    }

    #[test]
    fn empty_list() {
        let def = TypeDef::list(TypeDef::Simple(TypeId::Int));
        let bytes = encode(&def, &Value::List(vec![]));
        assert_eq!(&bytes[..], b"\x00\x00\x00\x00");
        assert_eq!(decode(&def, bytes), Value::List(vec![]));
    }

    #[test]
    fn set_roundtrip() {
        let def = TypeDef::set(TypeDef::Simple(TypeId::Int));
        let value = Value::Set(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(decode(&def, encode(&def, &value)), value);
    }

    #[test]
    fn map_roundtrip() {
        let def = TypeDef::map(
            TypeDef::Simple(TypeId::Varchar),
            TypeDef::Simple(TypeId::Bigint),
        );
        let value = Value::Map(vec![
            (varchar("k1"), Value::Bigint(10)),
            (varchar("k2"), Value::Null),
        ]);
        assert_eq!(decode(&def, encode(&def, &value)), value);
    }

    #[test]
    fn tuple_with_null_field() {
        let def = TypeDef::tuple(vec![
            TypeDef::Simple(TypeId::Int),
            TypeDef::Simple(TypeId::Varchar),
        ]);
        let value = Value::Tuple(vec![Value::Int(7), Value::Null]);
        let bytes = encode(&def, &value);
        // null field is the -1 sentinel, not an omission
        assert_eq!(&bytes[..], b"\x00\x00\x00\x04\x00\x00\x00\x07\xff\xff\xff\xff");
        assert_eq!(decode(&def, bytes), value);
    }

    #[test]
    fn tuple_arity_enforced() {
        let def = TypeDef::tuple(vec![
            TypeDef::Simple(TypeId::Int),
            TypeDef::Simple(TypeId::Varchar),
        ]);
        let mut buf = BytesMut::new();
        let err = lookup(TypeId::Tuple)
            .binary(&Value::Tuple(vec![Value::Int(1)]), &def, &mut buf)
            .unwrap_err();
        assert!(matches!(err, EncodeError::Arity { expected: 2, got: 1, .. }));
    }

    #[test]
    fn udt_by_declared_order() {
        let def = TypeDef::Udt(vec![
            ("id".into(), TypeDef::Simple(TypeId::Int)),
            ("name".into(), TypeDef::Simple(TypeId::Varchar)),
        ]);
        // value fields out of declared order still encode in declared order
        let value = Value::Udt(vec![
            ("name".into(), varchar("n")),
            ("id".into(), Value::Int(3)),
        ]);
        let bytes = encode(&def, &value);
        assert_eq!(&bytes[..], b"\x00\x00\x00\x04\x00\x00\x00\x03\x00\x00\x00\x01n");
        assert_eq!(
            decode(&def, bytes),
            Value::Udt(vec![("id".into(), Value::Int(3)), ("name".into(), varchar("n"))]),
        );
    }

    #[test]
    fn udt_missing_field() {
        let def = TypeDef::Udt(vec![("id".into(), TypeDef::Simple(TypeId::Int))]);
        let mut buf = BytesMut::new();
        let err = lookup(TypeId::Udt)
            .binary(&Value::Udt(vec![("other".into(), Value::Int(1))]), &def, &mut buf)
            .unwrap_err();
        assert!(matches!(err, EncodeError::MissingField(name) if name == "id"));
    }

    #[test]
    fn three_levels_deep() {
        // list<map<varchar, tuple<int, boolean>>>
        let def = TypeDef::list(TypeDef::map(
            TypeDef::Simple(TypeId::Varchar),
            TypeDef::tuple(vec![
                TypeDef::Simple(TypeId::Int),
                TypeDef::Simple(TypeId::Boolean),
            ]),
        ));
        let value = Value::List(vec![
            Value::Map(vec![
                (varchar("a"), Value::Tuple(vec![Value::Int(1), Value::Boolean(true)])),
                (varchar("b"), Value::Tuple(vec![Value::Int(-1), Value::Null])),
            ]),
            Value::Map(vec![]),
        ]);
        assert_eq!(decode(&def, encode(&def, &value)), value);
    }

    #[test]
    fn missing_nested_definition() {
        // composite identifier without a nested definition fails fast
        let def = TypeDef::Simple(TypeId::List);
        let mut buf = BytesMut::new();
        let err = lookup(TypeId::List)
            .binary(&Value::List(vec![]), &def, &mut buf)
            .unwrap_err();
        assert!(matches!(err, EncodeError::MissingDefinition(TypeId::List)));

        let mut body = Bytes::from_static(b"\x00\x00\x00\x00");
        let err = lookup(TypeId::List).parse(&mut body, &def).unwrap_err();
        assert!(matches!(err, DecodeError::MissingDefinition(TypeId::List)));

        let map = TypeDef::Composite(TypeId::Map, vec![TypeDef::Simple(TypeId::Int)]);
        let mut body = Bytes::from_static(b"\x00\x00\x00\x00");
        let err = lookup(TypeId::Map).parse(&mut body, &map).unwrap_err();
        assert!(matches!(err, DecodeError::MissingDefinition(TypeId::Map)));
    }

    #[test]
    fn element_length_overrun() {
        let def = TypeDef::list(TypeDef::Simple(TypeId::Varchar));
        // count=1, element declares 5 bytes but only 2 remain
        let mut body = Bytes::from_static(b"\x00\x00\x00\x01\x00\x00\x00\x05ab");
        let err = lookup(TypeId::List).parse(&mut body, &def).unwrap_err();
        assert!(matches!(err, DecodeError::Short { need: 5, have: 2 }));
    }

    #[test]
    fn element_trailing_bytes() {
        // element slice longer than the fixed width int consumes
        let def = TypeDef::list(TypeDef::Simple(TypeId::Int));
        let mut body = Bytes::from_static(b"\x00\x00\x00\x01\x00\x00\x00\x05\x00\x00\x00\x01\xaa");
        let err = lookup(TypeId::List).parse(&mut body, &def).unwrap_err();
        assert!(matches!(err, DecodeError::Trailing(1, TypeId::Int)));
    }
}
