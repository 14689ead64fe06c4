//! Decoded domain values.
use std::net::IpAddr;

use bytes::Bytes;

use crate::ext::FmtExt;

/// A decoded domain value for one protocol type.
///
/// `Null` stands for an absent field inside a composite, on the wire it is
/// a negative sentinel length rather than an omission.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Ascii(String),
    Varchar(String),
    /// `bigint` 8-byte signed integer.
    Bigint(i64),
    /// `counter` column value, same wire layout as bigint.
    Counter(i64),
    /// Milliseconds since the unix epoch, same wire layout as bigint.
    Timestamp(i64),
    /// `int` 4-byte signed integer.
    Int(i32),
    Boolean(bool),
    Double(f64),
    Float(f32),
    /// Arbitrary precision decimal: `unscaled * 10^(-scale)`,
    /// unscaled in big-endian two's complement.
    Decimal { scale: i32, unscaled: Vec<u8> },
    /// Arbitrary precision integer, big-endian two's complement.
    Varint(Vec<u8>),
    Uuid(uuid::Uuid),
    Timeuuid(uuid::Uuid),
    Inet(IpAddr),
    Blob(Bytes),
    /// Opaque payload of a custom type, kept as raw bytes.
    Custom(Bytes),
    List(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value pairs in wire order.
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    /// Named fields in declared order.
    Udt(Vec<(String, Value)>),
}

impl Value {
    /// Build a minimal big-endian two's complement varint from an integer.
    pub fn varint(n: i64) -> Value {
        let bytes = n.to_be_bytes();
        let mut start = 0;
        // strip redundant sign bytes, keeping the sign bit intact
        while start + 1 < bytes.len() {
            let (lead, next) = (bytes[start], bytes[start + 1]);
            let redundant = (lead == 0x00 && next & 0x80 == 0)
                || (lead == 0xFF && next & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        Value::Varint(bytes[start..].to_vec())
    }

    /// Short name of the value shape, used in error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Ascii(_) => "ascii",
            Value::Varchar(_) => "varchar",
            Value::Bigint(_) => "bigint",
            Value::Counter(_) => "counter",
            Value::Timestamp(_) => "timestamp",
            Value::Int(_) => "int",
            Value::Boolean(_) => "boolean",
            Value::Double(_) => "double",
            Value::Float(_) => "float",
            Value::Decimal { .. } => "decimal",
            Value::Varint(_) => "varint",
            Value::Uuid(_) => "uuid",
            Value::Timeuuid(_) => "timeuuid",
            Value::Inet(_) => "inet",
            Value::Blob(_) => "blob",
            Value::Custom(_) => "custom",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Udt(_) => "udt",
        }
    }
}

fn write_seq(
    f: &mut std::fmt::Formatter<'_>,
    items: &[Value],
    open: &str,
    close: &str,
) -> std::fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Ascii(s) | Value::Varchar(s) => f.write_str(s),
            Value::Bigint(n) | Value::Counter(n) | Value::Timestamp(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Decimal { scale, unscaled } => {
                write!(f, "0x{}e-{scale}", unscaled.hex())
            }
            Value::Varint(raw) => write!(f, "0x{}", raw.hex()),
            Value::Uuid(u) | Value::Timeuuid(u) => write!(f, "{u}"),
            Value::Inet(addr) => write!(f, "{addr}"),
            Value::Blob(raw) | Value::Custom(raw) => write!(f, "0x{}", raw.hex()),
            Value::List(items) | Value::Set(items) => write_seq(f, items, "[", "]"),
            Value::Tuple(items) => write_seq(f, items, "(", ")"),
            Value::Map(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Udt(fields) => {
                f.write_str("{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn varint_minimal_bytes() {
        assert_eq!(Value::varint(0), Value::Varint(vec![0x00]));
        assert_eq!(Value::varint(1), Value::Varint(vec![0x01]));
        assert_eq!(Value::varint(-1), Value::Varint(vec![0xFF]));
        assert_eq!(Value::varint(128), Value::Varint(vec![0x00, 0x80]));
        assert_eq!(Value::varint(-128), Value::Varint(vec![0x80]));
        assert_eq!(Value::varint(-129), Value::Varint(vec![0xFF, 0x7F]));
        assert_eq!(
            Value::varint(i64::MAX),
            Value::Varint(vec![0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
        );
    }

    #[test]
    fn display_rendition() {
        let value = Value::Map(vec![
            (Value::Varchar("a".into()), Value::Int(1)),
            (Value::Varchar("b".into()), Value::Null),
        ]);
        assert_eq!(value.to_string(), "{a: 1, b: null}");

        let tuple = Value::Tuple(vec![Value::Boolean(true), Value::Bigint(-7)]);
        assert_eq!(tuple.to_string(), "(true, -7)");

        assert_eq!(Value::Blob(b"\x01\xab".as_ref().into()).to_string(), "0x01ab");
    }
}
