//! Protocol type identifiers, type definitions and the codec registry.
//!
//! The identifier set is closed and versioned by protocol revision, the
//! dispatch from identifier to codec is a match over the enumeration, which
//! makes the registry an immutable table checked at compile time and safe
//! for concurrent lookup without locking.
use bytes::{Bytes, BytesMut};

use crate::{
    error::{DecodeError, EncodeError, UnknownType},
    value::Value,
};

mod collection;
mod scalar;

/// CQL protocol type identifier, a fixed 16-bit code.
///
/// `Text` is a deprecated synonym of `Varchar` since protocol v3, both
/// identifiers route to the same codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TypeId {
    Custom = 0x0000,
    Ascii = 0x0001,
    Bigint = 0x0002,
    Blob = 0x0003,
    Boolean = 0x0004,
    Counter = 0x0005,
    Decimal = 0x0006,
    Double = 0x0007,
    Float = 0x0008,
    Int = 0x0009,
    /// Deprecated in protocol v3, alias of [`Varchar`][TypeId::Varchar].
    Text = 0x000A,
    Timestamp = 0x000B,
    Uuid = 0x000C,
    Varchar = 0x000D,
    Varint = 0x000E,
    Timeuuid = 0x000F,
    Inet = 0x0010,
    List = 0x0020,
    Map = 0x0021,
    Set = 0x0022,
    Udt = 0x0030,
    Tuple = 0x0031,
}

impl TypeId {
    /// Resolve an on-wire 16-bit code into the closed identifier set.
    pub fn from_code(code: u16) -> Result<TypeId, UnknownType> {
        Ok(match code {
            0x0000 => Self::Custom,
            0x0001 => Self::Ascii,
            0x0002 => Self::Bigint,
            0x0003 => Self::Blob,
            0x0004 => Self::Boolean,
            0x0005 => Self::Counter,
            0x0006 => Self::Decimal,
            0x0007 => Self::Double,
            0x0008 => Self::Float,
            0x0009 => Self::Int,
            0x000A => Self::Text,
            0x000B => Self::Timestamp,
            0x000C => Self::Uuid,
            0x000D => Self::Varchar,
            0x000E => Self::Varint,
            0x000F => Self::Timeuuid,
            0x0010 => Self::Inet,
            0x0020 => Self::List,
            0x0021 => Self::Map,
            0x0022 => Self::Set,
            0x0030 => Self::Udt,
            0x0031 => Self::Tuple,
            code => return Err(UnknownType(code)),
        })
    }

    /// The on-wire 16-bit code.
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// A possibly nested type definition, as handed over by schema metadata.
///
/// Scalar types are a bare identifier. A list or set carries one nested
/// definition, a map carries two, a tuple an ordered sequence, a udt an
/// ordered sequence of named fields. The nested arity is enforced at
/// encode/decode time and never silently defaulted.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// A bare identifier.
    Simple(TypeId),
    /// A composite descriptor with nested element definitions.
    Composite(TypeId, Vec<TypeDef>),
    /// A user defined type, fields in declared order.
    Udt(Vec<(String, TypeDef)>),
}

impl TypeDef {
    /// Shorthand for a list definition.
    pub fn list(element: TypeDef) -> TypeDef {
        TypeDef::Composite(TypeId::List, vec![element])
    }

    /// Shorthand for a set definition.
    pub fn set(element: TypeDef) -> TypeDef {
        TypeDef::Composite(TypeId::Set, vec![element])
    }

    /// Shorthand for a map definition.
    pub fn map(key: TypeDef, value: TypeDef) -> TypeDef {
        TypeDef::Composite(TypeId::Map, vec![key, value])
    }

    /// Shorthand for a tuple definition.
    pub fn tuple(fields: Vec<TypeDef>) -> TypeDef {
        TypeDef::Composite(TypeId::Tuple, fields)
    }

    /// The identifier this definition declares.
    pub fn id(&self) -> TypeId {
        match self {
            TypeDef::Simple(id) => *id,
            TypeDef::Composite(id, _) => *id,
            TypeDef::Udt(_) => TypeId::Udt,
        }
    }

    /// The single nested element definition of a list or set.
    pub(crate) fn element(&self) -> Option<&TypeDef> {
        match self {
            TypeDef::Composite(_, inner) if inner.len() == 1 => Some(&inner[0]),
            _ => None,
        }
    }

    /// The key and value definitions of a map.
    pub(crate) fn pair(&self) -> Option<(&TypeDef, &TypeDef)> {
        match self {
            TypeDef::Composite(_, inner) if inner.len() == 2 => Some((&inner[0], &inner[1])),
            _ => None,
        }
    }

    /// The positional field definitions of a tuple.
    pub(crate) fn fields(&self) -> Option<&[TypeDef]> {
        match self {
            TypeDef::Composite(_, inner) if !inner.is_empty() => Some(inner),
            _ => None,
        }
    }

    /// The named field definitions of a udt.
    pub(crate) fn named_fields(&self) -> Option<&[(String, TypeDef)]> {
        match self {
            TypeDef::Udt(fields) if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

/// Bidirectional conversion between a domain value and its exact wire bytes
/// for one protocol type.
///
/// Scalar codecs ignore the definition, composite codecs use it recursively
/// for their nested element types. All operations are synchronous pure
/// transformations, implementations hold no state.
pub trait Codec: Sync {
    /// Encode `value` into `buf`.
    fn binary(&self, value: &Value, def: &TypeDef, buf: &mut BytesMut) -> Result<(), EncodeError>;

    /// Parse a value out of `body`, consuming the bytes it needs.
    fn parse(&self, body: &mut Bytes, def: &TypeDef) -> Result<Value, DecodeError>;
}

/// Resolve the codec responsible for a type identifier.
///
/// Total over [`TypeId`], identifiers sharing a wire layout route to the
/// same codec.
pub fn lookup(id: TypeId) -> &'static dyn Codec {
    match id {
        TypeId::Ascii => &scalar::Ascii,
        TypeId::Varchar | TypeId::Text => &scalar::Varchar,
        TypeId::Bigint | TypeId::Counter | TypeId::Timestamp => &scalar::Long,
        TypeId::Int => &scalar::Int,
        TypeId::Boolean => &scalar::Boolean,
        TypeId::Double => &scalar::Double,
        TypeId::Float => &scalar::Float,
        TypeId::Decimal => &scalar::Decimal,
        TypeId::Varint => &scalar::Varint,
        TypeId::Uuid | TypeId::Timeuuid => &scalar::Uuid,
        TypeId::Inet => &scalar::Inet,
        TypeId::Blob | TypeId::Custom => &scalar::Blob,
        TypeId::List | TypeId::Set => &collection::Collection,
        TypeId::Map => &collection::Map,
        TypeId::Tuple => &collection::Tuple,
        TypeId::Udt => &collection::Udt,
    }
}

/// Resolve the codec for a raw on-wire 16-bit type code.
pub fn lookup_code(code: u16) -> Result<&'static dyn Codec, UnknownType> {
    Ok(lookup(TypeId::from_code(code)?))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn closed_identifier_set() {
        for code in [
            0x0000, 0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0006, 0x0007, 0x0008, 0x0009,
            0x000A, 0x000B, 0x000C, 0x000D, 0x000E, 0x000F, 0x0010, 0x0020, 0x0021, 0x0022,
            0x0030, 0x0031,
        ] {
            let id = TypeId::from_code(code).unwrap();
            assert_eq!(id.code(), code);
        }
    }

    #[test]
    fn unknown_identifier() {
        let err = TypeId::from_code(0x0011).unwrap_err();
        assert_eq!(err.0, 0x0011);
        assert!(TypeId::from_code(0x0023).is_err());
        assert!(lookup_code(0xBEEF).is_err());
    }

    #[test]
    fn definition_arity() {
        let list = TypeDef::list(TypeDef::Simple(TypeId::Int));
        assert!(list.element().is_some());
        assert!(list.pair().is_none());

        // a composite descriptor with no nested definition is invalid
        let bare = TypeDef::Composite(TypeId::List, vec![]);
        assert!(bare.element().is_none());
        assert!(TypeDef::Simple(TypeId::Map).pair().is_none());
        assert!(TypeDef::Composite(TypeId::Tuple, vec![]).fields().is_none());
        assert!(TypeDef::Udt(vec![]).named_fields().is_none());
    }
}
