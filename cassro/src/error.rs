//! `cassro` error types.
use crate::{types::TypeId, value::Value};

/// A specialized [`Result`] type for `cassro` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A type identifier outside the closed protocol set was looked up.
///
/// Fatal for the message being processed, not for the process.
#[derive(Debug, thiserror::Error)]
#[error("unknown type identifier {0:#06x}")]
pub struct UnknownType(pub u16);

/// A value's runtime shape does not match what its declared type requires.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Composite descriptor lacks its required nested definition.
    #[error("composite type {0:?} requires a nested definition")]
    MissingDefinition(TypeId),

    #[error("cannot encode {value} value as {expected:?}")]
    Mismatch { expected: TypeId, value: &'static str },

    /// Wrong field count for a tuple or udt.
    #[error("{id:?} declares {expected} fields, value carries {got}")]
    Arity { id: TypeId, expected: usize, got: usize },

    #[error("udt value is missing field `{0}`")]
    MissingField(String),

    #[error("ascii value contains non-ascii bytes")]
    NonAscii,

    /// Nothing to encode: the cell holds neither a value nor a binary form.
    #[error("cell holds neither a value nor a binary form")]
    Empty,
}

impl EncodeError {
    pub(crate) fn mismatch(expected: TypeId, value: &Value) -> EncodeError {
        EncodeError::Mismatch { expected, value: value.kind() }
    }
}

/// A byte buffer is malformed for its declared type.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Composite descriptor lacks its required nested definition.
    #[error("composite type {0:?} requires a nested definition")]
    MissingDefinition(TypeId),

    /// Declared length exceeds the remaining buffer.
    #[error("buffer too short: need {need} bytes, {have} remain")]
    Short { need: usize, have: usize },

    #[error("invalid utf-8 payload: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("ascii payload contains non-ascii bytes")]
    NonAscii,

    /// Payload width invalid for a fixed-width type, e.g. a 5-byte uuid.
    #[error("invalid payload length {1} for {0:?}")]
    Length(TypeId, usize),

    #[error("invalid element count for {0:?}")]
    Count(TypeId),

    #[error("{0} trailing bytes after {1:?} payload")]
    Trailing(usize, TypeId),

    /// Unconsumed bytes after a fully parsed message body.
    #[error("{0} trailing bytes after message body")]
    TrailingBody(usize),

    #[error(transparent)]
    UnknownType(#[from] UnknownType),

    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("opcode {0:?} does not identify a response message")]
    UnexpectedOpcode(crate::frame::Opcode),

    /// Nothing to decode: the cell holds neither a value nor a binary form.
    #[error("cell holds neither a value nor a binary form")]
    Empty,
}

/// All possible error from the `cassro` library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UnknownType(#[from] UnknownType),

    #[error("encode: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
}
