//! CQL binary protocol codec
//!
//! Wire-level codec for the Cassandra client protocol: a registry mapping
//! protocol type identifiers to codecs, a lazy memoized value⇄binary cell,
//! and the opcode-tagged request/response envelope. The transport layer is
//! an external collaborator, this crate only exchanges `(opcode, body)`
//! pairs with it.
//!
//! # Examples
//!
//! Encoding a typed value:
//!
//! ```
//! use cassro::{Cell, TypeDef, TypeId, Value};
//!
//! # fn main() -> cassro::Result<()> {
//! let def = TypeDef::list(TypeDef::Simple(TypeId::Varchar));
//! let value = Value::List(vec![
//!     Value::Varchar("a".into()),
//!     Value::Varchar("bb".into()),
//! ]);
//!
//! let mut cell = Cell::new(def, value);
//! let bytes = cell.encode()?;
//! assert_eq!(&bytes[..], b"\x00\x00\x00\x02\x00\x00\x00\x01a\x00\x00\x00\x02bb");
//! # Ok(())
//! # }
//! ```
//!
//! Building a request body for the transport:
//!
//! ```
//! use cassro::{Request, request::Prepare};
//!
//! let prepare = Prepare::new("SELECT 1");
//! assert_eq!(&prepare.body()[..], b"\x00\x00\x00\x08SELECT 1");
//! ```

mod common;
mod ext;

// Encoding
pub mod types;
mod value;
mod cell;

// Envelope
pub mod frame;
pub mod request;
pub mod response;

mod error;

pub use cell::{Cell, encode_with, materialize};
pub use frame::{Opcode, Request, Response};
pub use types::{Codec, TypeDef, TypeId, lookup, lookup_code};
pub use value::Value;

pub use error::{DecodeError, EncodeError, Error, Result, UnknownType};
