//! Concrete response messages and the inbound demultiplexer.
use bytes::Bytes;

use crate::{
    common::verbose,
    error::DecodeError,
    ext::BytesExt,
    frame::{Opcode, Response},
    value::Value,
};

/// READY
///
/// The server is ready to process queries, sent after STARTUP when no
/// authentication is required or once authentication completed. The body
/// is empty by protocol contract, no typed payload is carried.
#[derive(Debug)]
pub struct Ready;

impl Response for Ready {
    const OPCODE: Opcode = Opcode::Ready;

    fn from_body(_: Bytes) -> Ready {
        Ready
    }
}

impl Ready {
    pub fn data(&self) -> Option<Value> {
        None
    }
}

/// AUTH_SUCCESS
///
/// Authentication concluded successfully, no typed payload is carried.
#[derive(Debug)]
pub struct AuthSuccess;

impl Response for AuthSuccess {
    const OPCODE: Opcode = Opcode::AuthSuccess;

    fn from_body(_: Bytes) -> AuthSuccess {
        AuthSuccess
    }
}

impl AuthSuccess {
    pub fn data(&self) -> Option<Value> {
        None
    }
}

/// AUTHENTICATE
///
/// The server requires authentication. The body carries a single big-endian
/// short code the external auth negotiator interprets.
#[derive(Debug)]
pub struct Authenticate {
    body: Bytes,
    mechanism: Option<u16>,
}

impl Response for Authenticate {
    const OPCODE: Opcode = Opcode::Authenticate;

    fn from_body(body: Bytes) -> Authenticate {
        Authenticate { body, mechanism: None }
    }
}

impl Authenticate {
    /// The mechanism code, parsed lazily and memoized.
    pub fn mechanism(&mut self) -> Result<u16, DecodeError> {
        if let Some(mechanism) = self.mechanism {
            return Ok(mechanism);
        }
        let mut body = self.body.clone();
        let mechanism = body.get_short()?;
        self.mechanism = Some(mechanism);
        Ok(mechanism)
    }
}

/// SUPPORTED
///
/// Answer to an OPTIONS request. The body is a string multimap of the
/// startup options the server supports.
#[derive(Debug)]
pub struct Supported {
    body: Bytes,
    options: Option<Vec<(String, Vec<String>)>>,
}

impl Response for Supported {
    const OPCODE: Opcode = Opcode::Supported;

    fn from_body(body: Bytes) -> Supported {
        Supported { body, options: None }
    }
}

impl Supported {
    /// The supported options, parsed lazily and memoized.
    pub fn options(&mut self) -> Result<&[(String, Vec<String>)], DecodeError> {
        if self.options.is_none() {
            let mut body = self.body.clone();
            let count = body.get_short()? as usize;
            let mut options = Vec::with_capacity(count);
            for _ in 0..count {
                let key = body.get_string()?;
                let len = body.get_short()? as usize;
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(body.get_string()?);
                }
                options.push((key, values));
            }
            if !body.is_empty() {
                return Err(DecodeError::TrailingBody(body.len()));
            }
            self.options = Some(options);
        }
        Ok(self.options.as_deref().unwrap_or_default())
    }
}

/// A demultiplexed inbound message.
///
/// The transport strips the frame header and hands the opcode and raw body
/// here, the single tagged entry point for everything the server sends.
#[derive(Debug)]
pub enum Incoming {
    Ready(Ready),
    Authenticate(Authenticate),
    AuthSuccess(AuthSuccess),
    Supported(Supported),
}

impl Incoming {
    /// Match an inbound `(opcode, body)` pair to its response type.
    pub fn decode(opcode: u8, body: Bytes) -> Result<Incoming, DecodeError> {
        let opcode = Opcode::from_code(opcode)?;
        verbose!("incoming {opcode:?}, {} byte body", body.len());
        Ok(match opcode {
            Opcode::Ready => Incoming::Ready(Ready::from_body(body)),
            Opcode::Authenticate => Incoming::Authenticate(Authenticate::from_body(body)),
            Opcode::AuthSuccess => Incoming::AuthSuccess(AuthSuccess::from_body(body)),
            Opcode::Supported => Incoming::Supported(Supported::from_body(body)),
            opcode => return Err(DecodeError::UnexpectedOpcode(opcode)),
        })
    }
}
