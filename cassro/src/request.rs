//! Concrete request messages.
use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    ext::{BufMutExt, UsizeExt},
    frame::{Opcode, Request},
};

/// OPTIONS
///
/// Asks the server which STARTUP options are supported. The body is empty
/// and the server answers with a SUPPORTED message.
#[derive(Debug, Default)]
pub struct Options;

impl Request for Options {
    const OPCODE: Opcode = Opcode::Options;

    fn encode(&self, _: &mut BytesMut) {}
}

/// STARTUP
///
/// Initializes the connection. The body is a string map of options, the
/// mandatory one being the CQL version.
#[derive(Debug)]
pub struct Startup {
    options: Vec<(String, String)>,
}

impl Startup {
    pub fn new() -> Startup {
        Startup { options: vec![("CQL_VERSION".into(), "3.0.0".into())] }
    }

    /// Add a startup option, e.g. `COMPRESSION`.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Startup {
        self.options.push((key.into(), value.into()));
        self
    }
}

impl Default for Startup {
    fn default() -> Startup {
        Startup::new()
    }
}

impl Request for Startup {
    const OPCODE: Opcode = Opcode::Startup;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.options.len().to_u16());
        for (key, value) in &self.options {
            buf.put_string(key);
            buf.put_string(value);
        }
    }
}

/// PREPARE
///
/// Prepares a query for later execution. The body is the query text as a
/// `[long string]`.
#[derive(Debug)]
pub struct Prepare {
    query: String,
}

impl Prepare {
    pub fn new(query: impl Into<String>) -> Prepare {
        Prepare { query: query.into() }
    }
}

impl Request for Prepare {
    const OPCODE: Opcode = Opcode::Prepare;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_long_string(&self.query);
    }
}

/// AUTH_RESPONSE
///
/// Answers an authentication challenge. The body is a single `[int bytes]`
/// token whose content depends on the negotiated mechanism, a null token
/// is allowed.
#[derive(Debug)]
pub struct AuthResponse {
    token: Option<Bytes>,
}

impl AuthResponse {
    pub fn new(token: impl Into<Bytes>) -> AuthResponse {
        AuthResponse { token: Some(token.into()) }
    }

    pub fn empty() -> AuthResponse {
        AuthResponse { token: None }
    }
}

impl Request for AuthResponse {
    const OPCODE: Opcode = Opcode::AuthResponse;

    fn encode(&self, buf: &mut BytesMut) {
        match &self.token {
            Some(token) => buf.put_int_bytes(token),
            None => buf.put_null_bytes(),
        }
    }
}
