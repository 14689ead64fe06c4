//! Opcode-tagged request/response contracts.
//!
//! The core never touches a socket. A request yields `(opcode, body)` for
//! the transport to frame and send, the transport demultiplexes inbound
//! frames and hands `(opcode, body)` back to
//! [`Incoming::decode`][crate::response::Incoming::decode].
use bytes::{Bytes, BytesMut};

use crate::error::DecodeError;

/// Protocol message kind, a fixed 8-bit tag in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Error = 0x00,
    Startup = 0x01,
    Ready = 0x02,
    Authenticate = 0x03,
    Options = 0x05,
    Supported = 0x06,
    Query = 0x07,
    Result = 0x08,
    Prepare = 0x09,
    Execute = 0x0A,
    Register = 0x0B,
    Event = 0x0C,
    Batch = 0x0D,
    AuthChallenge = 0x0E,
    AuthResponse = 0x0F,
    AuthSuccess = 0x10,
}

impl Opcode {
    /// Resolve an on-wire opcode byte.
    pub fn from_code(code: u8) -> Result<Opcode, DecodeError> {
        Ok(match code {
            0x00 => Self::Error,
            0x01 => Self::Startup,
            0x02 => Self::Ready,
            0x03 => Self::Authenticate,
            0x05 => Self::Options,
            0x06 => Self::Supported,
            0x07 => Self::Query,
            0x08 => Self::Result,
            0x09 => Self::Prepare,
            0x0A => Self::Execute,
            0x0B => Self::Register,
            0x0C => Self::Event,
            0x0D => Self::Batch,
            0x0E => Self::AuthChallenge,
            0x0F => Self::AuthResponse,
            0x10 => Self::AuthSuccess,
            code => return Err(DecodeError::UnknownOpcode(code)),
        })
    }

    /// The on-wire opcode byte.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// An outbound protocol message.
///
/// A request is immutable once constructed and can only produce its body,
/// framing and sending belong to the transport.
pub trait Request {
    /// The fixed opcode of this message kind.
    const OPCODE: Opcode;

    /// Write the message body, an empty body writes nothing.
    fn encode(&self, buf: &mut BytesMut);

    /// The assembled body bytes.
    fn body(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// An inbound protocol message, constructed from raw body bytes.
///
/// Construction never parses, payload extraction is lazy per concrete
/// response type and memoized after the first successful read.
pub trait Response: Sized {
    /// The fixed opcode of this message kind.
    const OPCODE: Opcode;

    /// Wrap the raw body handed over by the transport.
    fn from_body(body: Bytes) -> Self;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opcode_roundtrip() {
        for code in [0x00, 0x01, 0x02, 0x03, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10] {
            assert_eq!(Opcode::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn unknown_opcode() {
        assert!(matches!(Opcode::from_code(0x04), Err(DecodeError::UnknownOpcode(0x04))));
        assert!(matches!(Opcode::from_code(0xFF), Err(DecodeError::UnknownOpcode(0xFF))));
    }
}
