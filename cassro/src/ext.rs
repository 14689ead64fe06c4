//! Extension traits for the CQL wire notation.
//!
//! The protocol is big-endian throughout. Variable length fields are framed
//! as `[int bytes]`: a 4-byte signed length followed by the raw payload,
//! where a negative length stands for a null value. Small enumerations use
//! `[short]` 2-byte fields, and strings are `[short]`-prefixed UTF-8.
use bytes::{Buf, BufMut, Bytes};

use crate::error::DecodeError;

/// Length conversion towards protocol integer widths.
pub trait UsizeExt {
    /// Length is `usize` in rust, while the wire wants `i32`,
    /// this will panic when overflow instead of wrapping.
    fn to_i32(self) -> i32;
    /// Length is `usize` in rust, while the wire sometime wants `u16`,
    /// this will panic when overflow instead of wrapping.
    fn to_u16(self) -> u16;
}

impl UsizeExt for usize {
    fn to_i32(self) -> i32 {
        self.try_into().expect("value size too large for protocol")
    }

    fn to_u16(self) -> u16 {
        self.try_into().expect("value size too large for protocol")
    }
}

/// Wire notation writer operations on [`BufMut`].
pub trait BufMutExt {
    /// Write `[int bytes]`: 4-byte length prefix followed by raw bytes.
    fn put_int_bytes(&mut self, bytes: &[u8]);
    /// Write the null sentinel: length -1, no payload bytes.
    fn put_null_bytes(&mut self);
    /// Write `[string]`: 2-byte length prefix followed by UTF-8 bytes.
    fn put_string(&mut self, string: &str);
    /// Write `[long string]`: 4-byte length prefix followed by UTF-8 bytes.
    fn put_long_string(&mut self, string: &str);
}

impl<B: BufMut> BufMutExt for B {
    fn put_int_bytes(&mut self, bytes: &[u8]) {
        self.put_i32(bytes.len().to_i32());
        self.put_slice(bytes);
    }

    fn put_null_bytes(&mut self) {
        self.put_i32(-1);
    }

    fn put_string(&mut self, string: &str) {
        self.put_u16(string.len().to_u16());
        self.put_slice(string.as_bytes());
    }

    fn put_long_string(&mut self, string: &str) {
        self.put_int_bytes(string.as_bytes());
    }
}

/// Wire notation reader operations on [`Bytes`].
///
/// Every read is bounds checked, a declared length that exceeds the
/// remaining buffer is a [`DecodeError`], never a truncated read.
pub trait BytesExt {
    /// Fail with [`DecodeError::Short`] unless `need` bytes remain.
    fn ensure_remaining(&self, need: usize) -> Result<(), DecodeError>;
    /// Read a 4-byte signed integer. Named apart from [`Buf::get_int`],
    /// which takes a width and is unchecked.
    fn get_int4(&mut self) -> Result<i32, DecodeError>;
    /// Read a 2-byte unsigned integer.
    fn get_short(&mut self) -> Result<u16, DecodeError>;
    /// Read `[int bytes]`, `None` when the length is the null sentinel.
    fn get_int_bytes(&mut self) -> Result<Option<Bytes>, DecodeError>;
    /// Read a `[string]`.
    fn get_string(&mut self) -> Result<String, DecodeError>;
}

impl BytesExt for Bytes {
    fn ensure_remaining(&self, need: usize) -> Result<(), DecodeError> {
        let have = self.remaining();
        if have < need {
            return Err(DecodeError::Short { need, have });
        }
        Ok(())
    }

    fn get_int4(&mut self) -> Result<i32, DecodeError> {
        self.ensure_remaining(4)?;
        Ok(Buf::get_i32(self))
    }

    fn get_short(&mut self) -> Result<u16, DecodeError> {
        self.ensure_remaining(2)?;
        Ok(Buf::get_u16(self))
    }

    fn get_int_bytes(&mut self) -> Result<Option<Bytes>, DecodeError> {
        let len = self.get_int4()?;
        if len < 0 {
            return Ok(None);
        }
        let len = len as usize;
        self.ensure_remaining(len)?;
        Ok(Some(self.split_to(len)))
    }

    fn get_string(&mut self) -> Result<String, DecodeError> {
        let len = self.get_short()? as usize;
        self.ensure_remaining(len)?;
        let raw = self.split_to(len);
        String::from_utf8(raw.into()).map_err(|e| DecodeError::Utf8(e.utf8_error()))
    }
}

/// Helper trait to [`Display`][std::fmt::Display] bytes as hex.
pub trait FmtExt {
    /// Lowercase hex rendition of bytes.
    fn hex(&self) -> HexFmt<'_>;
}

/// Hex [`Display`][std::fmt::Display] implementation for bytes.
pub struct HexFmt<'a>(pub &'a [u8]);

impl FmtExt for [u8] {
    fn hex(&self) -> HexFmt<'_> {
        HexFmt(self)
    }
}

impl std::fmt::Display for HexFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HexFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{self}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn int_bytes_roundtrip() {
        let mut buf = BytesMut::new();
        buf.put_int_bytes(b"abc");
        assert_eq!(&buf[..], b"\x00\x00\x00\x03abc");

        let mut body = buf.freeze();
        let read = body.get_int_bytes().unwrap().unwrap();
        assert_eq!(&read[..], b"abc");
        assert!(body.is_empty());
    }

    #[test]
    fn int4_read() {
        // `Buf` is in scope here too, `get_int4` must resolve on its own
        let mut body = Bytes::from_static(b"\x00\x00\x01\x02tail");
        assert_eq!(body.get_int4().unwrap(), 258);
        assert_eq!(&body[..], b"tail");

        let mut short = Bytes::from_static(b"\x00\x01");
        assert!(matches!(short.get_int4(), Err(DecodeError::Short { need: 4, have: 2 })));
    }

    #[test]
    fn null_sentinel() {
        let mut buf = BytesMut::new();
        buf.put_null_bytes();
        assert_eq!(&buf[..], b"\xff\xff\xff\xff");

        let mut body = buf.freeze();
        assert!(body.get_int_bytes().unwrap().is_none());
    }

    #[test]
    fn empty_is_not_null() {
        let mut buf = BytesMut::new();
        buf.put_int_bytes(b"");
        assert_eq!(&buf[..], b"\x00\x00\x00\x00");

        let mut body = buf.freeze();
        let read = body.get_int_bytes().unwrap();
        assert_eq!(read.as_deref(), Some(&b""[..]));
    }

    #[test]
    fn length_prefix_overrun() {
        // declared length 8, only 2 bytes follow
        let mut body = Bytes::from_static(b"\x00\x00\x00\x08ab");
        let err = body.get_int_bytes().unwrap_err();
        assert!(matches!(err, DecodeError::Short { need: 8, have: 2 }));
    }

    #[test]
    fn string_roundtrip() {
        let mut buf = BytesMut::new();
        buf.put_string("cql");
        assert_eq!(&buf[..], b"\x00\x03cql");

        let mut body = buf.freeze();
        assert_eq!(body.get_string().unwrap(), "cql");
    }

    #[test]
    fn invalid_utf8_string() {
        let mut body = Bytes::from_static(b"\x00\x02\xff\xfe");
        assert!(matches!(body.get_string(), Err(DecodeError::Utf8(_))));
    }
}
