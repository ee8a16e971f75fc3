//! Cursor-style reader over a fully-present buffer.
//!
//! [`Reader`] is the streaming face of the slice readers in [`crate::read`]:
//! each call decodes the next object and advances the cursor. End of stream
//! is the empty remainder, not an error. Zero-copy accessors hand back
//! slices that borrow from the underlying buffer, never from the reader.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::extension::{peek_extension_type, read_ext_bytes, Extension};
use crate::prefix::Type;
use crate::read;
use crate::value::{Complex128, Complex64, Value};

pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(b: &'a [u8]) -> Self {
        Self { buf: b }
    }

    /// Resets the cursor onto a new buffer.
    pub fn reset(&mut self, b: &'a [u8]) {
        self.buf = b;
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The logical type of the next object; `Invalid` at end of stream.
    pub fn next_type(&self) -> Type {
        read::next_type(self.buf)
    }

    pub fn is_nil(&self) -> bool {
        read::is_nil(self.buf)
    }

    pub fn read_nil(&mut self) -> Result<()> {
        self.buf = read::read_nil_bytes(self.buf)?;
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let (v, rest) = read::read_bool_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_int64(&mut self) -> Result<i64> {
        let (v, rest) = read::read_int64_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_uint64(&mut self) -> Result<u64> {
        let (v, rest) = read::read_uint64_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_float32(&mut self) -> Result<f32> {
        let (v, rest) = read::read_float32_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_float64(&mut self) -> Result<f64> {
        let (v, rest) = read::read_float64_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_map_header(&mut self) -> Result<u32> {
        let (v, rest) = read::read_map_header_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_array_header(&mut self) -> Result<u32> {
        let (v, rest) = read::read_array_header_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    /// Reads a map key without copying; the slice borrows the buffer.
    pub fn read_map_key(&mut self) -> Result<&'a [u8]> {
        let (k, rest) = read::read_map_key_zc(self.buf)?;
        self.buf = rest;
        Ok(k)
    }

    /// Reads a `str` payload without copying.
    pub fn read_str_bytes(&mut self) -> Result<&'a [u8]> {
        let (s, rest) = read::read_string_zc(self.buf)?;
        self.buf = rest;
        Ok(s)
    }

    /// Reads a `bin` payload without copying.
    pub fn read_bin_bytes(&mut self) -> Result<&'a [u8]> {
        let (v, rest) = read::read_bytes_zc(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    pub fn read_time(&mut self) -> Result<DateTime<Utc>> {
        let (t, rest) = read::read_time_bytes(self.buf)?;
        self.buf = rest;
        Ok(t)
    }

    pub fn read_complex64(&mut self) -> Result<Complex64> {
        let (c, rest) = read::read_complex64_bytes(self.buf)?;
        self.buf = rest;
        Ok(c)
    }

    pub fn read_complex128(&mut self) -> Result<Complex128> {
        let (c, rest) = read::read_complex128_bytes(self.buf)?;
        self.buf = rest;
        Ok(c)
    }

    pub fn peek_extension_type(&self) -> Result<i8> {
        peek_extension_type(self.buf)
    }

    pub fn read_extension(&mut self, e: &mut dyn Extension) -> Result<()> {
        self.buf = read_ext_bytes(self.buf, e)?;
        Ok(())
    }

    /// Reads the next object as a dynamically-typed [`Value`].
    pub fn read_value(&mut self) -> Result<Value> {
        let (v, rest) = read::read_value_bytes(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    /// Skips the next object, nested contents included.
    pub fn skip(&mut self) -> Result<()> {
        self.buf = read::skip(self.buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::{append_array_header, append_int, append_str};

    #[test]
    fn cursor_advances_per_object() {
        let mut b = Vec::new();
        append_array_header(&mut b, 2);
        append_int(&mut b, 1);
        append_str(&mut b, "x");
        let mut r = Reader::new(&b);
        assert_eq!(r.read_array_header().unwrap(), 2);
        assert_eq!(r.read_int64().unwrap(), 1);
        assert_eq!(r.read_str_bytes().unwrap(), b"x");
        assert!(r.is_empty());
    }

    #[test]
    fn failed_read_leaves_cursor_in_place() {
        let b = [0xc3]; // true
        let mut r = Reader::new(&b);
        assert!(r.read_int64().is_err());
        assert_eq!(r.remaining(), 1);
        assert!(r.read_bool().unwrap());
    }
}
