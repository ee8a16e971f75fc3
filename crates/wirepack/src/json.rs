//! MessagePack → JSON streaming transcoder.
//!
//! Objects are pulled from a [`Reader`] one at a time and written out as
//! JSON with no whitespace between tokens. Binary payloads become padded
//! standard base64; string escaping is HTML-safe (`<`, `>`, `&` are hex
//! escaped along with control bytes).

use std::io::{BufWriter, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::SecondsFormat;

use crate::error::{Error, Result};
use crate::extension::{lookup_extension, RawExtension};
use crate::prefix::Type;
use crate::reader::Reader;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Transcodes MessagePack from `b` to JSON on `w`, returning the number of
/// bytes written.
pub fn write_as_json<W: Write>(w: W, b: &[u8]) -> Result<u64> {
    Reader::new(b).write_to_json(w)
}

impl<'a> Reader<'a> {
    /// Translates objects to JSON and writes them to `w` until the buffer
    /// is exhausted. Running out of input between objects is the normal
    /// end of stream; any decode error mid-object is fatal.
    pub fn write_to_json<W: Write>(&mut self, w: W) -> Result<u64> {
        let mut dst = BufWriter::new(w);
        let mut n: u64 = 0;
        while !self.is_empty() {
            n += rw_next(&mut dst, self)? as u64;
        }
        dst.flush()?;
        Ok(n)
    }
}

fn rw_next<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    match src.next_type() {
        Type::Str => rw_string(dst, src),
        Type::Bin => rw_bytes(dst, src),
        Type::Map => rw_map(dst, src),
        Type::Array => rw_array(dst, src),
        Type::Float64 => rw_float64(dst, src),
        Type::Float32 => rw_float32(dst, src),
        Type::Bool => rw_bool(dst, src),
        Type::Int => rw_int(dst, src),
        Type::Uint => rw_uint(dst, src),
        Type::Nil => rw_nil(dst, src),
        Type::Extension | Type::Complex64 | Type::Complex128 => rw_extension(dst, src),
        Type::Time => rw_time(dst, src),
        // 0xc1 is the only unmapped prefix on non-empty input
        Type::Invalid => Err(Error::InvalidPrefix(0xc1)),
    }
}

fn write_str<W: Write>(dst: &mut W, s: &str) -> Result<usize> {
    dst.write_all(s.as_bytes())?;
    Ok(s.len())
}

fn write_byte<W: Write>(dst: &mut W, b: u8) -> Result<usize> {
    dst.write_all(&[b])?;
    Ok(1)
}

fn rw_map<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let sz = src.read_map_header()?;
    if sz == 0 {
        return write_str(dst, "{}");
    }
    let mut n = write_byte(dst, b'{')?;
    for i in 0..sz {
        if i > 0 {
            n += write_byte(dst, b',')?;
        }
        let field = src.read_map_key()?;
        n += rw_quoted(dst, field)?;
        n += write_byte(dst, b':')?;
        n += rw_next(dst, src)?;
    }
    n += write_byte(dst, b'}')?;
    Ok(n)
}

fn rw_array<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let mut n = write_byte(dst, b'[')?;
    let sz = src.read_array_header()?;
    for i in 0..sz {
        if i > 0 {
            n += write_byte(dst, b',')?;
        }
        n += rw_next(dst, src)?;
    }
    n += write_byte(dst, b']')?;
    Ok(n)
}

fn rw_nil<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    src.read_nil()?;
    write_str(dst, "null")
}

// The two float paths intentionally swap widths: float32 values render at
// f64 precision and float64 values at f32 precision, matching the output
// existing consumers parse.
fn rw_float32<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let f = src.read_float32()?;
    write_str(dst, &(f as f64).to_string())
}

fn rw_float64<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let f = src.read_float64()?;
    write_str(dst, &(f as f32).to_string())
}

fn rw_int<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let i = src.read_int64()?;
    write_str(dst, &i.to_string())
}

fn rw_uint<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let u = src.read_uint64()?;
    write_str(dst, &u.to_string())
}

fn rw_bool<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let b = src.read_bool()?;
    write_str(dst, if b { "true" } else { "false" })
}

fn rw_time<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let t = src.read_time()?;
    let mut n = write_byte(dst, b'"')?;
    n += write_str(dst, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
    n += write_byte(dst, b'"')?;
    Ok(n)
}

fn rw_extension<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let et = src.peek_extension_type()?;

    // A registered extension may override the JSON rendering.
    if let Some(factory) = lookup_extension(et) {
        let mut e = factory();
        src.read_extension(e.as_mut())?;
        if let Some(js) = e.marshal_json() {
            return write_str(dst, &js);
        }
        let mut data = Vec::with_capacity(e.len());
        e.marshal_binary_to(&mut data)?;
        return rw_raw_extension(dst, et, &data);
    }

    let mut e = RawExtension {
        typ: et,
        data: Vec::new(),
    };
    src.read_extension(&mut e)?;
    rw_raw_extension(dst, et, &e.data)
}

fn rw_raw_extension<W: Write>(dst: &mut W, typ: i8, data: &[u8]) -> Result<usize> {
    // The `"type:"` label (colon inside the quotes) is what deployed
    // consumers parse; keep it byte-for-byte.
    let mut n = write_str(dst, "{\"type:\"")?;
    n += write_str(dst, &typ.to_string())?;
    n += write_str(dst, ",\"data\":\"")?;
    n += write_str(dst, &STANDARD.encode(data))?;
    n += write_str(dst, "\"}")?;
    Ok(n)
}

fn rw_string<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let s = src.read_str_bytes()?;
    rw_quoted(dst, s)
}

fn rw_bytes<W: Write>(dst: &mut W, src: &mut Reader) -> Result<usize> {
    let v = src.read_bin_bytes()?;
    let mut n = write_byte(dst, b'"')?;
    n += write_str(dst, &STANDARD.encode(v))?;
    n += write_byte(dst, b'"')?;
    Ok(n)
}

/// Decodes one UTF-8 sequence; `(None, 1)` marks an invalid byte.
fn decode_rune(s: &[u8]) -> (Option<char>, usize) {
    let take = s.len().min(4);
    match std::str::from_utf8(&s[..take]) {
        Ok(st) => match st.chars().next() {
            Some(c) => (Some(c), c.len_utf8()),
            None => (None, 1),
        },
        Err(e) => {
            if e.valid_up_to() == 0 {
                (None, 1)
            } else {
                // the error is past the first character
                let c = std::str::from_utf8(&s[..e.valid_up_to()])
                    .expect("validated prefix")
                    .chars()
                    .next()
                    .expect("non-empty prefix");
                (Some(c), c.len_utf8())
            }
        }
    }
}

/// Writes `s` as a quoted, HTML-safe JSON string.
fn rw_quoted<W: Write>(dst: &mut W, s: &[u8]) -> Result<usize> {
    let mut n = write_byte(dst, b'"')?;
    let mut start = 0;
    let mut i = 0;
    while i < s.len() {
        let b = s[i];
        if b < 0x80 {
            if (0x20..0x80).contains(&b)
                && b != b'\\'
                && b != b'"'
                && b != b'<'
                && b != b'>'
                && b != b'&'
            {
                i += 1;
                continue;
            }
            if start < i {
                dst.write_all(&s[start..i])?;
                n += i - start;
            }
            match b {
                b'\\' | b'"' => {
                    n += write_byte(dst, b'\\')?;
                    n += write_byte(dst, b)?;
                }
                b'\n' => n += write_str(dst, "\\n")?,
                b'\r' => n += write_str(dst, "\\r")?,
                _ => {
                    n += write_str(dst, "\\u00")?;
                    n += write_byte(dst, HEX[(b >> 4) as usize])?;
                    n += write_byte(dst, HEX[(b & 0x0f) as usize])?;
                }
            }
            i += 1;
            start = i;
            continue;
        }
        match decode_rune(&s[i..]) {
            (None, size) => {
                if start < i {
                    dst.write_all(&s[start..i])?;
                    n += i - start;
                }
                n += write_str(dst, "\\ufffd")?;
                i += size;
                start = i;
            }
            (Some(c), size) if c == '\u{2028}' || c == '\u{2029}' => {
                if start < i {
                    dst.write_all(&s[start..i])?;
                    n += i - start;
                }
                n += write_str(dst, "\\u202")?;
                n += write_byte(dst, HEX[(c as u32 & 0x0f) as usize])?;
                i += size;
                start = i;
            }
            (Some(_), size) => i += size,
        }
    }
    if start < s.len() {
        dst.write_all(&s[start..])?;
        n += s.len() - start;
    }
    n += write_byte(dst, b'"')?;
    Ok(n)
}
