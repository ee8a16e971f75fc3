//! Append-style encoder.
//!
//! Each helper appends the smallest wire form of its argument to a `Vec<u8>`.
//! The decoder is the interesting half of this crate; the writer exists so
//! that round trips can be exercised and so the size generator can measure
//! encoded headers and field tags.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::extension::Extension;
use crate::prefix::*;
use crate::value::{Complex128, Complex64, Value};
use crate::extension::{COMPLEX128_EXTENSION, COMPLEX64_EXTENSION, TIME_EXTENSION};

pub fn append_nil(b: &mut Vec<u8>) {
    b.push(NIL);
}

pub fn append_bool(b: &mut Vec<u8>, v: bool) {
    b.push(if v { TRUE } else { FALSE });
}

pub fn append_int(b: &mut Vec<u8>, i: i64) {
    if i >= 0 {
        match i {
            0..=0x7f => b.push(i as u8),
            0x80..=0x7fff => {
                b.push(INT16);
                b.extend_from_slice(&(i as i16).to_be_bytes());
            }
            0x8000..=0x7fff_ffff => {
                b.push(INT32);
                b.extend_from_slice(&(i as i32).to_be_bytes());
            }
            _ => {
                b.push(INT64);
                b.extend_from_slice(&i.to_be_bytes());
            }
        }
    } else {
        match i {
            -32..=-1 => b.push(i as u8),
            -0x80..=-33 => {
                b.push(INT8);
                b.push(i as u8);
            }
            -0x8000..=-0x81 => {
                b.push(INT16);
                b.extend_from_slice(&(i as i16).to_be_bytes());
            }
            -0x8000_0000..=-0x8001 => {
                b.push(INT32);
                b.extend_from_slice(&(i as i32).to_be_bytes());
            }
            _ => {
                b.push(INT64);
                b.extend_from_slice(&i.to_be_bytes());
            }
        }
    }
}

pub fn append_uint(b: &mut Vec<u8>, u: u64) {
    match u {
        0..=0x7f => b.push(u as u8),
        0x80..=0xff => {
            b.push(UINT8);
            b.push(u as u8);
        }
        0x100..=0xffff => {
            b.push(UINT16);
            b.extend_from_slice(&(u as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            b.push(UINT32);
            b.extend_from_slice(&(u as u32).to_be_bytes());
        }
        _ => {
            b.push(UINT64);
            b.extend_from_slice(&u.to_be_bytes());
        }
    }
}

pub fn append_float32(b: &mut Vec<u8>, f: f32) {
    b.push(FLOAT32);
    b.extend_from_slice(&f.to_bits().to_be_bytes());
}

pub fn append_float64(b: &mut Vec<u8>, f: f64) {
    b.push(FLOAT64);
    b.extend_from_slice(&f.to_bits().to_be_bytes());
}

pub fn append_string_header(b: &mut Vec<u8>, len: u32) {
    match len {
        0..=31 => b.push(0xa0 | len as u8),
        32..=0xff => {
            b.push(STR8);
            b.push(len as u8);
        }
        0x100..=0xffff => {
            b.push(STR16);
            b.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            b.push(STR32);
            b.extend_from_slice(&len.to_be_bytes());
        }
    }
}

pub fn append_str(b: &mut Vec<u8>, s: &str) {
    append_string_header(b, s.len() as u32);
    b.extend_from_slice(s.as_bytes());
}

pub fn append_bytes(b: &mut Vec<u8>, v: &[u8]) {
    let len = v.len() as u32;
    match len {
        0..=0xff => {
            b.push(BIN8);
            b.push(len as u8);
        }
        0x100..=0xffff => {
            b.push(BIN16);
            b.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            b.push(BIN32);
            b.extend_from_slice(&len.to_be_bytes());
        }
    }
    b.extend_from_slice(v);
}

pub fn append_map_header(b: &mut Vec<u8>, pairs: u32) {
    match pairs {
        0..=15 => b.push(0x80 | pairs as u8),
        16..=0xffff => {
            b.push(MAP16);
            b.extend_from_slice(&(pairs as u16).to_be_bytes());
        }
        _ => {
            b.push(MAP32);
            b.extend_from_slice(&pairs.to_be_bytes());
        }
    }
}

pub fn append_array_header(b: &mut Vec<u8>, len: u32) {
    match len {
        0..=15 => b.push(0x90 | len as u8),
        16..=0xffff => {
            b.push(ARRAY16);
            b.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            b.push(ARRAY32);
            b.extend_from_slice(&len.to_be_bytes());
        }
    }
}

fn append_ext_header(b: &mut Vec<u8>, typ: i8, len: u32) {
    match len {
        1 => b.push(FIXEXT1),
        2 => b.push(FIXEXT2),
        4 => b.push(FIXEXT4),
        8 => b.push(FIXEXT8),
        16 => b.push(FIXEXT16),
        0..=0xff => {
            b.push(EXT8);
            b.push(len as u8);
        }
        0x100..=0xffff => {
            b.push(EXT16);
            b.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            b.push(EXT32);
            b.extend_from_slice(&len.to_be_bytes());
        }
    }
    b.push(typ as u8);
}

/// Appends an extension object: envelope, type tag, payload.
pub fn append_ext(b: &mut Vec<u8>, e: &dyn Extension) -> Result<()> {
    append_ext_header(b, e.ext_type(), e.len() as u32);
    e.marshal_binary_to(b)
}

/// Appends a timestamp in the fixed 12-byte extension form.
pub fn append_time(b: &mut Vec<u8>, t: DateTime<Utc>) {
    b.push(EXT8);
    b.push(12);
    b.push(TIME_EXTENSION as u8);
    b.extend_from_slice(&t.timestamp().to_be_bytes());
    b.extend_from_slice(&t.timestamp_subsec_nanos().to_be_bytes());
}

pub fn append_complex64(b: &mut Vec<u8>, c: Complex64) {
    b.push(FIXEXT8);
    b.push(COMPLEX64_EXTENSION as u8);
    b.extend_from_slice(&c.re.to_bits().to_be_bytes());
    b.extend_from_slice(&c.im.to_bits().to_be_bytes());
}

pub fn append_complex128(b: &mut Vec<u8>, c: Complex128) {
    b.push(FIXEXT16);
    b.push(COMPLEX128_EXTENSION as u8);
    b.extend_from_slice(&c.re.to_bits().to_be_bytes());
    b.extend_from_slice(&c.im.to_bits().to_be_bytes());
}

/// Appends a dynamically-typed value.
pub fn append_value(b: &mut Vec<u8>, v: &Value) {
    match v {
        Value::Nil => append_nil(b),
        Value::Bool(x) => append_bool(b, *x),
        Value::Int(i) => append_int(b, *i),
        Value::Uint(u) => append_uint(b, *u),
        Value::F32(f) => append_float32(b, *f),
        Value::F64(f) => append_float64(b, *f),
        Value::Str(s) => append_str(b, s),
        Value::Bin(x) => append_bytes(b, x),
        Value::Array(a) => {
            append_array_header(b, a.len() as u32);
            for el in a {
                append_value(b, el);
            }
        }
        Value::Map(m) => {
            append_map_header(b, m.len() as u32);
            for (k, el) in m {
                append_str(b, k);
                append_value(b, el);
            }
        }
        Value::Time(t) => append_time(b, *t),
        Value::Complex64(c) => append_complex64(b, *c),
        Value::Complex128(c) => append_complex128(b, *c),
        Value::Ext(e) => {
            append_ext_header(b, e.typ, e.data.len() as u32);
            b.extend_from_slice(&e.data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_picks_smallest_form() {
        let mut b = Vec::new();
        append_int(&mut b, 1);
        assert_eq!(b, [0x01]);
        b.clear();
        append_int(&mut b, -1);
        assert_eq!(b, [0xff]);
        b.clear();
        append_int(&mut b, -33);
        assert_eq!(b, [INT8, 0xdf]);
        b.clear();
        append_int(&mut b, 0x80);
        assert_eq!(b, [INT16, 0x00, 0x80]);
    }

    #[test]
    fn uint_picks_smallest_form() {
        let mut b = Vec::new();
        append_uint(&mut b, 127);
        assert_eq!(b, [0x7f]);
        b.clear();
        append_uint(&mut b, 128);
        assert_eq!(b, [UINT8, 0x80]);
        b.clear();
        append_uint(&mut b, 256);
        assert_eq!(b, [UINT16, 0x01, 0x00]);
    }

    #[test]
    fn str_header_forms() {
        let mut b = Vec::new();
        append_str(&mut b, "hello");
        assert_eq!(b[0], 0xa5);
        b.clear();
        append_string_header(&mut b, 32);
        assert_eq!(b, [STR8, 32]);
        b.clear();
        append_string_header(&mut b, 256);
        assert_eq!(b, [STR16, 1, 0]);
    }

    #[test]
    fn ext_header_prefers_fixext() {
        let mut b = Vec::new();
        append_ext_header(&mut b, 7, 8);
        assert_eq!(b, [FIXEXT8, 7]);
        b.clear();
        append_ext_header(&mut b, 7, 3);
        assert_eq!(b, [EXT8, 3, 7]);
    }
}
