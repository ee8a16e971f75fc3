//! Byte-slice readers.
//!
//! Every reader borrows a byte slice and returns the decoded value together
//! with the unconsumed tail. No reader mutates its input, and no reader
//! consumes bytes on error: a failed call leaves the caller holding the
//! original slice, and the remainder must be treated as indeterminate.
//!
//! Numeric readers accept narrower wire forms and widen; a wire value that
//! does not fit the requested width fails with `IntOverflow`/`UintOverflow`.

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::error::{bad_prefix, Error, Result};
use crate::extension::{
    lookup_extension, peek_extension_type, read_ext_bytes, RawExtension, COMPLEX128_EXTENSION,
    COMPLEX64_EXTENSION, TIME_EXTENSION,
};
use crate::prefix::*;
use crate::value::{Complex128, Complex64, Value};

/// Returns the logical type of the next object in `b`.
///
/// Extension objects are upgraded to `Time`, `Complex64` or `Complex128`
/// when the peeked type tag matches a well-known extension. Empty input
/// yields `Invalid`.
pub fn next_type(b: &[u8]) -> Type {
    if b.is_empty() {
        return Type::Invalid;
    }
    let spec = classify(b[0]);
    if spec.typ == Type::Extension && b.len() > spec.size as usize {
        let tag = match spec.mode {
            LengthMode::Fixed(_) => b[1] as i8,
            _ => b[spec.size as usize - 1] as i8,
        };
        return match tag {
            TIME_EXTENSION => Type::Time,
            COMPLEX128_EXTENSION => Type::Complex128,
            COMPLEX64_EXTENSION => Type::Complex64,
            _ => Type::Extension,
        };
    }
    spec.typ
}

/// True iff the next object is the single nil byte.
pub fn is_nil(b: &[u8]) -> bool {
    !b.is_empty() && b[0] == NIL
}

/// Reads a nil and returns the remaining bytes.
pub fn read_nil_bytes(b: &[u8]) -> Result<&[u8]> {
    if b.is_empty() {
        return Err(Error::ShortBytes);
    }
    if b[0] != NIL {
        return Err(bad_prefix(Type::Nil, b[0]));
    }
    Ok(&b[1..])
}

/// Reads a bool and returns the value and the remaining bytes.
pub fn read_bool_bytes(b: &[u8]) -> Result<(bool, &[u8])> {
    if b.is_empty() {
        return Err(Error::ShortBytes);
    }
    match b[0] {
        TRUE => Ok((true, &b[1..])),
        FALSE => Ok((false, &b[1..])),
        lead => Err(bad_prefix(Type::Bool, lead)),
    }
}

/// Reads any MessagePack integer form, widening to `i64`.
///
/// A `uint64` wire value above `i64::MAX` fails with `UintOverflow`.
pub fn read_int64_bytes(b: &[u8]) -> Result<(i64, &[u8])> {
    let l = b.len();
    if l < 1 {
        return Err(Error::ShortBytes);
    }
    let lead = b[0];
    if is_fixint(lead) {
        return Ok((rfixint(lead) as i64, &b[1..]));
    }
    if is_nfixint(lead) {
        return Ok((rnfixint(lead) as i64, &b[1..]));
    }
    match lead {
        INT8 | UINT8 => {
            if l < 2 {
                return Err(Error::ShortBytes);
            }
            if lead == INT8 {
                Ok((get_i8(b) as i64, &b[2..]))
            } else {
                Ok((get_u8(b) as i64, &b[2..]))
            }
        }
        INT16 | UINT16 => {
            if l < 3 {
                return Err(Error::ShortBytes);
            }
            if lead == INT16 {
                Ok((get_i16(b) as i64, &b[3..]))
            } else {
                Ok((get_u16(b) as i64, &b[3..]))
            }
        }
        INT32 | UINT32 => {
            if l < 5 {
                return Err(Error::ShortBytes);
            }
            if lead == INT32 {
                Ok((get_i32(b) as i64, &b[5..]))
            } else {
                Ok((get_u32(b) as i64, &b[5..]))
            }
        }
        INT64 | UINT64 => {
            if l < 9 {
                return Err(Error::ShortBytes);
            }
            if lead == INT64 {
                Ok((get_i64(b), &b[9..]))
            } else {
                let num = get_u64(b);
                // Smaller unsigned forms always fit; only uint64 can spill.
                if num > i64::MAX as u64 {
                    return Err(Error::UintOverflow {
                        value: num,
                        bits: 64,
                    });
                }
                Ok((num as i64, &b[9..]))
            }
        }
        _ => Err(bad_prefix(Type::Int, lead)),
    }
}

pub fn read_int32_bytes(b: &[u8]) -> Result<(i32, &[u8])> {
    let (i, o) = read_int64_bytes(b)?;
    if i > i32::MAX as i64 || i < i32::MIN as i64 {
        return Err(Error::IntOverflow { value: i, bits: 32 });
    }
    Ok((i as i32, o))
}

pub fn read_int16_bytes(b: &[u8]) -> Result<(i16, &[u8])> {
    let (i, o) = read_int64_bytes(b)?;
    if i > i16::MAX as i64 || i < i16::MIN as i64 {
        return Err(Error::IntOverflow { value: i, bits: 16 });
    }
    Ok((i as i16, o))
}

pub fn read_int8_bytes(b: &[u8]) -> Result<(i8, &[u8])> {
    let (i, o) = read_int64_bytes(b)?;
    if i > i8::MAX as i64 || i < i8::MIN as i64 {
        return Err(Error::IntOverflow { value: i, bits: 8 });
    }
    Ok((i as i8, o))
}

/// Reads any unsigned MessagePack integer form, widening to `u64`.
pub fn read_uint64_bytes(b: &[u8]) -> Result<(u64, &[u8])> {
    let l = b.len();
    if l < 1 {
        return Err(Error::ShortBytes);
    }
    let lead = b[0];
    if is_fixint(lead) {
        return Ok((rfixint(lead) as u64, &b[1..]));
    }
    match lead {
        UINT8 => {
            if l < 2 {
                return Err(Error::ShortBytes);
            }
            Ok((get_u8(b) as u64, &b[2..]))
        }
        UINT16 => {
            if l < 3 {
                return Err(Error::ShortBytes);
            }
            Ok((get_u16(b) as u64, &b[3..]))
        }
        UINT32 => {
            if l < 5 {
                return Err(Error::ShortBytes);
            }
            Ok((get_u32(b) as u64, &b[5..]))
        }
        UINT64 => {
            if l < 9 {
                return Err(Error::ShortBytes);
            }
            Ok((get_u64(b), &b[9..]))
        }
        _ => Err(bad_prefix(Type::Uint, lead)),
    }
}

pub fn read_uint32_bytes(b: &[u8]) -> Result<(u32, &[u8])> {
    let (u, o) = read_uint64_bytes(b)?;
    if u > u32::MAX as u64 {
        return Err(Error::UintOverflow { value: u, bits: 32 });
    }
    Ok((u as u32, o))
}

pub fn read_uint16_bytes(b: &[u8]) -> Result<(u16, &[u8])> {
    let (u, o) = read_uint64_bytes(b)?;
    if u > u16::MAX as u64 {
        return Err(Error::UintOverflow { value: u, bits: 16 });
    }
    Ok((u as u16, o))
}

pub fn read_uint8_bytes(b: &[u8]) -> Result<(u8, &[u8])> {
    let (u, o) = read_uint64_bytes(b)?;
    if u > u8::MAX as u64 {
        return Err(Error::UintOverflow { value: u, bits: 8 });
    }
    Ok((u as u8, o))
}

/// Analogous to [`read_uint8_bytes`].
pub fn read_byte_bytes(b: &[u8]) -> Result<(u8, &[u8])> {
    read_uint8_bytes(b)
}

/// Reads a float32 and returns the value and the remaining bytes.
pub fn read_float32_bytes(b: &[u8]) -> Result<(f32, &[u8])> {
    if b.len() < 5 {
        return Err(Error::ShortBytes);
    }
    if b[0] != FLOAT32 {
        return Err(bad_prefix(Type::Float32, b[0]));
    }
    Ok((get_f32(b), &b[5..]))
}

/// Reads a float64, accepting a float32 wire form by widening.
pub fn read_float64_bytes(b: &[u8]) -> Result<(f64, &[u8])> {
    if b.len() < 9 {
        if b.len() >= 5 && b[0] == FLOAT32 {
            let (f, o) = read_float32_bytes(b)?;
            return Ok((f as f64, o));
        }
        return Err(Error::ShortBytes);
    }
    if b[0] != FLOAT64 {
        if b[0] == FLOAT32 {
            let (f, o) = read_float32_bytes(b)?;
            return Ok((f as f64, o));
        }
        return Err(bad_prefix(Type::Float64, b[0]));
    }
    Ok((get_f64(b), &b[9..]))
}

/// Reads a map header and returns the pair count and the remaining bytes.
pub fn read_map_header_bytes(b: &[u8]) -> Result<(u32, &[u8])> {
    let l = b.len();
    if l < 1 {
        return Err(Error::ShortBytes);
    }
    let lead = b[0];
    if is_fixmap(lead) {
        return Ok((rfixmap(lead) as u32, &b[1..]));
    }
    match lead {
        MAP16 => {
            if l < 3 {
                return Err(Error::ShortBytes);
            }
            Ok((be16(&b[1..]) as u32, &b[3..]))
        }
        MAP32 => {
            if l < 5 {
                return Err(Error::ShortBytes);
            }
            Ok((be32(&b[1..]), &b[5..]))
        }
        _ => Err(bad_prefix(Type::Map, lead)),
    }
}

/// Reads an array header and returns the element count and the remaining bytes.
pub fn read_array_header_bytes(b: &[u8]) -> Result<(u32, &[u8])> {
    let l = b.len();
    if l < 1 {
        return Err(Error::ShortBytes);
    }
    let lead = b[0];
    if is_fixarray(lead) {
        return Ok((rfixarray(lead) as u32, &b[1..]));
    }
    match lead {
        ARRAY16 => {
            if l < 3 {
                return Err(Error::ShortBytes);
            }
            Ok((be16(&b[1..]) as u32, &b[3..]))
        }
        ARRAY32 => {
            if l < 5 {
                return Err(Error::ShortBytes);
            }
            Ok((be32(&b[1..]), &b[5..]))
        }
        _ => Err(bad_prefix(Type::Array, lead)),
    }
}

/// Reads a map key without copying. Keys may be encoded as either `str` or
/// `bin`; a `str` read that fails because the object is `bin` falls back.
pub fn read_map_key_zc(b: &[u8]) -> Result<(&[u8], &[u8])> {
    match read_string_zc(b) {
        Ok(r) => Ok(r),
        Err(Error::TypeError {
            encoded: Type::Bin, ..
        }) => read_bytes_zc(b),
        Err(e) => Err(e),
    }
}

/// Reads a `str` object without copying. The returned slice aliases `b` and
/// must not outlive it.
pub fn read_string_zc(b: &[u8]) -> Result<(&[u8], &[u8])> {
    let l = b.len();
    if l < 1 {
        return Err(Error::ShortBytes);
    }
    let lead = b[0];
    let (read, rest) = if is_fixstr(lead) {
        (rfixstr(lead) as usize, &b[1..])
    } else {
        match lead {
            STR8 => {
                if l < 2 {
                    return Err(Error::ShortBytes);
                }
                (b[1] as usize, &b[2..])
            }
            STR16 => {
                if l < 3 {
                    return Err(Error::ShortBytes);
                }
                (be16(&b[1..]) as usize, &b[3..])
            }
            STR32 => {
                if l < 5 {
                    return Err(Error::ShortBytes);
                }
                (be32(&b[1..]) as usize, &b[5..])
            }
            _ => return Err(bad_prefix(Type::Str, lead)),
        }
    };
    if rest.len() < read {
        return Err(Error::ShortBytes);
    }
    Ok((&rest[..read], &rest[read..]))
}

/// Reads a `bin` object without copying. The returned slice aliases `b`.
pub fn read_bytes_zc(b: &[u8]) -> Result<(&[u8], &[u8])> {
    let l = b.len();
    if l < 1 {
        return Err(Error::ShortBytes);
    }
    let (read, rest) = match b[0] {
        BIN8 => {
            if l < 2 {
                return Err(Error::ShortBytes);
            }
            (b[1] as usize, &b[2..])
        }
        BIN16 => {
            if l < 3 {
                return Err(Error::ShortBytes);
            }
            (be16(&b[1..]) as usize, &b[3..])
        }
        BIN32 => {
            if l < 5 {
                return Err(Error::ShortBytes);
            }
            (be32(&b[1..]) as usize, &b[5..])
        }
        lead => return Err(bad_prefix(Type::Bin, lead)),
    };
    if rest.len() < read {
        return Err(Error::ShortBytes);
    }
    Ok((&rest[..read], &rest[read..]))
}

/// Reads a `bin` object into `scratch`, reusing its capacity, and returns
/// the remaining bytes.
pub fn read_bytes_bytes<'a>(b: &'a [u8], scratch: &mut Vec<u8>) -> Result<&'a [u8]> {
    let (v, o) = read_bytes_zc(b)?;
    scratch.clear();
    scratch.extend_from_slice(v);
    Ok(o)
}

/// Reads a `str` object into `scratch`, reusing its capacity, and returns
/// the remaining bytes.
pub fn read_string_as_bytes<'a>(b: &'a [u8], scratch: &mut Vec<u8>) -> Result<&'a [u8]> {
    let (v, o) = read_string_zc(b)?;
    scratch.clear();
    scratch.extend_from_slice(v);
    Ok(o)
}

/// Reads a `str` object as an owned string. Invalid UTF-8 is replaced, not
/// rejected; the wire format does not enforce well-formedness.
pub fn read_string_bytes(b: &[u8]) -> Result<(String, &[u8])> {
    let (v, o) = read_string_zc(b)?;
    Ok((String::from_utf8_lossy(v).into_owned(), o))
}

/// Reads a `bin` object whose length must equal `into.len()`.
pub fn read_exact_bytes<'a>(b: &'a [u8], into: &mut [u8]) -> Result<&'a [u8]> {
    let (v, o) = read_bytes_zc(b)?;
    if v.len() != into.len() {
        return Err(Error::ArrayError {
            wanted: into.len() as u32,
            got: v.len() as u32,
        });
    }
    into.copy_from_slice(v);
    Ok(o)
}

/// Reads a complex64 extension object (fixext8 envelope).
pub fn read_complex64_bytes(b: &[u8]) -> Result<(Complex64, &[u8])> {
    if b.len() < 10 {
        return Err(Error::ShortBytes);
    }
    if b[0] != FIXEXT8 {
        return Err(bad_prefix(Type::Complex64, b[0]));
    }
    if b[1] as i8 != COMPLEX64_EXTENSION {
        return Err(Error::ExtensionTypeError {
            got: b[1] as i8,
            want: COMPLEX64_EXTENSION,
        });
    }
    let re = f32::from_bits(u32::from_be_bytes([b[2], b[3], b[4], b[5]]));
    let im = f32::from_bits(u32::from_be_bytes([b[6], b[7], b[8], b[9]]));
    Ok((Complex64 { re, im }, &b[10..]))
}

/// Reads a complex128 extension object (fixext16 envelope).
pub fn read_complex128_bytes(b: &[u8]) -> Result<(Complex128, &[u8])> {
    if b.len() < 18 {
        return Err(Error::ShortBytes);
    }
    if b[0] != FIXEXT16 {
        return Err(bad_prefix(Type::Complex128, b[0]));
    }
    if b[1] as i8 != COMPLEX128_EXTENSION {
        return Err(Error::ExtensionTypeError {
            got: b[1] as i8,
            want: COMPLEX128_EXTENSION,
        });
    }
    let re = f64::from_bits(u64::from_be_bytes([
        b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9],
    ]));
    let im = f64::from_bits(u64::from_be_bytes([
        b[10], b[11], b[12], b[13], b[14], b[15], b[16], b[17],
    ]));
    Ok((Complex128 { re, im }, &b[18..]))
}

/// Reads a timestamp extension object.
///
/// The wire form is always the 12-byte envelope: `ext8, 12, tag`, then
/// 8 bytes of seconds and 4 bytes of nanoseconds, both big-endian.
pub fn read_time_bytes(b: &[u8]) -> Result<(DateTime<Utc>, &[u8])> {
    if b.len() < 15 {
        return Err(Error::ShortBytes);
    }
    if b[0] != EXT8 || b[1] != 12 {
        return Err(bad_prefix(Type::Time, b[0]));
    }
    if b[2] as i8 != TIME_EXTENSION {
        return Err(Error::ExtensionTypeError {
            got: b[2] as i8,
            want: TIME_EXTENSION,
        });
    }
    let sec = i64::from_be_bytes([b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10]]);
    let nsec = u32::from_be_bytes([b[11], b[12], b[13], b[14]]);
    let t = Utc
        .timestamp_opt(sec, nsec)
        .single()
        .ok_or(Error::InvalidTimestamp)?;
    Ok((t, &b[15..]))
}

/// Reads a map of string keys to dynamically-typed values.
///
/// `old` is cleared and refilled, reusing its backing storage; fresh callers
/// pass an empty map and get header-sized capacity reserved up front.
pub fn read_map_str_value_bytes<'a>(
    b: &'a [u8],
    old: &mut IndexMap<String, Value>,
) -> Result<&'a [u8]> {
    let (sz, mut o) = read_map_header_bytes(b)?;
    old.clear();
    old.reserve(sz as usize);
    for _ in 0..sz {
        if o.is_empty() {
            return Err(Error::ShortBytes);
        }
        let (key, rest) = read_map_key_zc(o)?;
        let (val, rest) = read_value_bytes(rest)?;
        old.insert(String::from_utf8_lossy(key).into_owned(), val);
        o = rest;
    }
    Ok(o)
}

/// Reads the next object, whatever it is, reconstructing its on-the-wire
/// shape as a [`Value`].
///
/// Unknown extensions consult the process-wide registry: a registered
/// factory decodes the payload (so registered invariants are checked), and
/// the object surfaces as a [`RawExtension`] either way.
pub fn read_value_bytes(b: &[u8]) -> Result<(Value, &[u8])> {
    if b.is_empty() {
        return Err(Error::ShortBytes);
    }
    match next_type(b) {
        Type::Map => {
            let mut m = IndexMap::new();
            let o = read_map_str_value_bytes(b, &mut m)?;
            Ok((Value::Map(m), o))
        }
        Type::Array => {
            let (sz, mut o) = read_array_header_bytes(b)?;
            let mut arr = Vec::with_capacity(sz as usize);
            for _ in 0..sz {
                let (el, rest) = read_value_bytes(o)?;
                arr.push(el);
                o = rest;
            }
            Ok((Value::Array(arr), o))
        }
        Type::Float32 => {
            let (f, o) = read_float32_bytes(b)?;
            Ok((Value::F32(f), o))
        }
        Type::Float64 => {
            let (f, o) = read_float64_bytes(b)?;
            Ok((Value::F64(f), o))
        }
        Type::Int => {
            let (i, o) = read_int64_bytes(b)?;
            Ok((Value::Int(i), o))
        }
        Type::Uint => {
            let (u, o) = read_uint64_bytes(b)?;
            Ok((Value::Uint(u), o))
        }
        Type::Bool => {
            let (v, o) = read_bool_bytes(b)?;
            Ok((Value::Bool(v), o))
        }
        Type::Time => {
            let (t, o) = read_time_bytes(b)?;
            Ok((Value::Time(t), o))
        }
        Type::Complex64 => {
            let (c, o) = read_complex64_bytes(b)?;
            Ok((Value::Complex64(c), o))
        }
        Type::Complex128 => {
            let (c, o) = read_complex128_bytes(b)?;
            Ok((Value::Complex128(c), o))
        }
        Type::Extension => {
            let tag = peek_extension_type(b)?;
            if let Some(factory) = lookup_extension(tag) {
                let mut e = factory();
                let o = read_ext_bytes(b, e.as_mut())?;
                let mut data = Vec::with_capacity(e.len());
                e.marshal_binary_to(&mut data)?;
                return Ok((Value::Ext(RawExtension { typ: tag, data }), o));
            }
            let mut e = RawExtension {
                typ: tag,
                data: Vec::new(),
            };
            let o = read_ext_bytes(b, &mut e)?;
            Ok((Value::Ext(e), o))
        }
        Type::Nil => {
            let o = read_nil_bytes(b)?;
            Ok((Value::Nil, o))
        }
        Type::Bin => {
            let (v, o) = read_bytes_zc(b)?;
            Ok((Value::Bin(v.to_vec()), o))
        }
        Type::Str => {
            let (s, o) = read_string_bytes(b)?;
            Ok((Value::Str(s), o))
        }
        Type::Invalid => Err(Error::InvalidPrefix(b[0])),
    }
}

/// Skips exactly one object, returning the remaining bytes.
///
/// Nested maps and arrays are consumed by counting objects, not by
/// recursing on structure, so work is linear in the number of objects and
/// the stack stays flat on adversarially deep inputs.
pub fn skip(b: &[u8]) -> Result<&[u8]> {
    let mut b = b;
    let mut objs: u64 = 1;
    while objs > 0 {
        let (sz, more) = get_size(b)?;
        if b.len() < sz {
            return Err(Error::ShortBytes);
        }
        b = &b[sz..];
        objs = objs - 1 + more;
    }
    Ok(b)
}

/// Returns `(skip this many bytes, then skip this many further objects)`.
fn get_size(b: &[u8]) -> Result<(usize, u64)> {
    if b.is_empty() {
        return Err(Error::ShortBytes);
    }
    let lead = b[0];
    let spec = classify(lead);
    let size = spec.size as usize;
    match spec.mode {
        LengthMode::Invalid => Err(Error::InvalidPrefix(lead)),
        LengthMode::Fixed(n) => Ok((size, n as u64)),
        mode => {
            // the trailing length field must be present to size the object
            if b.len() < size {
                return Err(Error::ShortBytes);
            }
            match mode {
                LengthMode::Extra8 => Ok((size + b[1] as usize, 0)),
                LengthMode::Extra16 => Ok((size + be16(&b[1..]) as usize, 0)),
                LengthMode::Extra32 => Ok((size + be32(&b[1..]) as usize, 0)),
                LengthMode::Map16 => Ok((size, 2 * be16(&b[1..]) as u64)),
                LengthMode::Map32 => Ok((size, 2 * be32(&b[1..]) as u64)),
                LengthMode::Array16 => Ok((size, be16(&b[1..]) as u64)),
                LengthMode::Array32 => Ok((size, be32(&b[1..]) as u64)),
                LengthMode::Fixed(_) | LengthMode::Invalid => unreachable!(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::*;

    #[test]
    fn next_type_upgrades_well_known_extensions() {
        let mut b = Vec::new();
        append_time(&mut b, Utc.timestamp_opt(1, 0).single().unwrap());
        assert_eq!(next_type(&b), Type::Time);
        b.clear();
        append_complex64(&mut b, Complex64 { re: 1.0, im: 2.0 });
        assert_eq!(next_type(&b), Type::Complex64);
        b.clear();
        append_complex128(&mut b, Complex128 { re: 1.0, im: 2.0 });
        assert_eq!(next_type(&b), Type::Complex128);
        assert_eq!(next_type(&[]), Type::Invalid);
        assert_eq!(next_type(&[0xc3]), Type::Bool);
    }

    #[test]
    fn int_widening_and_overflow() {
        let mut b = Vec::new();
        append_uint(&mut b, 256);
        let err = read_int8_bytes(&b).unwrap_err();
        assert!(matches!(err, Error::IntOverflow { value: 256, bits: 8 }));
        let (v, rest) = read_int64_bytes(&b).unwrap();
        assert_eq!(v, 256);
        assert!(rest.is_empty());
    }

    #[test]
    fn uint64_spill_into_int64_overflows() {
        let mut b = Vec::new();
        append_uint(&mut b, u64::MAX);
        let err = read_int64_bytes(&b).unwrap_err();
        assert!(matches!(
            err,
            Error::UintOverflow {
                value: u64::MAX,
                bits: 64
            }
        ));
    }

    #[test]
    fn uint_rejects_signed_prefixes() {
        let mut b = Vec::new();
        append_int(&mut b, -5);
        assert!(matches!(
            read_uint64_bytes(&b).unwrap_err(),
            Error::TypeError {
                method: Type::Uint,
                ..
            }
        ));
    }

    #[test]
    fn float64_widens_float32() {
        let mut b = Vec::new();
        append_float32(&mut b, 2.5);
        let (f, rest) = read_float64_bytes(&b).unwrap();
        assert_eq!(f, 2.5);
        assert!(rest.is_empty());
    }

    #[test]
    fn string_zc_aliases_input() {
        let b = [0xa3, b'a', b'b', b'c', 0x01];
        let (s, rest) = read_string_zc(&b).unwrap();
        assert_eq!(s, b"abc");
        assert_eq!(rest, [0x01]);
        assert_eq!(s.as_ptr(), b[1..].as_ptr());
    }

    #[test]
    fn map_key_falls_back_to_bin() {
        let mut b = Vec::new();
        append_bytes(&mut b, b"key");
        let (k, rest) = read_map_key_zc(&b).unwrap();
        assert_eq!(k, b"key");
        assert!(rest.is_empty());
    }

    #[test]
    fn exact_bytes_mismatch() {
        let mut b = Vec::new();
        append_bytes(&mut b, &[1, 2, 3]);
        let mut into = [0u8; 4];
        assert!(matches!(
            read_exact_bytes(&b, &mut into).unwrap_err(),
            Error::ArrayError { wanted: 4, got: 3 }
        ));
        let mut into = [0u8; 3];
        let rest = read_exact_bytes(&b, &mut into).unwrap();
        assert_eq!(into, [1, 2, 3]);
        assert!(rest.is_empty());
    }

    #[test]
    fn skip_consumes_nested_structures() {
        // {"k": []}
        let b = [0x81, 0xa1, b'k', 0x90];
        assert!(skip(&b).unwrap().is_empty());
    }

    #[test]
    fn skip_is_linear_on_deep_nesting() {
        // 10_000 nested single-element arrays around one nil
        let mut b = vec![0x91u8; 10_000];
        b.push(NIL);
        assert!(skip(&b).unwrap().is_empty());
    }

    #[test]
    fn skip_rejects_truncated_objects() {
        let b = [0x92, 0x01];
        assert!(matches!(skip(&b).unwrap_err(), Error::ShortBytes));
    }

    #[test]
    fn time_roundtrip() {
        let t = Utc.timestamp_opt(1_600_000_000, 123_456_789).single().unwrap();
        let mut b = Vec::new();
        append_time(&mut b, t);
        assert_eq!(b.len(), 15);
        let (back, rest) = read_time_bytes(&b).unwrap();
        assert_eq!(back, t);
        assert!(rest.is_empty());
    }

    #[test]
    fn complex_roundtrip() {
        let c = Complex128 { re: 1.5, im: -2.5 };
        let mut b = Vec::new();
        append_complex128(&mut b, c);
        let (back, rest) = read_complex128_bytes(&b).unwrap();
        assert_eq!(back, c);
        assert!(rest.is_empty());
    }

    #[test]
    fn complex_wrong_tag() {
        let mut b = Vec::new();
        append_complex64(&mut b, Complex64 { re: 0.0, im: 0.0 });
        b[1] = 9; // corrupt the tag, keep the envelope
        assert!(matches!(
            read_complex64_bytes(&b).unwrap_err(),
            Error::ExtensionTypeError { got: 9, .. }
        ));
    }

    #[test]
    fn value_reads_what_was_written() {
        let mut m = IndexMap::new();
        m.insert("a".to_owned(), Value::Int(1));
        m.insert("b".to_owned(), Value::Array(vec![Value::Nil, Value::Bool(true)]));
        let v = Value::Map(m);
        let mut b = Vec::new();
        append_value(&mut b, &v);
        let (back, rest) = read_value_bytes(&b).unwrap();
        assert_eq!(back, v);
        assert!(rest.is_empty());
    }

    #[test]
    fn map_reuse_keeps_storage() {
        let mut b = Vec::new();
        append_value(&mut b, &Value::Map(IndexMap::from([
            ("x".to_owned(), Value::Int(1)),
        ])));
        let mut m = IndexMap::new();
        m.insert("stale".to_owned(), Value::Nil);
        let rest = read_map_str_value_bytes(&b, &mut m).unwrap();
        assert!(rest.is_empty());
        assert_eq!(m.len(), 1);
        assert_eq!(m["x"], Value::Int(1));
    }
}
