//! Maximum wire sizes per primitive, and the runtime size fallback.
//!
//! Generated `msgsize` code charges every variable-width header at its
//! largest form, so the computed bound is monotone and cheap: it equals the
//! encoded length only when every length-variable field picks its maximum
//! wire form.

use crate::value::Value;

pub const INT8_SIZE: usize = 2;
pub const INT16_SIZE: usize = 3;
pub const INT32_SIZE: usize = 5;
pub const INT64_SIZE: usize = 9;
pub const INT_SIZE: usize = INT64_SIZE;

pub const UINT8_SIZE: usize = 2;
pub const UINT16_SIZE: usize = 3;
pub const UINT32_SIZE: usize = 5;
pub const UINT64_SIZE: usize = 9;
pub const UINT_SIZE: usize = UINT64_SIZE;

pub const FLOAT32_SIZE: usize = 5;
pub const FLOAT64_SIZE: usize = 9;

pub const BOOL_SIZE: usize = 1;
pub const NIL_SIZE: usize = 1;

/// ext8 + length + tag + 8-byte seconds + 4-byte nanoseconds.
pub const TIME_SIZE: usize = 15;
pub const COMPLEX64_SIZE: usize = 10;
pub const COMPLEX128_SIZE: usize = 18;

// Largest header forms (str32/bin32/map32/array32, ext32 + tag).
pub const STR_PREFIX_SIZE: usize = 5;
pub const BYTES_PREFIX_SIZE: usize = 5;
pub const MAP_HEADER_SIZE: usize = 5;
pub const ARRAY_HEADER_SIZE: usize = 5;
pub const EXTENSION_PREFIX_SIZE: usize = 6;

/// Returns an upper bound on the encoded size of a dynamically-typed value.
///
/// This is the runtime fallback generated code reaches for when a field's
/// static type is an opaque interface.
pub fn guess_size(v: &Value) -> usize {
    match v {
        Value::Nil => NIL_SIZE,
        Value::Bool(_) => BOOL_SIZE,
        Value::Int(_) => INT64_SIZE,
        Value::Uint(_) => UINT64_SIZE,
        Value::F32(_) => FLOAT32_SIZE,
        Value::F64(_) => FLOAT64_SIZE,
        Value::Str(s) => STR_PREFIX_SIZE + s.len(),
        Value::Bin(b) => BYTES_PREFIX_SIZE + b.len(),
        Value::Array(a) => ARRAY_HEADER_SIZE + a.iter().map(guess_size).sum::<usize>(),
        Value::Map(m) => {
            MAP_HEADER_SIZE
                + m.iter()
                    .map(|(k, v)| STR_PREFIX_SIZE + k.len() + guess_size(v))
                    .sum::<usize>()
        }
        Value::Time(_) => TIME_SIZE,
        Value::Complex64(_) => COMPLEX64_SIZE,
        Value::Complex128(_) => COMPLEX128_SIZE,
        Value::Ext(e) => EXTENSION_PREFIX_SIZE + e.data.len(),
    }
}
