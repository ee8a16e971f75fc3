//! MessagePack decoding, JSON transcoding, and wire-size primitives.
//!
//! The byte-slice readers in this crate decode MessagePack from in-memory
//! buffers: each takes a slice and returns the value plus the unconsumed
//! tail. [`Reader`] wraps the same readers behind a cursor for streaming
//! use, including the JSON transcoder. The `size` module carries the
//! per-primitive wire-size constants that generated `msgsize` code and
//! [`guess_size`] are built from.
//!
//! # Example
//!
//! ```
//! use wirepack::{read_value_bytes, write::append_value, Value};
//!
//! let mut buf = Vec::new();
//! append_value(&mut buf, &Value::Array(vec![Value::Int(1), Value::Nil]));
//! let (back, rest) = read_value_bytes(&buf).unwrap();
//! assert_eq!(back, Value::Array(vec![Value::Int(1), Value::Nil]));
//! assert!(rest.is_empty());
//! ```

mod error;
mod json;
mod prefix;
mod raw;
mod read;
mod reader;
mod value;

pub mod extension;
pub mod size;
pub mod write;

pub use error::{Error, Result};
pub use extension::{
    peek_extension_type, read_ext_bytes, register_extension, Extension, ExtensionFactory,
    RawExtension, COMPLEX128_EXTENSION, COMPLEX64_EXTENSION, TIME_EXTENSION,
};
pub use json::write_as_json;
pub use prefix::{classify, ByteSpec, LengthMode, Type};
pub use raw::Raw;
pub use read::{
    is_nil, next_type, read_array_header_bytes, read_bool_bytes, read_byte_bytes,
    read_bytes_bytes, read_bytes_zc, read_complex128_bytes, read_complex64_bytes,
    read_exact_bytes, read_float32_bytes, read_float64_bytes, read_int16_bytes, read_int32_bytes,
    read_int64_bytes, read_int8_bytes, read_map_header_bytes, read_map_key_zc,
    read_map_str_value_bytes, read_nil_bytes, read_string_as_bytes, read_string_bytes,
    read_string_zc, read_time_bytes, read_uint16_bytes, read_uint32_bytes, read_uint64_bytes,
    read_uint8_bytes, read_value_bytes, skip,
};
pub use reader::Reader;
pub use size::guess_size;
pub use value::{Complex128, Complex64, Value};
