//! Decoder and transcoder error type.

use thiserror::Error;

use crate::prefix::{Type, SIZES};

/// Result type for wirepack operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The buffer ended inside an object.
    #[error("msgpack: too few bytes left to read object")]
    ShortBytes,

    /// The caller asked for one type but the wire prefix denotes another.
    #[error("msgpack: attempted to decode type {encoded} with method for {method}")]
    TypeError { method: Type, encoded: Type },

    /// The prefix byte is not assigned by the wire format.
    #[error("msgpack: unrecognized type prefix {0:#04x}")]
    InvalidPrefix(u8),

    /// The wire value fits the encoding but not the target signed width.
    #[error("msgpack: {value} overflows int{bits}")]
    IntOverflow { value: i64, bits: u8 },

    /// The wire value fits the encoding but not the target unsigned width.
    #[error("msgpack: {value} overflows uint{bits}")]
    UintOverflow { value: u64, bits: u8 },

    /// Extension envelope of the right shape carries the wrong type tag.
    #[error("msgpack: wanted extension type {want}; got {got}")]
    ExtensionTypeError { got: i8, want: i8 },

    /// `read_exact_bytes` length mismatch.
    #[error("msgpack: wanted array of size {wanted}; got {got}")]
    ArrayError { wanted: u32, got: u32 },

    /// Decoded seconds/nanoseconds do not form a representable timestamp.
    #[error("msgpack: timestamp out of range")]
    InvalidTimestamp,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The logical type denoted by a leading byte.
pub(crate) fn get_type(lead: u8) -> Type {
    SIZES[lead as usize].typ
}

/// A `TypeError` for a method that expected `method` but saw `lead`.
pub(crate) fn bad_prefix(method: Type, lead: u8) -> Error {
    Error::TypeError {
        method,
        encoded: get_type(lead),
    }
}
