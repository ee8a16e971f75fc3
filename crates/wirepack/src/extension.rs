//! Extension objects and the process-wide extension registry.
//!
//! Negative extension type tags are reserved by the wire format; the
//! well-known tags below sit in that range and are stable for the lifetime
//! of a deployment. Positive tags are user-definable: register a factory
//! with [`register_extension`] before any decoding begins, and the generic
//! decode paths will construct registered targets by tag.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::error::{bad_prefix, Error, Result};
use crate::prefix::{classify, LengthMode, Type, EXT16, EXT32, EXT8, FIXEXT1, FIXEXT16, FIXEXT2, FIXEXT4, FIXEXT8};

/// Extension type tag for [`crate::Complex64`] values.
pub const COMPLEX64_EXTENSION: i8 = -3;
/// Extension type tag for [`crate::Complex128`] values.
pub const COMPLEX128_EXTENSION: i8 = -4;
/// Extension type tag for timestamps (12-byte seconds + nanoseconds form).
pub const TIME_EXTENSION: i8 = -5;

/// A decodable extension payload.
pub trait Extension: fmt::Debug + Send {
    /// The extension type tag this object encodes as.
    fn ext_type(&self) -> i8;

    /// Encoded payload length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends the payload bytes to `into`.
    fn marshal_binary_to(&self, into: &mut Vec<u8>) -> Result<()>;

    /// Replaces the object's contents with the decoded payload.
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()>;

    /// Custom JSON rendering used by the transcoder. `None` selects the
    /// default `{"type:"N,"data":"<base64>"}` envelope.
    fn marshal_json(&self) -> Option<String> {
        None
    }
}

/// An extension of unknown type: the raw tag and payload bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtension {
    pub typ: i8,
    pub data: Vec<u8>,
}

impl Extension for RawExtension {
    fn ext_type(&self) -> i8 {
        self.typ
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn marshal_binary_to(&self, into: &mut Vec<u8>) -> Result<()> {
        into.extend_from_slice(&self.data);
        Ok(())
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()> {
        self.data.clear();
        self.data.extend_from_slice(data);
        Ok(())
    }
}

/// Constructor for a fresh decode target of a registered extension type.
pub type ExtensionFactory = fn() -> Box<dyn Extension>;

static EXTENSION_REG: Lazy<RwLock<HashMap<i8, ExtensionFactory>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers a factory for the given extension type tag.
///
/// Registrations are additive and must happen before concurrent decoding
/// begins; the table is read-only at steady state.
pub fn register_extension(typ: i8, factory: ExtensionFactory) {
    EXTENSION_REG
        .write()
        .expect("extension registry poisoned")
        .insert(typ, factory);
}

pub(crate) fn lookup_extension(typ: i8) -> Option<ExtensionFactory> {
    EXTENSION_REG
        .read()
        .expect("extension registry poisoned")
        .get(&typ)
        .copied()
}

/// Returns the extension type tag of the next object without consuming it.
pub fn peek_extension_type(b: &[u8]) -> Result<i8> {
    if b.is_empty() {
        return Err(Error::ShortBytes);
    }
    let spec = classify(b[0]);
    if spec.typ != Type::Extension {
        return Err(bad_prefix(Type::Extension, b[0]));
    }
    // fixext carries the tag right after the prefix; the variable-length
    // forms put it after the length field.
    let at = match spec.mode {
        LengthMode::Fixed(_) => 1,
        _ => spec.size as usize - 1,
    };
    if b.len() <= at {
        return Err(Error::ShortBytes);
    }
    Ok(b[at] as i8)
}

/// Parses an extension envelope, returning `(type, payload offset, payload size)`.
pub(crate) fn read_ext_header(b: &[u8]) -> Result<(i8, usize, usize)> {
    if b.len() < 2 {
        return Err(Error::ShortBytes);
    }
    match b[0] {
        FIXEXT1 => Ok((b[1] as i8, 2, 1)),
        FIXEXT2 => Ok((b[1] as i8, 2, 2)),
        FIXEXT4 => Ok((b[1] as i8, 2, 4)),
        FIXEXT8 => Ok((b[1] as i8, 2, 8)),
        FIXEXT16 => Ok((b[1] as i8, 2, 16)),
        EXT8 => {
            if b.len() < 3 {
                return Err(Error::ShortBytes);
            }
            Ok((b[2] as i8, 3, b[1] as usize))
        }
        EXT16 => {
            if b.len() < 4 {
                return Err(Error::ShortBytes);
            }
            Ok((b[3] as i8, 4, u16::from_be_bytes([b[1], b[2]]) as usize))
        }
        EXT32 => {
            if b.len() < 6 {
                return Err(Error::ShortBytes);
            }
            Ok((
                b[5] as i8,
                6,
                u32::from_be_bytes([b[1], b[2], b[3], b[4]]) as usize,
            ))
        }
        lead => Err(bad_prefix(Type::Extension, lead)),
    }
}

/// Decodes the next extension object into `e` and returns the remaining bytes.
///
/// Fails with `ExtensionTypeError` when the envelope is well-formed but the
/// type tag does not match `e.ext_type()`.
pub fn read_ext_bytes<'a>(b: &'a [u8], e: &mut dyn Extension) -> Result<&'a [u8]> {
    let (typ, offset, size) = read_ext_header(b)?;
    if typ != e.ext_type() {
        return Err(Error::ExtensionTypeError {
            got: typ,
            want: e.ext_type(),
        });
    }
    if b.len() < offset + size {
        return Err(Error::ShortBytes);
    }
    e.unmarshal_binary(&b[offset..offset + size])?;
    Ok(&b[offset + size..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_fixext_tag() {
        let b = [FIXEXT1, 7, 0xaa];
        assert_eq!(peek_extension_type(&b).unwrap(), 7);
    }

    #[test]
    fn peek_ext8_tag() {
        let b = [EXT8, 2, 0xf0u8, 1, 2];
        assert_eq!(peek_extension_type(&b).unwrap(), 0xf0u8 as i8);
    }

    #[test]
    fn raw_extension_roundtrip() {
        let b = [FIXEXT2, 9, 0xde, 0xad, 0x01];
        let mut e = RawExtension {
            typ: 9,
            data: Vec::new(),
        };
        let rest = read_ext_bytes(&b, &mut e).unwrap();
        assert_eq!(e.data, [0xde, 0xad]);
        assert_eq!(rest, [0x01]);
    }

    #[test]
    fn wrong_tag_is_extension_type_error() {
        let b = [FIXEXT1, 9, 0xaa];
        let mut e = RawExtension {
            typ: 3,
            data: Vec::new(),
        };
        let err = read_ext_bytes(&b, &mut e).unwrap_err();
        assert!(matches!(
            err,
            Error::ExtensionTypeError { got: 9, want: 3 }
        ));
    }
}
