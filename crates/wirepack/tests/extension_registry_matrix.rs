//! Registry-dependent behavior gets its own binary: registrations are
//! process-wide, and these tests must not leak into the unregistered-path
//! matrices.

use wirepack::write::append_ext;
use wirepack::{
    read_value_bytes, register_extension, write_as_json, Error, Extension, RawExtension, Result,
    Value,
};

/// A little-endian u32 counter carried as extension type 42.
#[derive(Debug, Default)]
struct Counter {
    n: u32,
}

impl Extension for Counter {
    fn ext_type(&self) -> i8 {
        42
    }

    fn len(&self) -> usize {
        4
    }

    fn marshal_binary_to(&self, into: &mut Vec<u8>) -> Result<()> {
        into.extend_from_slice(&self.n.to_le_bytes());
        Ok(())
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != 4 {
            return Err(Error::ArrayError {
                wanted: 4,
                got: data.len() as u32,
            });
        }
        self.n = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        Ok(())
    }

    fn marshal_json(&self) -> Option<String> {
        Some(format!("{{\"counter\":{}}}", self.n))
    }
}

fn register() {
    register_extension(42, || Box::<Counter>::default());
}

#[test]
fn registered_factory_decodes_and_revalidates() {
    register();
    let mut b = Vec::new();
    append_ext(&mut b, &Counter { n: 7 }).unwrap();
    let (v, rest) = read_value_bytes(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(
        v,
        Value::Ext(RawExtension {
            typ: 42,
            data: 7u32.to_le_bytes().to_vec(),
        })
    );
}

#[test]
fn registered_factory_rejects_bad_payloads() {
    register();
    // ext8 envelope, type 42, 3-byte payload: the Counter decoder wants 4
    let b = [0xc7, 3, 42, 1, 2, 3];
    assert!(matches!(
        read_value_bytes(&b).unwrap_err(),
        Error::ArrayError { wanted: 4, got: 3 }
    ));
}

#[test]
fn registered_json_override_wins() {
    register();
    let mut b = Vec::new();
    append_ext(&mut b, &Counter { n: 9 }).unwrap();
    let mut out = Vec::new();
    write_as_json(&mut out, &b).unwrap();
    assert_eq!(out, b"{\"counter\":9}");
}
