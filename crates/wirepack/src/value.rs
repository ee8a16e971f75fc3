//! Dynamic value sum type produced by the generic "read any" path.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::extension::RawExtension;

/// A complex number carried by the 10-byte fixext8 extension envelope.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

/// A complex number carried by the 18-byte fixext16 extension envelope.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

/// The on-the-wire shape of a single MessagePack object.
///
/// Integers widen to 64 bits; map key order is preserved from the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
    Time(DateTime<Utc>),
    Complex64(Complex64),
    Complex128(Complex128),
    Ext(RawExtension),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
