//! Typed element tree describing a user-declared aggregate type.
//!
//! The tree is syntactic: it is derived from a struct declaration, so it is
//! finite and cycle-free, and plain owned `Box` nesting models it directly.
//! Every element carries a `varname` naming the live binding the generated
//! code reads the value from; the driver that builds the tree is
//! responsible for keeping those bindings in scope.

use wirepack::size::*;

/// Leaf primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Opaque interface value; sized at runtime via `wirepack::guess_size`.
    Intf,
    /// An extension object; sized via its `len()`.
    Ext,
    /// Another generated aggregate; sized via its own `msgsize()`.
    Ident,
    Bytes,
    String,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Nil,
    Time,
    Complex64,
    Complex128,
}

impl Primitive {
    /// The maximum wire size, for primitives whose size does not depend on
    /// the value. `None` for runtime-sized kinds.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Primitive::Intf
            | Primitive::Ext
            | Primitive::Ident
            | Primitive::Bytes
            | Primitive::String => None,
            Primitive::Bool => Some(BOOL_SIZE),
            Primitive::Int8 => Some(INT8_SIZE),
            Primitive::Int16 => Some(INT16_SIZE),
            Primitive::Int32 => Some(INT32_SIZE),
            Primitive::Int64 => Some(INT64_SIZE),
            Primitive::Uint8 => Some(UINT8_SIZE),
            Primitive::Uint16 => Some(UINT16_SIZE),
            Primitive::Uint32 => Some(UINT32_SIZE),
            Primitive::Uint64 => Some(UINT64_SIZE),
            Primitive::Float32 => Some(FLOAT32_SIZE),
            Primitive::Float64 => Some(FLOAT64_SIZE),
            Primitive::Nil => Some(NIL_SIZE),
            Primitive::Time => Some(TIME_SIZE),
            Primitive::Complex64 => Some(COMPLEX64_SIZE),
            Primitive::Complex128 => Some(COMPLEX128_SIZE),
        }
    }
}

/// How a shimmed field converts between its declared type and the base
/// MessagePack-representable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimMode {
    /// A `From` conversion usable inline in an expression.
    Cast,
    /// A conversion that needs a scratch local in the generated code.
    Convert,
}

#[derive(Debug, Clone)]
pub struct StructField {
    pub tag: String,
    pub elem: Elem,
}

#[derive(Debug, Clone)]
pub struct Struct {
    pub fields: Vec<StructField>,
    /// Tuple structs encode as an array, skipping per-field tags.
    pub as_tuple: bool,
    pub varname: String,
    /// Receiver type token for the emitted `impl` block.
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub struct Ptr {
    pub inner: Box<Elem>,
    pub varname: String,
}

#[derive(Debug, Clone)]
pub struct Slice {
    pub els: Box<Elem>,
    /// Loop index identifier.
    pub index: String,
    pub varname: String,
}

/// A statically-sized array; `size` is an expression valid in the generated
/// code (usually a constant name or literal).
#[derive(Debug, Clone)]
pub struct Array {
    pub els: Box<Elem>,
    pub size: String,
    pub index: String,
    pub varname: String,
}

/// A map with string keys.
#[derive(Debug, Clone)]
pub struct Map {
    pub value: Box<Elem>,
    pub key_ident: String,
    pub val_ident: String,
    pub varname: String,
}

#[derive(Debug, Clone)]
pub struct BaseElem {
    pub value: Primitive,
    pub varname: String,
    /// Whether the declared type shims to a base type.
    pub convert: bool,
    pub shim_mode: ShimMode,
    /// The base type token, used for scratch declarations and casts.
    pub base_type: String,
}

impl BaseElem {
    pub fn new(value: Primitive, varname: impl Into<String>) -> Self {
        Self {
            value,
            varname: varname.into(),
            convert: false,
            shim_mode: ShimMode::Cast,
            base_type: String::new(),
        }
    }

    /// The varname rendered through its inline base-type conversion. The
    /// qualified form stays valid for generic base types like `Vec<u8>`.
    pub fn to_base_convert(&self) -> String {
        format!("<{}>::from({})", self.base_type, self.varname)
    }
}

#[derive(Debug, Clone)]
pub enum Elem {
    Struct(Struct),
    Ptr(Ptr),
    Slice(Slice),
    Array(Array),
    Map(Map),
    Base(BaseElem),
}

impl Elem {
    /// The binding the generated code reads this element's value from.
    pub fn varname(&self) -> &str {
        match self {
            Elem::Struct(s) => &s.varname,
            Elem::Ptr(p) => &p.varname,
            Elem::Slice(s) => &s.varname,
            Elem::Array(a) => &a.varname,
            Elem::Map(m) => &m.varname,
            Elem::Base(b) => &b.varname,
        }
    }
}

/// Receiver type token for the method emitted over `e`.
pub fn imut_method_receiver(e: &Elem) -> &str {
    match e {
        Elem::Struct(s) => &s.type_name,
        Elem::Ptr(p) => imut_method_receiver(&p.inner),
        Elem::Base(b) => &b.base_type,
        _ => "Self",
    }
}
