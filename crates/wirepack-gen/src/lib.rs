//! Size-expression code generator for wirepack aggregate types.
//!
//! Given an element tree describing a user-declared struct, [`SizeGen`]
//! emits a `msgsize` method whose body is a closed-form upper bound on the
//! type's MessagePack-encoded byte count. The bound charges every
//! variable-width header at its maximum form, so
//! `v.msgsize() >= encoded_len(v)` holds for every conforming instance.
//!
//! The tree itself is produced by a driver (typically a declaration
//! parser); this crate only consumes it.

mod elem;
mod printer;
mod size;

pub use elem::{
    imut_method_receiver, Array, BaseElem, Elem, Map, Primitive, Ptr, ShimMode, Slice, Struct,
    StructField,
};
pub use printer::Printer;
pub use size::{SizeGen, SizeState};
