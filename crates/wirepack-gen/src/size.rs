//! Size-expression generator.
//!
//! For a given element tree this visitor emits a `msgsize` method whose
//! body computes an upper bound on the MessagePack-encoded byte count of an
//! instance. Consecutive scalar contributions coalesce onto one right-hand
//! side; fixed-size subtrees fold to closed-form arithmetic at generation
//! time instead of runtime loops.

use wirepack::size::{
    ARRAY_HEADER_SIZE, BYTES_PREFIX_SIZE, EXTENSION_PREFIX_SIZE, MAP_HEADER_SIZE, NIL_SIZE,
    STR_PREFIX_SIZE,
};
use wirepack::write::{append_array_header, append_map_header, append_str};

use crate::elem::{imut_method_receiver, BaseElem, Elem, Map, Primitive, Ptr, ShimMode, Slice, Struct};
use crate::printer::Printer;

/// Emission context for the running accumulator `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeState {
    /// No prior write; the next term emits as `s = <term>`.
    Assign,
    /// A new statement begins; the next term emits as `s += <term>`.
    Add,
    /// The current right-hand side continues; the next term appends `+ <term>`.
    Expr,
}

/// Visitor emitting the `msgsize` method for one element tree.
///
/// Not reentrant: the state is shared across the traversal. Run one
/// generator per tree; generators over disjoint trees may run in parallel.
pub struct SizeGen {
    p: Printer,
    state: SizeState,
}

impl Default for SizeGen {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeGen {
    pub fn new() -> Self {
        Self {
            p: Printer::new(),
            state: SizeState::Assign,
        }
    }

    /// Emits the full `impl` block containing `msgsize` for `e` and returns
    /// the generated text.
    pub fn execute(mut self, e: &Elem) -> String {
        self.p
            .print(&format!("\nimpl {} {{", imut_method_receiver(e)));
        self.p.comment(
            "msgsize returns an upper bound estimate of the number of bytes occupied by the serialized message",
        );
        self.p.print("\npub fn msgsize(&self) -> usize {");
        self.p.print("\nlet mut s: usize = 0");
        self.state = SizeState::Assign;
        self.next(e);
        self.p.naked_return();
        self.p.close_block();
        self.p.print("\n");
        self.p.into_string()
    }

    /// Chains a term onto the accumulator according to the current state.
    fn add_constant(&mut self, sz: &str) {
        match self.state {
            SizeState::Assign => {
                self.p.print(&format!("\ns = {sz}"));
                self.state = SizeState::Expr;
            }
            SizeState::Add => {
                self.p.print(&format!("\ns += {sz}"));
                self.state = SizeState::Expr;
            }
            SizeState::Expr => self.p.print(&format!(" + {sz}")),
        }
    }

    fn next(&mut self, e: &Elem) {
        match e {
            Elem::Struct(st) => self.gen_struct(st),
            Elem::Ptr(p) => self.gen_ptr(p),
            Elem::Slice(sl) => self.gen_slice(sl),
            Elem::Array(a) => self.gen_array(a),
            Elem::Map(m) => self.gen_map(m),
            Elem::Base(b) => self.gen_base(b),
        }
    }

    fn gen_struct(&mut self, st: &Struct) {
        let nfields = st.fields.len() as u32;
        if st.as_tuple {
            let mut hdr = Vec::new();
            append_array_header(&mut hdr, nfields);
            self.add_constant(&hdr.len().to_string());
            for f in &st.fields {
                self.next(&f.elem);
            }
        } else {
            let mut hdr = Vec::new();
            append_map_header(&mut hdr, nfields);
            self.add_constant(&hdr.len().to_string());
            let mut tag = Vec::new();
            for f in &st.fields {
                tag.clear();
                append_str(&mut tag, &f.tag);
                self.add_constant(&tag.len().to_string());
                self.next(&f.elem);
            }
        }
    }

    fn gen_ptr(&mut self, p: &Ptr) {
        // inner emission must open its own statement
        self.state = SizeState::Add;
        self.p.print(&format!("\nif {}.is_none() {{", p.varname));
        self.p.print(&format!("\ns += {NIL_SIZE}"));
        self.p.print("\n} else {");
        self.next(&p.inner);
        self.state = SizeState::Add;
        self.p.close_block();
    }

    fn gen_slice(&mut self, sl: &Slice) {
        self.add_constant(&ARRAY_HEADER_SIZE.to_string());

        // Fixed-size elements need no loop: charge length times element size.
        if let Some(expr) = fixed_size_expr(&sl.els) {
            self.add_constant(&format!("({}.len() * ({}))", sl.varname, expr));
            return;
        }

        self.state = SizeState::Add;
        self.range_block(&sl.index, &sl.varname, &sl.els);
        self.state = SizeState::Add;
    }

    fn gen_array(&mut self, a: &crate::elem::Array) {
        self.add_constant(&ARRAY_HEADER_SIZE.to_string());

        if let Some(expr) = fixed_size_expr(&a.els) {
            self.add_constant(&format!("({} * ({}))", a.size, expr));
            return;
        }

        self.state = SizeState::Add;
        self.range_block(&a.index, &a.varname, &a.els);
        self.state = SizeState::Add;
    }

    fn gen_map(&mut self, m: &Map) {
        self.add_constant(&MAP_HEADER_SIZE.to_string());
        self.p.print(&format!("\nif !{}.is_empty() {{", m.varname));
        self.p.print(&format!(
            "\nfor ({}, {}) in {}.iter() {{",
            m.key_ident, m.val_ident, m.varname
        ));
        // the value may go unused when it is fixed-size
        self.p.print(&format!("\nlet _ = &{}", m.val_ident));
        self.p.print(&format!(
            "\ns += {} + {}.len()",
            STR_PREFIX_SIZE, m.key_ident
        ));
        self.state = SizeState::Expr;
        self.next(&m.value);
        self.p.close_block();
        self.p.close_block();
        self.state = SizeState::Add;
    }

    fn gen_base(&mut self, b: &BaseElem) {
        if b.convert && b.shim_mode == ShimMode::Convert {
            self.state = SizeState::Add;
            let vname = self.p.rand_ident();
            self.p.declare(&vname, &b.base_type);
            // keep the original binding used even when only the scratch
            // local feeds the size expression
            self.p.print(&format!("\nlet _ = &{}", b.varname));
            self.p
                .print(&format!("\ns += {}", base_size_expr(b.value, &vname)));
            self.state = SizeState::Expr;
        } else {
            let vname = if b.convert {
                b.to_base_convert()
            } else {
                b.varname.clone()
            };
            self.add_constant(&base_size_expr(b.value, &vname));
        }
    }

    fn range_block(&mut self, index: &str, varname: &str, inner: &Elem) {
        self.p
            .print(&format!("\nfor {index} in 0..{varname}.len() {{"));
        self.next(inner);
        self.p.close_block();
    }
}

/// Strips a leading `&` so method calls land on the place, not a reference
/// expression.
fn strip_ref(s: &str) -> &str {
    s.strip_prefix('&').unwrap_or(s)
}

/// The size expression for one primitive occurrence of `vname`.
fn base_size_expr(value: Primitive, vname: &str) -> String {
    match value {
        Primitive::Ext => format!("{} + {}.len()", EXTENSION_PREFIX_SIZE, strip_ref(vname)),
        Primitive::Intf => format!("wirepack::guess_size(&{vname})"),
        Primitive::Ident => format!("{vname}.msgsize()"),
        Primitive::Bytes => format!("{BYTES_PREFIX_SIZE} + {vname}.len()"),
        Primitive::String => format!("{STR_PREFIX_SIZE} + {vname}.len()"),
        fixed => fixed
            .fixed_size()
            .expect("non-fixed primitive handled above")
            .to_string(),
    }
}

/// Returns a closed-form size expression when every leaf of `e` is
/// fixed-size on the wire.
fn fixed_size_expr(e: &Elem) -> Option<String> {
    match e {
        Elem::Array(a) => {
            let inner = fixed_size_expr(&a.els)?;
            Some(format!("({} * ({}))", a.size, inner))
        }
        Elem::Base(b) => b.value.fixed_size().map(|n| n.to_string()),
        Elem::Struct(st) => {
            let mut body = String::new();
            for f in &st.fields {
                let fs = fixed_size_expr(&f.elem)?;
                if body.is_empty() {
                    body = fs;
                } else {
                    body.push_str(" + ");
                    body.push_str(&fs);
                }
            }
            // header bytes plus every encoded field tag, measured exactly
            let mut hdr = Vec::new();
            append_map_header(&mut hdr, st.fields.len() as u32);
            let mut hdrlen = hdr.len();
            let mut tag = Vec::new();
            for f in &st.fields {
                tag.clear();
                append_str(&mut tag, &f.tag);
                hdrlen += tag.len();
            }
            if body.is_empty() {
                Some(hdrlen.to_string())
            } else {
                Some(format!("{hdrlen} + {body}"))
            }
        }
        // length is only known at runtime
        Elem::Slice(_) | Elem::Map(_) | Elem::Ptr(_) => None,
    }
}
