//! Line-oriented emitter for generated Rust.
//!
//! The size visitor appends terms onto an open right-hand side and only
//! decides later that a new statement begins. The printer papers over that:
//! whenever a chunk starting with a newline is printed while an expression
//! is still open, the previous statement is closed with `;` first. A line
//! is considered open unless it ends in `{`, `}`, `;`, or is a comment.

#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    idents: u32,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `s`, closing any open statement first when `s` starts a new
    /// line.
    pub fn print(&mut self, s: &str) {
        if s.starts_with('\n') {
            self.terminate_statement();
        }
        self.out.push_str(s);
    }

    fn terminate_statement(&mut self) {
        let last_line = self.out.rsplit('\n').next().unwrap_or("");
        if last_line.trim_start().starts_with("//") {
            return;
        }
        match last_line.trim_end().chars().last() {
            None | Some('{') | Some('}') | Some(';') => {}
            _ => self.out.push(';'),
        }
    }

    /// Emits a single-line comment.
    pub fn comment(&mut self, s: &str) {
        self.terminate_statement();
        self.out.push_str("\n// ");
        self.out.push_str(s);
    }

    /// Declares a default-initialized local.
    pub fn declare(&mut self, name: &str, typ: &str) {
        self.print(&format!("\nlet {name}: {typ} = Default::default()"));
    }

    /// Emits the bare accumulator as the function's trailing expression and
    /// closes the function body.
    pub fn naked_return(&mut self) {
        self.terminate_statement();
        self.out.push_str("\ns\n}");
    }

    /// Closes one open block.
    pub fn close_block(&mut self) {
        self.print("\n}");
    }

    /// Returns a fresh identifier unique within the emitted function.
    pub fn rand_ident(&mut self) -> String {
        self.idents += 1;
        format!("za{:04}", self.idents)
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
