//! Diagnostics accumulation for the MiniC pipeline.
//!
//! Every phase collects human-readable `errors` and `warnings` instead of
//! aborting: the lexer keeps scanning past illegal characters, the parser
//! keeps the partial tree it built, the analyzer reports everything it can
//! see, and the evaluator records runtime errors while yielding default
//! values. The driver concatenates the per-phase lists in pipeline order
//! (lexer, parser, collector, analyzer, evaluator) so message order always
//! reflects discovery order.
//!
//! Errors block evaluation; warnings never block anything.
//!
//! # Examples
//!
//! ```rust
//! use minic_syntax::diag::Diagnostics;
//!
//! let mut lex = Diagnostics::new();
//! lex.error("Illegal character '@' at line 1");
//!
//! let mut parse = Diagnostics::new();
//! parse.warning("Redeclaration of variable x");
//!
//! let mut all = Diagnostics::new();
//! all.extend(lex);
//! all.extend(parse);
//! assert!(all.has_errors());
//! assert_eq!(all.warnings.len(), 1);
//! ```

/// Ordered error and warning lists for one pipeline phase.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Record a warning.
    pub fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Append another phase's diagnostics, preserving insertion order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
