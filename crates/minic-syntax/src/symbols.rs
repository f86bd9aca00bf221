//! Symbol and function tables shared by the collector, analyzer, and
//! evaluator.
//!
//! Both tables are insertion-ordered so the report lists globals and
//! functions in declaration order.

use indexmap::IndexMap;

use crate::ast::{Param, Stmt, Ty};

/// Declared global variables: name → declared type.
pub type SymbolTable = IndexMap<String, Ty>;

/// Declared functions: name → recorded signature.
pub type FnTable = IndexMap<String, FnSig>;

/// Signature and body of a declared function, cloned out of the AST by the
/// declaration collector.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub params: Vec<Param>,
    pub return_type: Ty,
    pub body: Vec<Stmt>,
}
