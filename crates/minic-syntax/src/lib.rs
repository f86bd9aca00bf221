//! MiniC language syntax definitions and abstract syntax tree.
//!
//! This crate provides the foundational data model for the MiniC toolchain:
//! token definitions, the typed abstract syntax tree, the static type
//! lattice, the symbol/function tables built by the declaration collector,
//! and the diagnostics accumulator every pipeline phase reports into. All
//! other crates in the workspace depend on these types.
//!
//! # Overview
//!
//! - [`token`]: Token kinds and the position-carrying [`Token`] record
//! - [`ast`]: Typed AST nodes for expressions, statements, and programs
//! - [`symbols`]: Insertion-ordered symbol and function tables
//! - [`diag`]: Accumulating error/warning lists shared by all phases

pub mod ast;
pub mod diag;
pub mod symbols;
pub mod token;

pub use ast::{BinOp, Expr, Function, Param, Program, Stmt, Ty, UnOp};
pub use diag::Diagnostics;
pub use symbols::{FnSig, FnTable, SymbolTable};
pub use token::{Token, TokenKind};
