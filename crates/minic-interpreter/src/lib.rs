//! MiniC interpreter: declaration collection and tree-walking evaluation.
//!
//! This crate owns the runtime half of the pipeline. [`Interpreter::collect_decls`]
//! makes one linear pass over the program's top level, building the global
//! symbol table and function table and evaluating global initializers
//! eagerly. [`Interpreter::run`] then executes the remaining top-level
//! statements, with function calls pushing frames onto a call stack.
//! Runtime errors are recorded and the failing node yields a default value;
//! the top-level loop stops after the first erroring statement.

pub mod flow;
pub mod frame;
pub mod interpreter;
pub mod value;

pub use frame::Frame;
pub use interpreter::Interpreter;
pub use value::Value;
