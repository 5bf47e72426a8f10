//! Evaluator for the tilde language.
//!
//! Walks the flat AST produced by `tilde_parse` and produces [`Value`]s.
//!
//! # Architecture
//!
//! - [`Environment`]: arena of single-assignment scopes chained to their
//!   parents. The root scope holds the [`Builtin`]s.
//! - [`Interpreter`]: the tree walker. One interpreter is one evaluation
//!   session and owns every scope created during it.
//! - [`matching`]: Cartesian enumeration behind `join`, and the
//!   [`ActiveCombination`] chain placeholders resolve against.
//! - [`operators`] and [`builtins`]: the arithmetic, comparison and math
//!   functions every operator call bottoms out in.
//! - [`HostObject`]: hook for caller-supplied values with attributes,
//!   elements and operator overloads.
//!
//! Errors escaping calls, subscripts, attribute accesses and name lookups
//! carry the source line they passed through; see [`EvalError::line`].

pub mod builtins;
mod environment;
mod errors;
mod host;
mod interpreter;
pub mod matching;
pub mod operators;
mod value;

pub use builtins::Builtin;
pub use environment::{AlreadyDefined, Environment, ScopeId, ScopeMark};
pub use errors::{ErrorKind, EvalError, EvalResult};
pub use host::{HostError, HostObject};
pub use interpreter::{EvalConfig, Interpreter, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use matching::{ActiveCombination, CartesianProduct};
pub use operators::{BinaryOp, UnaryOp};
pub use value::{
    FunctionValue, Heap, Identity, Record, SessionId, SliceValue, Value, ValueDisplay,
};
