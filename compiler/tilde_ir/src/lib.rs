//! Intermediate representation for the tilde language.
//!
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`Span`] / [`LineIndex`]: source positions
//! - [`TokenKind`] / [`TokenList`]: lexer output
//! - [`ast`] + [`ExprArena`]: the flat, index-based AST
//! - [`Matching`]: per-`join` candidate registry filled in while lowering
//! - [`pretty`]: render an AST back to source

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
pub mod pretty;
mod span;
mod token;

pub use arena::{ExprArena, Matching};
pub use ast::{Assignment, BindOp, Expr, ExprKind, Module, Placeholder};
pub use ids::{ExprId, ExprRange, MatchingId, NameRange, PatternTag, StmtRange};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind, TokenList};
