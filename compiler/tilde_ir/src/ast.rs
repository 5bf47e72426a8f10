//! Flat AST types.
//!
//! Children are referenced by [`ExprId`] into the [`ExprArena`](crate::ExprArena);
//! nothing here owns a boxed subtree. Every node is immutable once the
//! builder hands the arena over to the evaluator.

use crate::{ExprId, ExprRange, MatchingId, Name, NameRange, PatternTag, Span, StmtRange};
use std::fmt;

/// Expression node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Integer literal.
    Int(i64),
    /// Float literal stored as bits (`f64::to_bits`).
    Float(u64),
    /// Name reference. Operators are symbols too: `a + b` is `Call(Symbol(+), [a, b])`.
    Symbol(Name),
    /// `func(args...)`. Arguments reach the callee unevaluated.
    Call { func: ExprId, args: ExprRange },
    /// `object[index]`; `index` may be a `Slice`.
    Subscript { object: ExprId, index: ExprId },
    /// `object.field`
    Attribute { object: ExprId, field: Name },
    /// `start:stop` inside a subscript; either end may be omitted.
    Slice {
        start: Option<ExprId>,
        stop: Option<ExprId>,
    },
    /// `(params) => body`
    Function { params: NameRange, body: ExprId },
    /// `{ stmt; ...; result }`
    Block { stmts: StmtRange, result: ExprId },
    /// `{ name ~ candidates; name = expr; ... }`
    ///
    /// Evaluates to a record whose identity is `(tag, index)`, where the index
    /// is the active combination of `matching` if one is running.
    Pattern {
        assignments: StmtRange,
        matching: Option<MatchingId>,
        tag: PatternTag,
    },
    /// `join expr`: evaluate `body` once per combination of `matching`.
    Join { body: ExprId, matching: MatchingId },
    /// Stand-in for a candidate registered with a matching.
    Placeholder(Placeholder),
}

/// Reference to slot `slot` of `matching`'s current combination.
///
/// Produced by [`ExprArena::register_candidate`](crate::ExprArena::register_candidate).
/// Resolves to the selected element, never to a re-evaluation of the candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub matching: MatchingId,
    pub slot: u32,
}

/// Binding operator of an assignment.
///
/// Everything except `=` registers its right-hand side with the enclosing
/// matching. The four matching operators currently share one meaning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindOp {
    Assign,
    Tilde,
    TildeTilde,
    BangTilde,
    BangTildeTilde,
}

impl BindOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            BindOp::Assign => "=",
            BindOp::Tilde => "~",
            BindOp::TildeTilde => "~~",
            BindOp::BangTilde => "!~",
            BindOp::BangTildeTilde => "!~~",
        }
    }

    #[inline]
    pub const fn is_matching(self) -> bool {
        !matches!(self, BindOp::Assign)
    }
}

impl fmt::Display for BindOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `name OP value`
///
/// For matching operators, `value` is a `Placeholder` expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub name: Name,
    pub op: BindOp,
    pub value: ExprId,
    pub span: Span,
}

/// Parsed source file: an ordered list of top-level assignments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Module {
    pub statements: StmtRange,
    pub span: Span,
}
