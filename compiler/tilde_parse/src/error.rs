//! Parse errors.
//!
//! Everything that goes wrong between source text and a finished AST is a
//! `SyntaxError`: bad characters, unexpected tokens, malformed braces, and
//! matching operators used outside a `join`.

use tilde_ir::{BindOp, LineIndex, Span};
use tilde_lexer::LexError;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected an assignment, found an expression")]
    ExpectedAssignment,

    #[error("empty braces are not an expression")]
    EmptyBraces,

    #[error("comparison operators cannot be chained")]
    ChainedComparison,

    #[error("cannot use the `{op}` operator outside of a join")]
    MatchingOutsideJoin { op: BindOp },

    /// The syntax tree handed to the AST builder is missing a child the
    /// grammar always produces.
    #[error("malformed syntax tree: missing {what}")]
    MalformedTree { what: &'static str },
}

/// A syntax error with its location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("syntax error on line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// 1-based.
    pub line: u32,
    /// 1-based, in bytes.
    pub column: u32,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span, lines: &LineIndex) -> Self {
        let (line, column) = lines.line_col(span.start);
        ParseError {
            kind,
            span,
            line,
            column,
        }
    }

    #[cold]
    pub(crate) fn from_lex(err: LexError, lines: &LineIndex) -> Self {
        let span = err.span();
        ParseError::new(ParseErrorKind::Lex(err), span, lines)
    }

    /// Error class name, mirroring the evaluator's error kinds.
    pub fn kind_name(&self) -> &'static str {
        "SyntaxError"
    }
}
