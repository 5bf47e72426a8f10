//! Evaluation errors.
//!
//! Every variant maps to an [`ErrorKind`]. Failures that escape a call,
//! subscript, attribute access or name lookup are wrapped in
//! [`EvalError::Runtime`] carrying the node's line; the original error stays
//! reachable through [`std::error::Error::source`] and
//! [`EvalError::root_cause`].

use crate::host::HostError;
use std::fmt;
use thiserror::Error;

/// Result of evaluation.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

/// Stable error classification, named after the language-level error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Name,
    Redefinition,
    Arity,
    Runtime,
    Type,
    Index,
    Attribute,
    ZeroDivision,
    Overflow,
    Value,
    Matching,
    Limit,
    Host,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Name => "NameError",
            ErrorKind::Redefinition => "RedefinitionError",
            ErrorKind::Arity => "ArityError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Attribute => "AttributeError",
            ErrorKind::ZeroDivision => "ZeroDivisionError",
            ErrorKind::Overflow => "OverflowError",
            ErrorKind::Value => "ValueError",
            ErrorKind::Matching => "MatchingError",
            ErrorKind::Limit => "LimitError",
            ErrorKind::Host => "HostError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error)]
pub enum EvalError {
    #[error("name `{name}` is not defined")]
    UndefinedName { name: String },

    #[error("name `{name}` is already defined in this scope")]
    Redefinition { name: String },

    /// `line` is where the called function was defined.
    #[error("on line {line}, function expects {expected} arguments, got {got}")]
    Arity {
        line: u32,
        expected: usize,
        got: usize,
    },

    #[error("`{name}` expects {expected} arguments, got {got}")]
    BuiltinArity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },

    /// `kind` is the kind of the original failure.
    #[error("on line {line}, encountered {kind}: {source}")]
    Runtime {
        line: u32,
        kind: ErrorKind,
        source: Box<EvalError>,
    },

    #[error("unsupported operand types for `{op}`: `{left}` and `{right}`")]
    BinaryTypeMismatch {
        op: &'static str,
        left: String,
        right: String,
    },

    #[error("bad operand type for unary `{op}`: `{operand}`")]
    UnaryTypeMismatch { op: &'static str, operand: String },

    #[error("`{type_name}` object is not callable")]
    NotCallable { type_name: String },

    #[error("`{type_name}` object is not iterable")]
    NotIterable { type_name: String },

    #[error("`{type_name}` object is not subscriptable")]
    NotIndexable { type_name: String },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("indices must be integers or slices, not `{got}`")]
    IndexType { got: String },

    #[error("`{type_name}` object has no attribute `{field}`")]
    NoAttribute { type_name: String, field: String },

    #[error("`{function}` expects {expected}, got `{got}`")]
    ArgumentType {
        function: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("slice bounds must be integers, not `{got}`")]
    SliceBound { got: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: &'static str },

    #[error("math domain error in `{function}`")]
    MathDomain { function: &'static str },

    #[error("placeholder for slot {slot} resolved outside of its join")]
    InactivePlaceholder { slot: u32 },

    #[error("join would produce {requested} combinations, over the limit of {limit}")]
    CombinationLimit { limit: usize, requested: usize },

    #[error("maximum call depth of {limit} exceeded")]
    RecursionLimit { limit: usize },

    #[error("function value belongs to a different evaluation")]
    ForeignFunction,

    #[error(transparent)]
    Host(#[from] HostError),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::UndefinedName { .. } => ErrorKind::Name,
            EvalError::Redefinition { .. } => ErrorKind::Redefinition,
            EvalError::Arity { .. } | EvalError::BuiltinArity { .. } => ErrorKind::Arity,
            EvalError::Runtime { .. } => ErrorKind::Runtime,
            EvalError::BinaryTypeMismatch { .. }
            | EvalError::UnaryTypeMismatch { .. }
            | EvalError::NotCallable { .. }
            | EvalError::NotIterable { .. }
            | EvalError::NotIndexable { .. }
            | EvalError::IndexType { .. }
            | EvalError::ArgumentType { .. }
            | EvalError::SliceBound { .. }
            | EvalError::ForeignFunction => ErrorKind::Type,
            EvalError::IndexOutOfRange { .. } => ErrorKind::Index,
            EvalError::NoAttribute { .. } => ErrorKind::Attribute,
            EvalError::DivisionByZero => ErrorKind::ZeroDivision,
            EvalError::IntegerOverflow { .. } => ErrorKind::Overflow,
            EvalError::MathDomain { .. } => ErrorKind::Value,
            EvalError::InactivePlaceholder { .. } => ErrorKind::Matching,
            EvalError::CombinationLimit { .. } | EvalError::RecursionLimit { .. } => {
                ErrorKind::Limit
            }
            EvalError::Host(err) => match err {
                HostError::NoAttribute { .. } => ErrorKind::Attribute,
                HostError::NotIndexable { .. } | HostError::NotIterable { .. } => ErrorKind::Type,
                HostError::IndexOutOfRange { .. } => ErrorKind::Index,
                HostError::Other(_) => ErrorKind::Host,
            },
        }
    }

    /// The innermost error under any `Runtime` wrappers.
    pub fn root_cause(&self) -> &EvalError {
        let mut err = self;
        while let EvalError::Runtime { source, .. } = err {
            err = source;
        }
        err
    }

    /// Source line attached to this error, if any.
    pub fn line(&self) -> Option<u32> {
        match self {
            EvalError::Runtime { line, .. } | EvalError::Arity { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Annotate with the line of the node the error escaped through.
    ///
    /// An error that is already wrapped gets its line replaced, so the
    /// outermost node wins and the cause is not nested repeatedly.
    #[cold]
    pub(crate) fn at_line(self, line: u32) -> EvalError {
        match self {
            EvalError::Runtime { kind, source, .. } => EvalError::Runtime { line, kind, source },
            err => EvalError::Runtime {
                line,
                kind: err.kind(),
                source: Box::new(err),
            },
        }
    }
}

// Constructors for the common cases, kept out of line.

#[cold]
pub(crate) fn binary_type_mismatch(
    op: &'static str,
    left: &crate::Value,
    right: &crate::Value,
) -> EvalError {
    EvalError::BinaryTypeMismatch {
        op,
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

#[cold]
pub(crate) fn unary_type_mismatch(op: &'static str, operand: &crate::Value) -> EvalError {
    EvalError::UnaryTypeMismatch {
        op,
        operand: operand.type_name().to_string(),
    }
}

#[cold]
pub(crate) fn argument_type(
    function: &'static str,
    expected: &'static str,
    got: &crate::Value,
) -> EvalError {
    EvalError::ArgumentType {
        function,
        expected,
        got: got.type_name().to_string(),
    }
}

#[cold]
pub(crate) fn not_iterable(value: &crate::Value) -> EvalError {
    EvalError::NotIterable {
        type_name: value.type_name().to_string(),
    }
}
