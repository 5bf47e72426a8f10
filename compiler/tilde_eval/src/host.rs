//! Capability interface for externally supplied data.
//!
//! The evaluator never assumes a concrete representation for caller data.
//! Anything passed in as a binding that is not a plain value implements
//! [`HostObject`] and exposes only what it supports: attributes, indexing,
//! iteration (needed to be a join candidate), length, and operator hooks.

use crate::operators::{BinaryOp, UnaryOp};
use crate::Value;
use std::fmt;
use thiserror::Error;

/// Failure reported by a host object.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("`{type_name}` object has no attribute `{name}`")]
    NoAttribute { type_name: String, name: String },

    #[error("`{type_name}` object is not subscriptable")]
    NotIndexable { type_name: String },

    #[error("`{type_name}` object is not iterable")]
    NotIterable { type_name: String },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{0}")]
    Other(String),
}

pub trait HostObject: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    /// `object.name`
    fn attribute(&self, name: &str) -> Result<Value, HostError> {
        Err(HostError::NoAttribute {
            type_name: self.type_name().to_string(),
            name: name.to_string(),
        })
    }

    /// `object[index]`; `index` is an `Int`, a `Slice`, or whatever the
    /// expression evaluated to.
    fn index(&self, index: &Value) -> Result<Value, HostError> {
        let _ = index;
        Err(HostError::NotIndexable {
            type_name: self.type_name().to_string(),
        })
    }

    /// Elements in iteration order, used when the object is a join candidate
    /// or a `union` argument.
    fn elements(&self) -> Result<Vec<Value>, HostError> {
        Err(HostError::NotIterable {
            type_name: self.type_name().to_string(),
        })
    }

    fn len(&self) -> Option<usize> {
        None
    }

    /// Falsy only when the object reports a length of zero.
    fn is_truthy(&self) -> bool {
        self.len() != Some(0)
    }

    /// Binary operator hook. `reversed` is set when the host object is the
    /// right operand. `None` falls back to the default semantics.
    fn binary_op(
        &self,
        op: BinaryOp,
        other: &Value,
        reversed: bool,
    ) -> Option<Result<Value, HostError>> {
        let _ = (op, other, reversed);
        None
    }

    /// Unary operator hook (`+x`, `-x`, `abs(x)`).
    fn unary_op(&self, op: UnaryOp) -> Option<Result<Value, HostError>> {
        let _ = op;
        None
    }
}
