//! Runtime values.
//!
//! Scalars are stored inline; strings, lists and records go through
//! [`Heap`] so cloning a value is at most a reference-count bump. Values are
//! immutable once built.

mod heap;


pub use heap::Heap;

use crate::builtins::Builtin;
use crate::environment::ScopeId;
use crate::host::HostObject;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tilde_ir::{ExprId, Name, NameRange, PatternTag, StringLookup};

/// Identity of an evaluated pattern: the pattern's source site plus the
/// combination index it was built under, if a join was running.
///
/// Ordered by tag, then index; an identity built outside a join sorts
/// before every indexed one with the same tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    pub tag: PatternTag,
    pub index: Option<usize>,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.tag),
            None => write!(f, "{}", self.tag),
        }
    }
}

/// An evaluated pattern block: identity plus fields in binding order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    identity: Identity,
    fields: Vec<(Name, Value)>,
}

impl Record {
    pub fn new(identity: Identity) -> Self {
        Record {
            identity,
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn field(&self, name: Name) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (*field == name).then_some(value))
    }

    /// Field lookup by text, for callers that do not hold `Name`s.
    pub fn get(&self, name: &str, names: &dyn StringLookup) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (names.lookup(*field) == name).then_some(value))
    }

    #[inline]
    pub fn fields(&self) -> &[(Name, Value)] {
        &self.fields
    }

    pub(crate) fn push(&mut self, name: Name, value: Value) {
        self.fields.push((name, value));
    }
}

/// Opaque id of the interpreter session that created a closure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub(crate) u32);

/// A closure: parameter names, body, and the scope it was created in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FunctionValue {
    pub params: NameRange,
    pub body: ExprId,
    pub scope: ScopeId,
    /// Line of the function literal, reported by arity errors.
    pub line: u32,
    pub(crate) session: SessionId,
}

/// `start:stop` subscript. Missing ends are open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SliceValue {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

impl SliceValue {
    /// Resolve against a sequence of length `len`, clamping out-of-range
    /// bounds and counting negative bounds from the end.
    pub fn indices(&self, len: usize) -> Range<usize> {
        let len_i = i64::try_from(len).unwrap_or(i64::MAX);
        let clamp = |bound: i64| {
            let bound = if bound < 0 {
                bound.saturating_add(len_i).max(0)
            } else {
                bound.min(len_i)
            };
            usize::try_from(bound).unwrap_or(len)
        };
        let start = self.start.map_or(0, clamp);
        let stop = self.stop.map_or(len, clamp);
        start..stop.max(start)
    }
}

impl fmt::Display for SliceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{stop}")?;
        }
        Ok(())
    }
}

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    Record(Heap<Record>),
    Function(FunctionValue),
    Builtin(Builtin),
    Slice(SliceValue),
    /// Externally supplied object; see [`HostObject`].
    Host(Arc<dyn HostObject>),
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Heap::new(items))
    }

    #[inline]
    pub fn record(record: Record) -> Value {
        Value::Record(Heap::new(record))
    }

    #[inline]
    pub fn host(object: impl HostObject + 'static) -> Value {
        Value::Host(Arc::new(object))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
            Value::Slice(_) => "slice",
            Value::Host(object) => object.type_name(),
        }
    }

    /// `false`, zero, empty strings and empty lists are falsy. Host objects
    /// decide for themselves.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Host(object) => object.is_truthy(),
            Value::Record(_) | Value::Function(_) | Value::Builtin(_) | Value::Slice(_) => true,
        }
    }

    /// Numeric value as a float, for `Int` and `Float` only.
    #[inline]
    #[allow(clippy::cast_precision_loss, reason = "int to float promotion")]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Display adapter; record field names need the interner.
    pub fn display<'v>(&'v self, names: &'v dyn StringLookup) -> ValueDisplay<'v> {
        ValueDisplay {
            value: self,
            names,
            nested: false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

/// Numbers compare across `Int`/`Float`; functions and host objects compare
/// by identity.
impl PartialEq for Value {
    #[allow(clippy::cast_precision_loss, reason = "mixed int/float comparison")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Slice(a), Value::Slice(b)) => a == b,
            (Value::Host(a), Value::Host(b)) => {
                std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
            }
            _ => false,
        }
    }
}

pub struct ValueDisplay<'v> {
    value: &'v Value,
    names: &'v dyn StringLookup,
    nested: bool,
}

impl ValueDisplay<'_> {
    fn child<'c>(&'c self, value: &'c Value) -> ValueDisplay<'c> {
        ValueDisplay {
            value,
            names: self.names,
            nested: true,
        }
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) if self.nested => write!(f, "{:?}", s.as_str()),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.child(item))?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                write!(f, "{} {{", record.identity)?;
                for (i, (name, value)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", self.names.lookup(*name), self.child(value))?;
                }
                f.write_str(" }")
            }
            Value::Function(_) => f.write_str("<function>"),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
            Value::Slice(slice) => write!(f, "{slice}"),
            Value::Host(object) => write!(f, "<{}>", object.type_name()),
        }
    }
}
