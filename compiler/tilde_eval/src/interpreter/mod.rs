//! Tree-walking interpreter.
//!
//! Evaluation dispatches on [`ExprKind`] and threads two pieces of context
//! down the recursion: the scope to resolve names in, and the
//! [`ActiveCombination`] chain of running joins that placeholders resolve
//! against.

mod builder;
mod call;
mod join;

#[cfg(test)]
mod tests;

pub use builder::{EvalConfig, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};

use crate::environment::{Environment, ScopeId};
use crate::errors::{EvalError, EvalResult};
use crate::matching::ActiveCombination;
use crate::value::{FunctionValue, Identity, Record, SessionId, SliceValue};
use crate::Value;
use tilde_ir::{
    Assignment, ExprArena, ExprId, ExprKind, LineIndex, Module, Name, Span, StmtRange,
    StringInterner,
};
use tilde_stack::ensure_sufficient_stack;
use tracing::debug;

/// Evaluates one module's AST.
///
/// An interpreter is one evaluation session: it owns every scope created
/// while it runs, and closures it produces only work inside it.
pub struct Interpreter<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    lines: &'a LineIndex,
    env: Environment,
    /// Child of the builtins scope; caller bindings and module statements
    /// land here.
    globals: ScopeId,
    config: EvalConfig,
    /// Current function call nesting.
    depth: usize,
    session: SessionId,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with default limits.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena, lines: &'a LineIndex) -> Self {
        InterpreterBuilder::new(interner, arena, lines).build()
    }

    #[inline]
    pub fn globals(&self) -> ScopeId {
        self.globals
    }

    #[inline]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    #[inline]
    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// Bind a caller-supplied value in the globals scope.
    pub fn define_global(&mut self, name: &str, value: Value) -> EvalResult<()> {
        let name = self.interner.intern(name);
        self.define(self.globals, name, value)
    }

    pub fn lookup_global(&self, name: &str) -> Option<&Value> {
        let name = self.interner.get(name)?;
        self.env.lookup(self.globals, name)
    }

    /// Bindings of the globals scope, in binding order.
    pub fn bindings(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.env
            .bindings(self.globals)
            .iter()
            .map(|(name, value)| (self.interner.lookup(*name), value))
    }

    /// Evaluate each statement of `module` into the globals scope.
    ///
    /// Stops at the first failure; bindings made before it stay in place.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn eval_module(&mut self, module: &Module) -> EvalResult<()> {
        let arena = self.arena;
        for stmt in arena.get_stmts(module.statements) {
            self.eval_assignment(stmt, self.globals, ActiveCombination::NONE)?;
        }
        debug!(
            bindings = self.env.bindings(self.globals).len(),
            scopes = self.env.scope_count(),
            "evaluated module"
        );
        Ok(())
    }

    /// Evaluate an expression.
    ///
    /// Uses `ensure_sufficient_stack` so deeply nested expressions and
    /// deep recursion grow the stack instead of overflowing it.
    pub fn eval(
        &mut self,
        id: ExprId,
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id, scope, active))
    }

    fn eval_inner(
        &mut self,
        id: ExprId,
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(bits) => Ok(Value::Float(f64::from_bits(*bits))),
            ExprKind::Symbol(name) => self
                .lookup(*name, scope)
                .map_err(|err| self.annotate(err, expr.span)),
            ExprKind::Call { func, args } => self
                .eval_call(*func, *args, scope, active)
                .map_err(|err| self.annotate(err, expr.span)),
            ExprKind::Subscript { object, index } => {
                let result = match self.eval(*object, scope, active) {
                    Ok(object) => self
                        .eval(*index, scope, active)
                        .and_then(|index| subscript(&object, &index)),
                    Err(err) => Err(err),
                };
                result.map_err(|err| self.annotate(err, expr.span))
            }
            ExprKind::Attribute { object, field } => self
                .eval(*object, scope, active)
                .and_then(|object| self.attribute(&object, *field))
                .map_err(|err| self.annotate(err, expr.span)),
            ExprKind::Slice { start, stop } => {
                let start = self.slice_bound(*start, scope, active)?;
                let stop = self.slice_bound(*stop, scope, active)?;
                Ok(Value::Slice(SliceValue { start, stop }))
            }
            ExprKind::Function { params, body } => {
                self.env.pin(scope);
                Ok(Value::Function(FunctionValue {
                    params: *params,
                    body: *body,
                    scope,
                    line: self.line(expr.span),
                    session: self.session,
                }))
            }
            ExprKind::Block { stmts, result } => {
                let mark = self.env.mark();
                let block = self.env.child(scope);
                let value = self.eval_block(*stmts, *result, block, active);
                self.env.release(mark);
                value
            }
            ExprKind::Pattern {
                assignments,
                matching,
                tag,
            } => {
                let index = matching.and_then(|matching| active.index_of(matching));
                let identity = Identity { tag: *tag, index };
                let mark = self.env.mark();
                let fields = self.env.child(scope);
                let record = self.eval_pattern(*assignments, identity, fields, active);
                self.env.release(mark);
                record.map(Value::record)
            }
            ExprKind::Join { body, matching } => self.run_join(*body, *matching, scope, active),
            ExprKind::Placeholder(placeholder) => active
                .resolve(*placeholder)
                .cloned()
                .map_err(|err| self.annotate(err, expr.span)),
        }
    }

    fn eval_block(
        &mut self,
        stmts: StmtRange,
        result: ExprId,
        block: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        let arena = self.arena;
        for stmt in arena.get_stmts(stmts) {
            self.eval_assignment(stmt, block, active)?;
        }
        self.eval(result, block, active)
    }

    fn eval_pattern(
        &mut self,
        assignments: StmtRange,
        identity: Identity,
        fields: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult<Record> {
        let arena = self.arena;
        let mut record = Record::new(identity);
        for stmt in arena.get_stmts(assignments) {
            let value = self.eval_assignment(stmt, fields, active)?;
            record.push(stmt.name, value);
        }
        Ok(record)
    }

    /// Bind `stmt` in `scope` and return the bound value.
    ///
    /// A placeholder right-hand side resolves to the element selected for
    /// its slot; the candidate expression is not evaluated again.
    fn eval_assignment(
        &mut self,
        stmt: &Assignment,
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        let value = self.eval(stmt.value, scope, active)?;
        self.define(scope, stmt.name, value.clone())?;
        Ok(value)
    }

    fn define(&mut self, scope: ScopeId, name: Name, value: Value) -> EvalResult<()> {
        self.env
            .define(scope, name, value)
            .map_err(|_| EvalError::Redefinition {
                name: self.interner.lookup(name).to_string(),
            })
    }

    fn lookup(&self, name: Name, scope: ScopeId) -> EvalResult {
        self.env
            .lookup(scope, name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedName {
                name: self.interner.lookup(name).to_string(),
            })
    }

    fn attribute(&self, object: &Value, field: Name) -> EvalResult {
        match object {
            Value::Record(record) => {
                record
                    .field(field)
                    .cloned()
                    .ok_or_else(|| EvalError::NoAttribute {
                        type_name: "record".to_string(),
                        field: self.interner.lookup(field).to_string(),
                    })
            }
            Value::Host(host) => host
                .attribute(self.interner.lookup(field))
                .map_err(EvalError::from),
            _ => Err(EvalError::NoAttribute {
                type_name: object.type_name().to_string(),
                field: self.interner.lookup(field).to_string(),
            }),
        }
    }

    fn slice_bound(
        &mut self,
        bound: Option<ExprId>,
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult<Option<i64>> {
        let Some(bound) = bound else {
            return Ok(None);
        };
        match self.eval(bound, scope, active)? {
            Value::Int(n) => Ok(Some(n)),
            other => Err(EvalError::SliceBound {
                got: other.type_name().to_string(),
            }),
        }
    }

    #[inline]
    fn line(&self, span: Span) -> u32 {
        self.lines.line_of(span)
    }

    #[cold]
    fn annotate(&self, err: EvalError, span: Span) -> EvalError {
        err.at_line(self.line(span))
    }
}

/// Position of `index` in a sequence of `len`, counting negative indices
/// from the end.
fn normalize_index(index: i64, len: usize) -> EvalResult<usize> {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let pos = if index < 0 { index + len_i } else { index };
    usize::try_from(pos)
        .ok()
        .filter(|&pos| pos < len)
        .ok_or(EvalError::IndexOutOfRange { index, len })
}

fn subscript(object: &Value, index: &Value) -> EvalResult {
    match (object, index) {
        (Value::Host(host), _) => host.index(index).map_err(EvalError::from),
        (Value::List(items), Value::Int(i)) => {
            let pos = normalize_index(*i, items.len())?;
            Ok(items[pos].clone())
        }
        (Value::List(items), Value::Slice(slice)) => {
            Ok(Value::list(items[slice.indices(items.len())].to_vec()))
        }
        (Value::Str(s), Value::Int(i)) => {
            let pos = normalize_index(*i, s.chars().count())?;
            let c = s.chars().nth(pos).unwrap_or_default();
            Ok(Value::string(c.to_string()))
        }
        (Value::Str(s), Value::Slice(slice)) => {
            let range = slice.indices(s.chars().count());
            Ok(Value::string(
                s.chars()
                    .skip(range.start)
                    .take(range.len())
                    .collect::<String>(),
            ))
        }
        (Value::List(_) | Value::Str(_), _) => Err(EvalError::IndexType {
            got: index.type_name().to_string(),
        }),
        _ => Err(EvalError::NotIndexable {
            type_name: object.type_name().to_string(),
        }),
    }
}
