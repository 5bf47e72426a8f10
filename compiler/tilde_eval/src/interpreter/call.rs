//! Function call dispatch.

use super::Interpreter;
use crate::builtins::{self, arity, Builtin};
use crate::environment::ScopeId;
use crate::errors::{EvalError, EvalResult};
use crate::matching::ActiveCombination;
use crate::value::FunctionValue;
use crate::Value;
use tilde_ir::{ExprId, ExprRange};
use tracing::trace;

impl Interpreter<'_> {
    /// Evaluate `func(args...)`.
    ///
    /// `and`, `or` and `not` receive their argument expressions and decide
    /// what to evaluate. Every other callee gets its arguments evaluated left
    /// to right in the caller's scope before the call.
    pub(super) fn eval_call(
        &mut self,
        func: ExprId,
        args: ExprRange,
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        let arena = self.arena;
        let callee = self.eval(func, scope, active)?;
        let arg_exprs = arena.get_expr_list(args);

        match callee {
            Value::Builtin(builtin) if builtin.is_lazy() => {
                self.call_lazy(builtin, arg_exprs, scope, active)
            }
            Value::Builtin(builtin) => {
                let args = self.eval_args(arg_exprs, scope, active)?;
                builtins::apply(builtin, &args)
            }
            Value::Function(function) => {
                if function.session != self.session {
                    return Err(EvalError::ForeignFunction);
                }
                let params = arena.get_names(function.params).len();
                if params != arg_exprs.len() {
                    return Err(EvalError::Arity {
                        line: function.line,
                        expected: params,
                        got: arg_exprs.len(),
                    });
                }
                let args = self.eval_args(arg_exprs, scope, active)?;
                self.call_function(&function, args)
            }
            other => Err(EvalError::NotCallable {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    fn eval_args(
        &mut self,
        args: &[ExprId],
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult<Vec<Value>> {
        args.iter()
            .map(|&arg| self.eval(arg, scope, active))
            .collect()
    }

    /// Short-circuiting logic. `and`/`or` return the operand that decided
    /// the result, not a coerced bool.
    fn call_lazy(
        &mut self,
        builtin: Builtin,
        args: &[ExprId],
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        match (builtin, args) {
            (Builtin::Not, &[operand]) => {
                let value = self.eval(operand, scope, active)?;
                Ok(Value::Bool(!value.is_truthy()))
            }
            (Builtin::And, &[left, right]) => {
                let value = self.eval(left, scope, active)?;
                if value.is_truthy() {
                    self.eval(right, scope, active)
                } else {
                    Ok(value)
                }
            }
            (Builtin::Or, &[left, right]) => {
                let value = self.eval(left, scope, active)?;
                if value.is_truthy() {
                    Ok(value)
                } else {
                    self.eval(right, scope, active)
                }
            }
            (Builtin::Not, _) => Err(arity(builtin, "1", args.len())),
            _ => Err(arity(builtin, "2", args.len())),
        }
    }

    /// Bind parameters in a child of the captured scope and evaluate the body.
    ///
    /// Function bodies run outside any join: placeholders cannot appear in
    /// them, and patterns inside them carry no combination index.
    fn call_function(&mut self, function: &FunctionValue, args: Vec<Value>) -> EvalResult {
        if let Some(limit) = self.config.max_call_depth {
            if self.depth >= limit {
                return Err(EvalError::RecursionLimit { limit });
            }
        }

        let mark = self.env.mark();
        let frame = self.env.child(function.scope);
        self.depth += 1;
        let result = self.eval_body(function, args, frame);
        self.depth -= 1;
        self.env.release(mark);
        result
    }

    fn eval_body(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        frame: ScopeId,
    ) -> EvalResult {
        let arena = self.arena;
        for (&param, value) in arena.get_names(function.params).iter().zip(args) {
            self.define(frame, param, value)?;
        }
        trace!(depth = self.depth, line = function.line, "call");
        self.eval(function.body, frame, ActiveCombination::NONE)
    }
}
