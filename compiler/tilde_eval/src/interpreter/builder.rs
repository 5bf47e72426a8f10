//! `InterpreterBuilder` and evaluation limits.

use super::Interpreter;
use crate::builtins::Builtin;
use crate::environment::Environment;
use crate::value::SessionId;
use crate::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use tilde_ir::{ExprArena, LineIndex, StringInterner};

/// Default nesting limit for function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Limits applied while evaluating. `None` disables a limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub max_call_depth: Option<usize>,
    /// Maximum rows a single join run may enumerate.
    pub max_combinations: Option<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            max_combinations: None,
        }
    }
}

static NEXT_SESSION: AtomicU32 = AtomicU32::new(0);

/// Builder for [`Interpreter`] instances.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    lines: &'a LineIndex,
    config: EvalConfig,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena, lines: &'a LineIndex) -> Self {
        Self {
            interner,
            arena,
            lines,
            config: EvalConfig::default(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, limit: Option<usize>) -> Self {
        self.config.max_call_depth = limit;
        self
    }

    #[must_use]
    pub fn max_combinations(mut self, limit: Option<usize>) -> Self {
        self.config.max_combinations = limit;
        self
    }

    /// Build the interpreter: a root scope holding the builtins, and a
    /// globals scope under it for caller bindings and module statements.
    pub fn build(self) -> Interpreter<'a> {
        let mut env = Environment::new();
        let root = env.root();
        for builtin in Builtin::ALL {
            // Builtin names are distinct, so this cannot collide.
            let name = self.interner.intern(builtin.name());
            let _ = env.define(root, name, Value::Builtin(builtin));
        }
        let globals = env.child(root);

        Interpreter {
            interner: self.interner,
            arena: self.arena,
            lines: self.lines,
            env,
            globals,
            config: self.config,
            depth: 0,
            session: SessionId(NEXT_SESSION.fetch_add(1, Ordering::Relaxed)),
        }
    }
}
