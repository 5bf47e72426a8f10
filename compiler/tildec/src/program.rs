use crate::PartialRun;
use tilde_eval::{EvalConfig, EvalError, InterpreterBuilder, Value, ValueDisplay};
use tilde_ir::pretty::print_module;
use tilde_ir::SharedInterner;
use tilde_parse::{ParseError, ParseOutput};
use tracing::debug;

/// A parsed program, ready to run.
#[derive(Debug)]
pub struct Program {
    interner: SharedInterner,
    output: ParseOutput,
}

impl Program {
    pub fn compile(source: &str) -> Result<Program, ParseError> {
        let interner = SharedInterner::new();
        let output = tilde_parse::parse(source, &interner)?;
        Ok(Program { interner, output })
    }

    /// Run with default limits.
    pub fn run<'n>(
        &self,
        bindings: impl IntoIterator<Item = (&'n str, Value)>,
    ) -> Result<Bindings, EvalError> {
        self.run_with(EvalConfig::default(), bindings)
    }

    /// Bind `bindings` in a fresh top-level scope, then evaluate every
    /// statement into it.
    ///
    /// Each run is an independent session: nothing carries over between
    /// runs, and concurrent runs share only the immutable AST.
    pub fn run_with<'n>(
        &self,
        config: EvalConfig,
        bindings: impl IntoIterator<Item = (&'n str, Value)>,
    ) -> Result<Bindings, EvalError> {
        self.run_partial(config, bindings)
            .map_err(|partial| partial.error)
    }

    /// Like [`run_with`](Self::run_with), but a failed run still hands back
    /// the bindings committed before the failing statement.
    pub fn run_partial<'n>(
        &self,
        config: EvalConfig,
        bindings: impl IntoIterator<Item = (&'n str, Value)>,
    ) -> Result<Bindings, PartialRun> {
        let mut interp =
            InterpreterBuilder::new(&self.interner, &self.output.arena, &self.output.lines)
                .config(config)
                .build();
        let result = bindings
            .into_iter()
            .try_for_each(|(name, value)| interp.define_global(name, value))
            .and_then(|()| interp.eval_module(&self.output.module));

        let entries: Vec<_> = interp
            .bindings()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        debug!(bindings = entries.len(), "run finished");
        let bindings = Bindings {
            interner: self.interner.clone(),
            entries,
        };
        match result {
            Ok(()) => Ok(bindings),
            Err(error) => Err(PartialRun { error, bindings }),
        }
    }

    /// Render the program back to source.
    pub fn to_source(&self) -> String {
        print_module(&self.output.arena, &self.output.module, &*self.interner)
    }

    pub fn display<'v>(&'v self, value: &'v Value) -> ValueDisplay<'v> {
        value.display(&*self.interner)
    }
}

/// Top-level bindings of a run, in binding order.
///
/// Caller-supplied bindings come first, followed by the program's own
/// statements.
#[derive(Clone, Debug)]
pub struct Bindings {
    interner: SharedInterner,
    entries: Vec<(String, Value)>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(entry, value)| (entry == name).then_some(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field `name` of a record produced by this run.
    pub fn field<'v>(&self, value: &'v Value, name: &str) -> Option<&'v Value> {
        value.as_record()?.get(name, &*self.interner)
    }

    pub fn display<'v>(&'v self, value: &'v Value) -> ValueDisplay<'v> {
        value.display(&*self.interner)
    }
}
