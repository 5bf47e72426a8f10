//! `join` evaluation.

use super::Interpreter;
use crate::environment::ScopeId;
use crate::errors::{EvalError, EvalResult};
use crate::matching::{candidate_elements, combination_count, ActiveCombination, CartesianProduct};
use crate::Value;
use tilde_ir::{ExprId, MatchingId};
use tracing::{debug, trace};

impl Interpreter<'_> {
    /// Evaluate `body` once per combination of `matching`'s candidates and
    /// collect the results in enumeration order.
    ///
    /// Candidates are evaluated once, up front, in the join's own scope.
    /// The body then sees each row through a frame pushed on `active`, so a
    /// join nested inside another resolves placeholders of both.
    #[tracing::instrument(level = "debug", skip_all, fields(matching = matching.index()))]
    pub(super) fn run_join(
        &mut self,
        body: ExprId,
        matching: MatchingId,
        scope: ScopeId,
        active: ActiveCombination<'_>,
    ) -> EvalResult {
        let arena = self.arena;
        let candidates = arena.matching(matching).candidates();

        let mut collections = Vec::with_capacity(candidates.len());
        for &candidate in candidates {
            let value = self.eval(candidate, scope, active)?;
            let elements = candidate_elements(&value)
                .map_err(|err| self.annotate(err, arena.get_expr(candidate).span))?;
            collections.push(elements);
        }

        let count = combination_count(&collections);
        if let Some(limit) = self.config.max_combinations {
            if count > limit {
                return Err(EvalError::CombinationLimit {
                    limit,
                    requested: count,
                });
            }
        }
        debug!(
            slots = collections.len(),
            combinations = count,
            "running join"
        );

        let mut results = Vec::with_capacity(count.min(1024));
        for (index, row) in CartesianProduct::new(&collections).enumerate() {
            trace!(index, "combination");
            let value = active.with_frame(matching, index, &row, |active| {
                self.eval(body, scope, active)
            })?;
            results.push(value);
        }
        Ok(Value::list(results))
    }
}
