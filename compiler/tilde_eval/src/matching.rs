//! Combination enumeration for `join`.
//!
//! A join evaluates each registered candidate once into a collection, then
//! walks the Cartesian product of those collections in row-major order (the
//! last-registered slot varies fastest), evaluating its body once per row.
//!
//! The current row is never stored on the matching itself. Each row is
//! pushed as an [`ActiveCombination`] frame that is passed by value down the
//! recursive evaluation of the body, so nested joins stack frames and
//! concurrent evaluations of one AST never share state.

use crate::errors::{not_iterable, EvalError, EvalResult};
use crate::Value;
use smallvec::SmallVec;
use tilde_ir::{MatchingId, Placeholder};

/// One selected element per slot. Joins rarely have more than a handful of
/// slots, so rows stay inline.
pub type Row = SmallVec<[Value; 4]>;

struct Frame<'a> {
    matching: MatchingId,
    index: usize,
    row: &'a [Value],
    parent: ActiveCombination<'a>,
}

/// The chain of combinations currently being evaluated, innermost first.
#[derive(Copy, Clone)]
pub struct ActiveCombination<'a> {
    frame: Option<&'a Frame<'a>>,
}

impl ActiveCombination<'static> {
    /// No join running.
    pub const NONE: ActiveCombination<'static> = ActiveCombination { frame: None };
}

impl<'a> ActiveCombination<'a> {
    /// Run `f` with a frame for `matching` pushed on top of `self`.
    pub(crate) fn with_frame<R>(
        self,
        matching: MatchingId,
        index: usize,
        row: &[Value],
        f: impl FnOnce(ActiveCombination<'_>) -> R,
    ) -> R {
        let frame = Frame {
            matching,
            index,
            row,
            parent: self,
        };
        f(ActiveCombination {
            frame: Some(&frame),
        })
    }

    fn frames(self) -> impl Iterator<Item = &'a Frame<'a>> {
        std::iter::successors(self.frame, |frame| frame.parent.frame)
    }

    /// Index of the combination `matching` is currently on, if it is running.
    pub fn index_of(self, matching: MatchingId) -> Option<usize> {
        self.frames()
            .find(|frame| frame.matching == matching)
            .map(|frame| frame.index)
    }

    /// The element selected for `placeholder`'s slot.
    pub fn resolve(self, placeholder: Placeholder) -> EvalResult<&'a Value> {
        self.frames()
            .find(|frame| frame.matching == placeholder.matching)
            .and_then(|frame| frame.row.get(placeholder.slot as usize))
            .ok_or(EvalError::InactivePlaceholder {
                slot: placeholder.slot,
            })
    }

    /// Number of nested joins currently running.
    pub fn depth(self) -> usize {
        self.frames().count()
    }
}

/// Elements of a value used as a join candidate: list items, the characters
/// of a string, or a host object's elements.
pub fn candidate_elements(value: &Value) -> EvalResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items.to_vec()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        Value::Host(object) => object.elements().map_err(EvalError::from),
        _ => Err(not_iterable(value)),
    }
}

/// Number of rows in the product, saturating at `usize::MAX`.
pub fn combination_count(collections: &[Vec<Value>]) -> usize {
    collections
        .iter()
        .fold(1usize, |count, collection| count.saturating_mul(collection.len()))
}

/// Odometer over the Cartesian product of `collections`.
///
/// With no collections it yields a single empty row; with any empty
/// collection it yields nothing.
pub struct CartesianProduct<'c> {
    collections: &'c [Vec<Value>],
    cursor: SmallVec<[usize; 4]>,
    done: bool,
}

impl<'c> CartesianProduct<'c> {
    pub fn new(collections: &'c [Vec<Value>]) -> Self {
        CartesianProduct {
            collections,
            cursor: SmallVec::from_elem(0, collections.len()),
            done: collections.iter().any(Vec::is_empty),
        }
    }
}

impl Iterator for CartesianProduct<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.done {
            return None;
        }
        let row = self
            .cursor
            .iter()
            .zip(self.collections)
            .map(|(&i, collection)| collection[i].clone())
            .collect();

        // Advance from the last slot, carrying leftward.
        self.done = true;
        for (slot, collection) in self.cursor.iter_mut().zip(self.collections).rev() {
            *slot += 1;
            if *slot < collection.len() {
                self.done = false;
                break;
            }
            *slot = 0;
        }
        Some(row)
    }
}
