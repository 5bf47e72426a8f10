//! Arena storage for the flat AST and its matchings.
//!
//! The AST builder owns the arena mutably while lowering; afterwards it is
//! only ever borrowed shared, which is what makes every [`Matching`]
//! append-only during construction and immutable during evaluation.

use crate::ast::{Assignment, Expr, ExprKind, Placeholder};
use crate::{ExprId, ExprRange, MatchingId, Name, NameRange, PatternTag, StmtRange};

/// Candidate registry of one `join` site.
///
/// Holds the right-hand sides of every `~`-family binding built under the
/// join, in registration order. Slot `i` of a combination row is drawn from
/// the collection that `candidates()[i]` evaluates to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Matching {
    candidates: Vec<ExprId>,
}

impl Matching {
    #[inline]
    pub fn candidates(&self) -> &[ExprId] {
        &self.candidates
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.candidates.len()
    }
}

#[inline]
#[track_caller]
fn index_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("AST arena exceeded u32::MAX entries"))
}

/// Contiguous storage for every node of one parsed source text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Assignment>,
    names: Vec<Name>,
    matchings: Vec<Matching>,
    next_pattern_tag: u32,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with capacity estimated from the source length.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated_exprs = source_len / 4;
        ExprArena {
            exprs: Vec::with_capacity(estimated_exprs),
            expr_lists: Vec::with_capacity(estimated_exprs / 4),
            stmts: Vec::with_capacity(estimated_exprs / 8),
            ..Self::default()
        }
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// # Panics
    /// Panics if `id` belongs to another arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = index_u32(self.expr_lists.len());
        self.expr_lists.extend(exprs);
        ExprRange::new(start, index_u32(self.expr_lists.len()) - start)
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    // ===== Statements =====

    /// Store a body's assignments contiguously.
    ///
    /// Callers build the whole body (including nested bodies) before
    /// allocating it, so inner statements never interleave with outer ones.
    pub fn alloc_stmts(&mut self, stmts: impl IntoIterator<Item = Assignment>) -> StmtRange {
        let start = index_u32(self.stmts.len());
        self.stmts.extend(stmts);
        StmtRange::new(start, index_u32(self.stmts.len()) - start)
    }

    #[inline]
    pub fn get_stmts(&self, range: StmtRange) -> &[Assignment] {
        &self.stmts[range.as_range()]
    }

    // ===== Parameter names =====

    pub fn alloc_names(&mut self, names: impl IntoIterator<Item = Name>) -> NameRange {
        let start = index_u32(self.names.len());
        self.names.extend(names);
        NameRange::new(start, index_u32(self.names.len()) - start)
    }

    #[inline]
    pub fn get_names(&self, range: NameRange) -> &[Name] {
        &self.names[range.as_range()]
    }

    // ===== Matchings and patterns =====

    /// Mint a fresh, empty matching for a `join` site.
    pub fn new_matching(&mut self) -> MatchingId {
        let id = MatchingId::new(index_u32(self.matchings.len()));
        self.matchings.push(Matching::default());
        id
    }

    /// Append `candidate` to `matching` and allocate the placeholder standing
    /// in for it.
    ///
    /// The placeholder expression reuses the candidate's span so diagnostics
    /// still point at the source the user wrote.
    pub fn register_candidate(&mut self, matching: MatchingId, candidate: ExprId) -> ExprId {
        let span = self.get_expr(candidate).span;
        let entry = &mut self.matchings[matching.index()];
        let slot = index_u32(entry.candidates.len());
        entry.candidates.push(candidate);
        self.alloc_expr(Expr::new(
            ExprKind::Placeholder(Placeholder { matching, slot }),
            span,
        ))
    }

    /// # Panics
    /// Panics if `id` belongs to another arena.
    #[inline]
    #[track_caller]
    pub fn matching(&self, id: MatchingId) -> &Matching {
        &self.matchings[id.index()]
    }

    #[inline]
    pub fn matching_count(&self) -> usize {
        self.matchings.len()
    }

    /// Candidate expression behind a placeholder.
    pub fn candidate_of(&self, placeholder: Placeholder) -> Option<ExprId> {
        self.matchings
            .get(placeholder.matching.index())?
            .candidates
            .get(placeholder.slot as usize)
            .copied()
    }

    /// Mint the identity tag for one pattern block.
    pub fn mint_pattern_tag(&mut self) -> PatternTag {
        let tag = PatternTag::new(self.next_pattern_tag);
        self.next_pattern_tag += 1;
        tag
    }
}
