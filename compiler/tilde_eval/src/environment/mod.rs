//! Chained, single-assignment scopes.
//!
//! Scopes live in an arena owned by one evaluation session and are addressed
//! by [`ScopeId`]. The arena is a stack: a block, pattern or call takes a
//! [`ScopeMark`] before allocating and releases back to it when done. A
//! closure pins the scope it was created in, and release never frees a
//! pinned scope or anything allocated before it. A child always has a
//! higher id than its parent, so a pinned scope's whole chain survives.
//!
//! A name may be bound once per scope. Shadowing a parent's binding is fine.


use crate::Value;
use rustc_hash::FxHashMap;
use tilde_ir::Name;

/// Index of a scope in its [`Environment`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena height recorded by [`Environment::mark`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScopeMark(usize);

/// Returned by [`Environment::define`] when the name is already bound in
/// that scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlreadyDefined;

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    /// Name -> position in `bindings`.
    index: FxHashMap<Name, usize>,
    /// Bindings in definition order.
    bindings: Vec<(Name, Value)>,
}

#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    /// Scopes below this height are captured by a closure.
    pinned: usize,
}

impl Environment {
    /// Create an environment holding just the root scope.
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
            pinned: 0,
        }
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Allocate a fresh scope chained to `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let Ok(id) = u32::try_from(self.scopes.len()) else {
            panic!("scope arena exceeded capacity");
        };
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        ScopeId(id)
    }

    /// Bind `name` in `scope`. Fails if `scope` already binds `name`.
    pub fn define(
        &mut self,
        scope: ScopeId,
        name: Name,
        value: Value,
    ) -> Result<(), AlreadyDefined> {
        let scope = &mut self.scopes[scope.index()];
        if scope.index.contains_key(&name) {
            return Err(AlreadyDefined);
        }
        scope.index.insert(name, scope.bindings.len());
        scope.bindings.push((name, value));
        Ok(())
    }

    /// Resolve `name` from `scope` outward.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<&Value> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(&slot) = scope.index.get(&name) {
                return Some(&scope.bindings[slot].1);
            }
            current = scope.parent;
        }
        None
    }

    /// Bindings made directly in `scope`, in definition order.
    pub fn bindings(&self, scope: ScopeId) -> &[(Name, Value)] {
        &self.scopes[scope.index()].bindings
    }

    /// Current arena height.
    #[inline]
    pub fn mark(&self) -> ScopeMark {
        ScopeMark(self.scopes.len())
    }

    /// Keep `scope` and its chain alive until the session ends.
    #[inline]
    pub fn pin(&mut self, scope: ScopeId) {
        self.pinned = self.pinned.max(scope.index() + 1);
    }

    /// Free the scopes allocated since `mark`, except pinned ones.
    pub fn release(&mut self, mark: ScopeMark) {
        let keep = mark.0.max(self.pinned);
        if keep < self.scopes.len() {
            self.scopes.truncate(keep);
        }
    }

    /// Number of scopes currently allocated.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
