//! Stack growth guard for deep recursion.
//!
//! Both the parser and the evaluator descend recursively through nested
//! expressions, blocks, joins and function calls. Source like `((((...))))`
//! or a recursive user function can exhaust the native stack long before
//! any configured depth limit fires, so the hot recursive entry points wrap
//! themselves in [`ensure_sufficient_stack`].
//!
//! On native targets the guard uses `stacker` to switch to a freshly
//! allocated segment when the remaining stack drops below the red zone.
//! On `wasm32` it calls the closure directly.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Run `f` directly; wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
