//! Arena indices and ranges.
//!
//! AST nodes never own their children; they hold 32-bit indices into the
//! [`ExprArena`](crate::ExprArena). Lists of children are stored
//! contiguously and referenced by `(start, len)` ranges.

use std::fmt;

/// Index of an expression in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Index of a [`Matching`](crate::Matching) registered in the arena.
///
/// One is minted per `join` site while building the AST.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct MatchingId(u32);

impl MatchingId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        MatchingId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity tag of a pattern block.
///
/// Minted once per source occurrence of `{ ... }` pattern syntax, so two
/// textually identical patterns at different places never share a tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct PatternTag(u32);

impl PatternTag {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        PatternTag(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern#{}", self.0)
    }
}

macro_rules! define_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn as_range(self) -> std::ops::Range<usize> {
                let start = self.start as usize;
                start..start + self.len as usize
            }
        }
    };
}

define_range!(
    /// Contiguous run of expression ids (call arguments).
    ExprRange
);
define_range!(
    /// Contiguous run of assignments (module, block and pattern bodies).
    StmtRange
);
define_range!(
    /// Contiguous run of parameter names.
    NameRange
);
