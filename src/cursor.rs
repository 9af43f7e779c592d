//! Position arithmetic for iterating `(outer, inner)` pairs, where `inner`
//! counts sub-items within an outer entry and wraps at a fixed modulus.
//!
//! These are kept free of any storage type so traversal logic can be tested
//! on its own.

/// Position within a two-level traversal.
///
/// `outer` is an index into the outer sequence (eg. a filter) and `inner`
/// is a sub-item counter in `[0, modulus)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub outer: usize,
    pub inner: usize,
}

impl Cursor {
    pub fn new(outer: usize, inner: usize) -> Cursor {
        Cursor { outer, inner }
    }

    /// Move to the next sub-item, carrying into `outer` when `inner`
    /// reaches `modulus`.
    #[inline]
    pub fn step(&mut self, modulus: usize) {
        *self = advance(*self, modulus);
    }
}

/// Return the flat index of sub-item `inner` of outer entry `outer`, when
/// each outer entry spans `modulus` sub-items.
#[inline]
pub fn linearize(outer: usize, inner: usize, modulus: usize) -> usize {
    outer * modulus + inner
}

/// Return the position following `pos`.
#[inline]
pub fn advance(pos: Cursor, modulus: usize) -> Cursor {
    let inner = pos.inner + 1;
    if inner == modulus {
        Cursor::new(pos.outer + 1, 0)
    } else {
        Cursor::new(pos.outer, inner)
    }
}

/// Inverse of [`linearize`]: split a flat index into `(outer, inner)`.
///
/// Panics if `modulus` is zero.
#[inline]
pub fn decompose(index: usize, modulus: usize) -> Cursor {
    Cursor::new(index / modulus, index % modulus)
}
