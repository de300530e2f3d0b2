//! Splittable traversal.
//!
//! A [`SplitCursor`] walks part of a container and can hand off a prefix of
//! what it has left to a new cursor, so a traversal can be divided across
//! workers. Cursors are detached: they hold positions, not borrows, and take
//! the container they read from on every call.
//!
//! ```text
//! [ index ........................ fence )
//!          try_split
//! [ index ... mid )  [ mid ....... fence )
//!    returned piece     kept by the cursor
//! ```

use crate::error::Result;

/// A cursor that can traverse and divide a range of elements.
pub trait SplitCursor<T> {
    /// Container the cursor reads from.
    type Source: ?Sized;

    /// Cursor type returned by [`try_split`](Self::try_split).
    type Piece;

    /// Number of elements left to visit.
    ///
    /// Exact for array-backed cursors; for linked cursors it is exact until
    /// the cursor is split.
    fn estimate_remaining(&mut self, source: &Self::Source) -> usize;

    /// Visits the next element, if any.
    ///
    /// Returns `Ok(false)` once the cursor is exhausted.
    fn try_advance<F>(&mut self, source: &Self::Source, f: F) -> Result<bool>
    where
        F: FnMut(&T);

    /// Visits every remaining element.
    fn for_each_remaining<F>(&mut self, source: &Self::Source, f: F) -> Result<()>
    where
        F: FnMut(&T);

    /// Splits off a prefix of the remaining elements.
    ///
    /// Returns `None` if the remainder is too small to divide.
    fn try_split(&mut self, source: &Self::Source) -> Option<Self::Piece>;
}
