//! Error types for sequence operations.
//!
//! Every failure is scoped to the call that produced it. Nothing is retried
//! internally: these are contract violations, not transient faults.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = CollectionError> = core::result::Result<T, E>;

/// Errors returned by list, view, iterator and cursor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Index outside the valid bound for the operation.
    ///
    /// Element access requires `index < len`; insertion positions allow
    /// `index <= len`. Always rejected before any mutation happens.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },

    /// A range whose start lies after its end.
    #[error("range start {from} is greater than range end {to}")]
    InvalidRange {
        /// Inclusive start.
        from: usize,
        /// Exclusive end.
        to: usize,
    },

    /// A "must exist" deque operation on an empty list.
    #[error("collection is empty")]
    Empty,

    /// The container was structurally modified behind a live iterator,
    /// view or cursor.
    #[error("concurrent structural modification: expected version {expected}, found {actual}")]
    ConcurrentModification {
        /// Version observed when the handle last validated.
        expected: u64,
        /// Version currently held by the container.
        actual: u64,
    },

    /// A detached handle was used with a container it was not created from.
    #[error("handle used with a container it does not belong to")]
    ForeignContainer,

    /// Iterator `remove`/`set` without a current element.
    #[error("no current element: call next or previous first")]
    IllegalState,

    /// Argument rejected before any work was done.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Growth would exceed the maximum sequence length.
    #[error("capacity exhausted: requested {requested}, maximum {max}")]
    CapacityExhausted {
        /// Capacity that was required.
        requested: usize,
        /// Largest length the growth policy allows.
        max: usize,
    },
}

impl CollectionError {
    /// Returns `true` for [`CollectionError::ConcurrentModification`].
    #[inline]
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

/// Checks an element-access index (`index < len`).
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(CollectionError::OutOfBounds { index, len })
    }
}

/// Checks an insertion position (`index <= len`).
#[inline]
pub(crate) fn check_position(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(CollectionError::OutOfBounds { index, len })
    }
}

/// Checks a half-open range `[from, to)` against `len`.
#[inline]
pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
    if from > to {
        return Err(CollectionError::InvalidRange { from, to });
    }
    check_position(to, len)
}
