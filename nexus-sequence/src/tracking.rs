//! Structural modification tracking.
//!
//! Every owning container carries a [`ModCount`] that is bumped on each
//! structural mutation, and an [`OwnerId`] that identifies it for the whole of
//! its life. Detached handles (iterators, views, splittable cursors) capture a
//! [`Stamp`] when they bind and validate it against the container on every
//! step.
//!
//! ```text
//! ArrayList { owner: 7, mods: 12 }
//!     │
//!     ├── ListIter   { stamp: (7, 12) }   valid
//!     ├── SubList    { stamp: (7, 11) }   stale -> ConcurrentModification
//!     └── (other list, owner 9) handle  -> ForeignContainer
//! ```
//!
//! Detection is best-effort. It catches single-threaded misuse such as
//! mutating a list while a cursor over it is live; it gives no cross-thread
//! guarantee.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{CollectionError, Result};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Identity of an owning container.
///
/// Allocated from a process-wide counter at construction. Clones of a
/// container receive a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocates a new, never before seen id.
    #[inline]
    pub(crate) fn next() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic structural change counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModCount(u64);

impl ModCount {
    /// A counter at zero.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Current value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Records one structural change.
    #[inline]
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Records `n` structural changes at once (batch removal).
    #[inline]
    pub fn bump_by(&mut self, n: usize) {
        self.0 = self.0.wrapping_add(n as u64);
    }

    /// Fails unless the counter still equals `expected`.
    #[inline]
    pub fn check(self, expected: u64) -> Result<()> {
        if self.0 == expected {
            Ok(())
        } else {
            tracing::trace!(expected, actual = self.0, "concurrent modification detected");
            Err(CollectionError::ConcurrentModification {
                expected,
                actual: self.0,
            })
        }
    }
}

/// Owner + version snapshot captured by a detached handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub(crate) owner: OwnerId,
    pub(crate) version: u64,
}

impl Stamp {
    #[inline]
    pub(crate) fn new(owner: OwnerId, mods: ModCount) -> Self {
        Self {
            owner,
            version: mods.get(),
        }
    }

    /// Validates the snapshot against a container's current state.
    ///
    /// Ownership is checked first: a handle from another container is a
    /// usage error regardless of versions.
    #[inline]
    pub(crate) fn validate(&self, owner: OwnerId, mods: ModCount) -> Result<()> {
        if self.owner != owner {
            return Err(CollectionError::ForeignContainer);
        }
        mods.check(self.version)
    }

    /// Re-synchronises after a mutation issued through the handle itself.
    #[inline]
    pub(crate) fn refresh(&mut self, mods: ModCount) {
        self.version = mods.get();
    }

    /// Version captured by this stamp.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}
