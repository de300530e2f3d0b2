//! Splittable cursor over an [`ArrayList`].

use core::fmt;
use core::marker::PhantomData;

use super::ArrayList;
use crate::error::{CollectionError, Result};
use crate::split::SplitCursor;
use crate::tracking::OwnerId;

/// Index-range cursor that bisects on split.
///
/// A cursor from [`ArrayList::splitter`] binds its upper bound (the list's
/// length) and the list version the first time it is used, not when it is
/// created. Pieces split off share that binding. Being plain indices, pieces
/// are `Copy` and `Send`, so they can be handed to scoped threads reading a
/// shared `&ArrayList<T>`.
///
/// # Example
///
/// ```
/// use nexus_sequence::{ArrayList, SplitCursor};
///
/// let list: ArrayList<u32> = (0..8).collect();
/// let mut upper = list.splitter();
/// let mut lower = upper.try_split(&list).unwrap();
///
/// let mut sum = 0;
/// lower.for_each_remaining(&list, |e| sum += e).unwrap();
/// assert_eq!(sum, 0 + 1 + 2 + 3);
/// assert_eq!(upper.estimate_remaining(&list), 4);
/// ```
pub struct ArraySplitter<T> {
    owner: OwnerId,
    index: usize,
    fence: Option<usize>,
    version: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ArraySplitter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArraySplitter<T> {}

impl<T> fmt::Debug for ArraySplitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySplitter")
            .field("index", &self.index)
            .field("fence", &self.fence)
            .field("version", &self.version)
            .finish()
    }
}

impl<T> ArraySplitter<T> {
    pub(super) fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            index: 0,
            fence: None,
            version: 0,
            _marker: PhantomData,
        }
    }

    /// Cursor over `[index, fence)` already bound at `version`.
    pub(super) fn bound(owner: OwnerId, index: usize, fence: usize, version: u64) -> Self {
        Self {
            owner,
            index,
            fence: Some(fence),
            version,
            _marker: PhantomData,
        }
    }

    /// Upper bound, binding it on first use. `None` for a list this cursor
    /// was not created from; a foreign list never binds the cursor.
    fn fence(&mut self, list: &ArrayList<T>) -> Option<usize> {
        if self.owner != list.owner() {
            return None;
        }
        Some(match self.fence {
            Some(hi) => hi,
            None => {
                let hi = list.len();
                self.fence = Some(hi);
                self.version = list.version();
                hi
            }
        })
    }

    fn check(&self, list: &ArrayList<T>) -> Result<()> {
        if self.owner != list.owner() {
            return Err(CollectionError::ForeignContainer);
        }
        list.mods.check(self.version)
    }
}

impl<T> SplitCursor<T> for ArraySplitter<T> {
    type Source = ArrayList<T>;
    type Piece = ArraySplitter<T>;

    fn estimate_remaining(&mut self, list: &ArrayList<T>) -> usize {
        self.fence(list).map_or(0, |hi| hi.saturating_sub(self.index))
    }

    fn try_advance<F>(&mut self, list: &ArrayList<T>, mut f: F) -> Result<bool>
    where
        F: FnMut(&T),
    {
        let hi = self.fence(list).ok_or(CollectionError::ForeignContainer)?;
        let i = self.index;
        if i >= hi {
            return Ok(false);
        }
        self.check(list)?;
        let Some(e) = list.as_slice().get(i) else {
            return Err(CollectionError::ConcurrentModification {
                expected: self.version,
                actual: list.version(),
            });
        };
        self.index = i + 1;
        f(e);
        Ok(true)
    }

    fn for_each_remaining<F>(&mut self, list: &ArrayList<T>, f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let hi = self.fence(list).ok_or(CollectionError::ForeignContainer)?;
        let lo = self.index;
        self.index = hi.max(lo);
        // A stale range may no longer fit the buffer; report it instead of
        // reading past the end
        if let Some(rest) = list.as_slice().get(lo..hi) {
            rest.iter().for_each(f);
        }
        self.check(list)
    }

    fn try_split(&mut self, list: &ArrayList<T>) -> Option<ArraySplitter<T>> {
        let hi = self.fence(list)?;
        let lo = self.index;
        let mid = lo + (hi.saturating_sub(lo) >> 1);
        if lo >= mid {
            return None;
        }
        self.index = mid;
        Some(Self::bound(self.owner, lo, mid, self.version))
    }
}
