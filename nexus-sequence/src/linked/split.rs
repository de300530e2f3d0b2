//! Splittable cursor over a [`LinkedList`].
//!
//! A linked list cannot be bisected without walking it, so a split peels a
//! batch of elements off the front into an owned [`Batch`] and keeps the
//! rest. Batches grow geometrically so that a parallel traversal of a long
//! list produces a logarithmic number of pieces.

use core::fmt;
use core::marker::PhantomData;
use std::collections::VecDeque;

use super::{LinkedList, Node, NodeSlab};
use crate::config::{BATCH_UNIT, MAX_BATCH};
use crate::error::{CollectionError, Result};
use crate::key::Key;
use crate::split::SplitCursor;
use crate::storage::Storage;
use crate::tracking::OwnerId;

/// Splittable cursor over a [`LinkedList`].
///
/// Binds to the list's head, length, and version on first use. Splits clone
/// elements into a [`Batch`], the first of [`BATCH_UNIT`] elements, each
/// later one twice the previous, capped at [`MAX_BATCH`].
pub struct LinkedSplitter<T, S = NodeSlab<T>, K: Key = usize> {
    owner: OwnerId,
    current: K,
    est: Option<usize>,
    batch: usize,
    version: u64,
    _marker: PhantomData<fn() -> (T, S)>,
}

impl<T, S, K: Key> fmt::Debug for LinkedSplitter<T, S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedSplitter")
            .field("current", &self.current)
            .field("est", &self.est)
            .field("batch", &self.batch)
            .field("version", &self.version)
            .finish()
    }
}

impl<T, S, K: Key> LinkedSplitter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    pub(super) fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            current: K::NONE,
            est: None,
            batch: 0,
            version: 0,
            _marker: PhantomData,
        }
    }

    /// Remaining count, binding on first use. `None` for a list this cursor
    /// was not created from; its keys and version are never taken.
    fn bind(&mut self, list: &LinkedList<T, S, K>) -> Option<usize> {
        if self.owner != list.owner {
            return None;
        }
        Some(match self.est {
            Some(est) => est,
            None => {
                let est = list.len();
                self.est = Some(est);
                self.current = list.head();
                self.version = list.version();
                est
            }
        })
    }

    fn check(&self, list: &LinkedList<T, S, K>) -> Result<()> {
        if self.owner != list.owner {
            return Err(CollectionError::ForeignContainer);
        }
        list.mods.check(self.version)
    }

    /// Size of the batch the last split produced (zero before any split).
    pub fn batch_size(&self) -> usize {
        self.batch
    }
}

impl<T: Clone, S, K: Key> SplitCursor<T> for LinkedSplitter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Source = LinkedList<T, S, K>;
    type Piece = Batch<T>;

    fn estimate_remaining(&mut self, list: &LinkedList<T, S, K>) -> usize {
        self.bind(list).unwrap_or(0)
    }

    fn try_advance<F>(&mut self, list: &LinkedList<T, S, K>, mut f: F) -> Result<bool>
    where
        F: FnMut(&T),
    {
        let est = self.bind(list).ok_or(CollectionError::ForeignContainer)?;
        if est == 0 || self.current.is_none() {
            return Ok(false);
        }
        // Keys are only followed while the version still matches
        self.check(list)?;
        let node = list.node(self.current);
        self.current = node.next;
        self.est = Some(est - 1);
        f(&node.data);
        Ok(true)
    }

    fn for_each_remaining<F>(&mut self, list: &LinkedList<T, S, K>, mut f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let mut est = self.bind(list).ok_or(CollectionError::ForeignContainer)?;
        if est == 0 {
            return Ok(());
        }
        self.check(list)?;
        while est > 0 && self.current.is_some() {
            let node = list.node(self.current);
            f(&node.data);
            self.current = node.next;
            est -= 1;
        }
        self.est = Some(0);
        self.current = K::NONE;
        Ok(())
    }

    fn try_split(&mut self, list: &LinkedList<T, S, K>) -> Option<Batch<T>> {
        let est = self.bind(list)?;
        if est <= 1 || self.current.is_none() || self.check(list).is_err() {
            return None;
        }

        let n = if self.batch == 0 {
            BATCH_UNIT
        } else {
            self.batch.saturating_mul(2)
        };
        let n = n.min(est).min(MAX_BATCH);

        let mut items = VecDeque::with_capacity(n);
        while items.len() < n && self.current.is_some() {
            let node = list.node(self.current);
            items.push_back(node.data.clone());
            self.current = node.next;
        }

        self.batch = items.len();
        self.est = Some(est - items.len());
        tracing::debug!(batch = items.len(), remaining = est - items.len(), "linked list split");
        Some(Batch { items })
    }
}

// =============================================================================
// Batch
// =============================================================================

/// Owned, detached run of elements split off a [`LinkedSplitter`].
///
/// Holds clones, so it is unaffected by later changes to the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch<T> {
    items: VecDeque<T>,
}

impl<T> Batch<T> {
    /// Elements left in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the batch is exhausted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Splits off the lower half. `None` below two elements.
    pub fn try_split(&mut self) -> Option<Batch<T>> {
        let len = self.items.len();
        if len < 2 {
            return None;
        }
        let upper = self.items.split_off(len / 2);
        let lower = core::mem::replace(&mut self.items, upper);
        Some(Batch { items: lower })
    }
}

impl<T> Iterator for Batch<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.items.len(), Some(self.items.len()))
    }
}

impl<T> DoubleEndedIterator for Batch<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.items.pop_back()
    }
}

impl<T> ExactSizeIterator for Batch<T> {}

impl<T> SplitCursor<T> for Batch<T> {
    type Source = ();
    type Piece = Batch<T>;

    fn estimate_remaining(&mut self, _: &()) -> usize {
        self.items.len()
    }

    fn try_advance<F>(&mut self, _: &(), mut f: F) -> Result<bool>
    where
        F: FnMut(&T),
    {
        match self.items.pop_front() {
            Some(item) => {
                f(&item);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn for_each_remaining<F>(&mut self, _: &(), mut f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        for item in self.items.drain(..) {
            f(&item);
        }
        Ok(())
    }

    fn try_split(&mut self, _: &()) -> Option<Batch<T>> {
        Batch::try_split(self)
    }
}
