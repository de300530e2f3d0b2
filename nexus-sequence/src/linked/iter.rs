//! Iterators and detached cursors for [`LinkedList`].

use core::fmt;
use core::marker::PhantomData;

use super::{LinkedList, Node};
use crate::error::{CollectionError, Result};
use crate::key::Key;
use crate::storage::Storage;
use crate::tracking::Stamp;

// =============================================================================
// Borrowing iterators
// =============================================================================

/// Iterator over references to list elements.
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> Iter<'a, T, S, K> {
    pub(super) fn new(storage: &'a S, front: K, back: K, remaining: usize) -> Self {
        Self {
            storage,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<T, S, K: Key> Clone for Iter<'_, T, S, K> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Safety: `remaining > 0` means front is a live node of the list
        let node = unsafe { self.storage.get_unchecked(self.front) };
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.data)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Safety: `remaining > 0` means back is a live node of the list
        let node = unsafe { self.storage.get_unchecked(self.back) };
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.data)
    }
}

impl<'a, T: 'a, S, K: Key + 'a> ExactSizeIterator for Iter<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

impl<'a, T: 'a, S, K: Key + 'a> core::iter::FusedIterator for Iter<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

/// Iterator over mutable references to list elements.
pub struct IterMut<'a, T, S, K: Key> {
    storage: &'a mut S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> IterMut<'a, T, S, K> {
    pub(super) fn new(storage: &'a mut S, front: K, back: K, remaining: usize) -> Self {
        Self {
            storage,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for IterMut<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Safety: `remaining > 0` means front is a live node of the list
        let node = unsafe { self.storage.get_unchecked_mut(self.front) };
        self.front = node.next;
        self.remaining -= 1;
        // Safety: each node is yielded at most once, from either end
        Some(unsafe { &mut *((&mut node.data) as *mut T) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for IterMut<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Safety: `remaining > 0` means back is a live node of the list
        let node = unsafe { self.storage.get_unchecked_mut(self.back) };
        self.back = node.prev;
        self.remaining -= 1;
        // Safety: each node is yielded at most once, from either end
        Some(unsafe { &mut *((&mut node.data) as *mut T) })
    }
}

impl<'a, T: 'a, S, K: Key + 'a> ExactSizeIterator for IterMut<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

// =============================================================================
// IntoIter
// =============================================================================

/// Owning iterator returned by [`LinkedList::into_iter`].
pub struct IntoIter<T, S, K: Key>
where
    S: Storage<Node<T, K>, Key = K>,
{
    list: LinkedList<T, S, K>,
}

impl<T, S, K: Key> IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    pub(super) fn new(list: LinkedList<T, S, K>) -> Self {
        Self { list }
    }
}

impl<T, S, K: Key> Iterator for IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, S, K: Key> DoubleEndedIterator for IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, S, K: Key> ExactSizeIterator for IntoIter<T, S, K> where S: Storage<Node<T, K>, Key = K> {}

impl<T: fmt::Debug, S, K: Key> fmt::Debug for IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

// =============================================================================
// LinkedListIter
// =============================================================================

/// Fail-fast bidirectional cursor over a [`LinkedList`].
///
/// Holds the key of the node a `next` call would return and the key of the
/// node last returned, plus the list's identity and version. Every call
/// takes the list and validates those before touching any key, so a stale
/// cursor never follows a freed link.
pub struct LinkedListIter<T, K: Key = usize> {
    next: K,
    last_returned: K,
    next_index: usize,
    stamp: Stamp,
    _marker: PhantomData<fn() -> T>,
}

impl<T, K: Key> Clone for LinkedListIter<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: Key> Copy for LinkedListIter<T, K> {}

impl<T, K: Key> fmt::Debug for LinkedListIter<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedListIter")
            .field("next", &self.next)
            .field("last_returned", &self.last_returned)
            .field("next_index", &self.next_index)
            .field("version", &self.stamp.version())
            .finish()
    }
}

impl<T, K: Key> LinkedListIter<T, K> {
    pub(super) fn new(next: K, next_index: usize, stamp: Stamp) -> Self {
        Self {
            next,
            last_returned: K::NONE,
            next_index,
            stamp,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if an element follows the cursor.
    #[inline]
    pub fn has_next<S>(&self, list: &LinkedList<T, S, K>) -> bool
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        self.next_index < list.len()
    }

    /// Returns `true` if an element precedes the cursor.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.next_index > 0
    }

    /// Index of the element a call to `next` would return.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Index of the element a call to `previous` would return.
    #[inline]
    pub fn previous_index(&self) -> Option<usize> {
        self.next_index.checked_sub(1)
    }

    /// Advances past the next element and returns it.
    pub fn next<'a, S>(&mut self, list: &'a LinkedList<T, S, K>) -> Result<Option<&'a T>>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        list.validate(&self.stamp)?;
        if self.next_index >= list.len() {
            return Ok(None);
        }
        let node = list.node(self.next);
        self.last_returned = self.next;
        self.next = node.next;
        self.next_index += 1;
        Ok(Some(&node.data))
    }

    /// Steps back over the previous element and returns it.
    pub fn previous<'a, S>(&mut self, list: &'a LinkedList<T, S, K>) -> Result<Option<&'a T>>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        list.validate(&self.stamp)?;
        if self.next_index == 0 {
            return Ok(None);
        }
        let prev = if self.next.is_none() {
            list.tail()
        } else {
            list.node(self.next).prev
        };
        self.next = prev;
        self.last_returned = prev;
        self.next_index -= 1;
        Ok(Some(&list.node(prev).data))
    }

    /// Removes the element last returned by `next` or `previous`.
    pub fn remove<S>(&mut self, list: &mut LinkedList<T, S, K>) -> Result<T>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        list.validate(&self.stamp)?;
        let last = self.last_returned;
        if last.is_none() {
            return Err(CollectionError::IllegalState);
        }
        let last_next = list.node(last).next;
        let value = list.unlink(last);
        if self.next == last {
            // Came from `previous`: the cursor already sits before it
            self.next = last_next;
        } else {
            self.next_index -= 1;
        }
        self.last_returned = K::NONE;
        self.stamp.refresh(list.mods);
        Ok(value)
    }

    /// Replaces the element last returned by `next` or `previous`.
    pub fn set<S>(&mut self, list: &mut LinkedList<T, S, K>, value: T) -> Result<T>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        let last = self.last_returned;
        if last.is_none() {
            return Err(CollectionError::IllegalState);
        }
        list.validate(&self.stamp)?;
        Ok(core::mem::replace(&mut list.node_mut(last).data, value))
    }

    /// Inserts `value` before the cursor.
    pub fn add<S>(&mut self, list: &mut LinkedList<T, S, K>, value: T) -> Result<()>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        list.validate(&self.stamp)?;
        self.last_returned = K::NONE;
        if self.next.is_none() {
            list.link_last(value);
        } else {
            list.link_before(value, self.next);
        }
        self.next_index += 1;
        self.stamp.refresh(list.mods);
        Ok(())
    }

    /// Visits every element after the cursor, leaving the cursor at the end.
    pub fn for_each_remaining<S, F>(&mut self, list: &LinkedList<T, S, K>, mut f: F) -> Result<()>
    where
        S: Storage<Node<T, K>, Key = K>,
        F: FnMut(&T),
    {
        list.validate(&self.stamp)?;
        while self.next_index < list.len() {
            let node = list.node(self.next);
            f(&node.data);
            self.last_returned = self.next;
            self.next = node.next;
            self.next_index += 1;
        }
        Ok(())
    }
}

/// Fail-fast cursor walking a [`LinkedList`] from tail to head.
pub struct DescendingIter<T, K: Key = usize> {
    inner: LinkedListIter<T, K>,
}

impl<T, K: Key> Clone for DescendingIter<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: Key> Copy for DescendingIter<T, K> {}

impl<T, K: Key> fmt::Debug for DescendingIter<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DescendingIter").field(&self.inner).finish()
    }
}

impl<T, K: Key> DescendingIter<T, K> {
    pub(super) fn new(inner: LinkedListIter<T, K>) -> Self {
        Self { inner }
    }

    /// Returns `true` if another element remains towards the head.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.inner.has_previous()
    }

    /// Returns the next element towards the head.
    pub fn next<'a, S>(&mut self, list: &'a LinkedList<T, S, K>) -> Result<Option<&'a T>>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        self.inner.previous(list)
    }

    /// Removes the element last returned by `next`.
    pub fn remove<S>(&mut self, list: &mut LinkedList<T, S, K>) -> Result<T>
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        self.inner.remove(list)
    }
}
