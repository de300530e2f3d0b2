//! Doubly-linked list over keyed node storage.
//!
//! Nodes live in a [`Storage`] arena (by default `slab::Slab`) and link to
//! their neighbours by key. The list owns its storage; it tracks head, tail,
//! length, and a structural version shared with its detached cursors.
//!
//! Positional operations walk from whichever end is closer to the index.
//!
//! # Example
//!
//! ```
//! use nexus_sequence::{Deque, LinkedList};
//!
//! let mut list = LinkedList::new();
//! list.add_last(2);
//! list.add_first(1);
//! list.offer(3);
//! assert_eq!(list, [1, 2, 3]);
//!
//! assert_eq!(list.poll(), Some(1));
//! assert_eq!(list.pop(), Ok(2));
//! assert_eq!(list.peek_last(), Some(&3));
//! ```

mod iter;
mod split;

pub use iter::{DescendingIter, IntoIter, Iter, IterMut, LinkedListIter};
pub use split::{Batch, LinkedSplitter};

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::array::{ArrayList, copy_into};
use crate::error::{CollectionError, Result, check_index, check_position};
use crate::hash::{ValueHash, hash_ordered};
use crate::key::Key;
use crate::storage::Storage;
use crate::tracking::{ModCount, OwnerId, Stamp};
use crate::traits::{Contains, Deque, Sequence};

/// Default node storage: an unbounded slab keyed by `usize`.
pub type NodeSlab<T> = slab::Slab<Node<T, usize>>;

/// A list node: one element plus neighbour keys.
///
/// `prev` of the head and `next` of the tail are [`Key::NONE`].
#[derive(Debug)]
pub struct Node<T, K: Key = usize> {
    pub(crate) data: T,
    pub(crate) prev: K,
    pub(crate) next: K,
}

impl<T, K: Key> Node<T, K> {
    #[inline]
    fn new(data: T) -> Self {
        Self {
            data,
            prev: K::NONE,
            next: K::NONE,
        }
    }
}

/// A doubly-linked list that owns its node storage.
///
/// # Type Parameters
///
/// - `T`: element type
/// - `S`: node storage (default [`NodeSlab<T>`])
/// - `K`: storage key type (default `usize`)
pub struct LinkedList<T, S = NodeSlab<T>, K: Key = usize>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    mods: ModCount,
    owner: OwnerId,
    _marker: PhantomData<T>,
}

impl<T> LinkedList<T> {
    /// Creates an empty list over a fresh slab.
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty list whose slab has room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T, S, K: Key> Default for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::with_storage(S::default())
    }
}

// =============================================================================
// Base impl
// =============================================================================

impl<T, S, K: Key> LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty list over the given storage. Any nodes already in
    /// the storage are discarded.
    pub fn with_storage(mut storage: S) -> Self {
        storage.clear();
        Self {
            storage,
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            mods: ModCount::new(),
            owner: OwnerId::next(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current structural version.
    #[inline]
    pub fn version(&self) -> u64 {
        self.mods.get()
    }

    #[inline]
    pub(crate) fn stamp(&self) -> Stamp {
        Stamp::new(self.owner, self.mods)
    }

    #[inline]
    pub(crate) fn validate(&self, stamp: &Stamp) -> Result<()> {
        stamp.validate(self.owner, self.mods)
    }

    #[inline]
    pub(crate) fn head(&self) -> K {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> K {
        self.tail
    }

    /// Node behind a key reached from the list's own links.
    #[inline]
    pub(crate) fn node(&self, key: K) -> &Node<T, K> {
        debug_assert!(self.storage.get(key).is_some(), "vacant node key {key:?}");
        // Safety: keys reachable from head/tail are occupied
        unsafe { self.storage.get_unchecked(key) }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, key: K) -> &mut Node<T, K> {
        debug_assert!(self.storage.get(key).is_some(), "vacant node key {key:?}");
        // Safety: keys reachable from head/tail are occupied
        unsafe { self.storage.get_unchecked_mut(key) }
    }

    /// Key of the node at `index`, walking from the closer end.
    ///
    /// `index` must be below `len`.
    fn key_at(&self, index: usize) -> K {
        debug_assert!(index < self.len);
        if index < (self.len >> 1) {
            let mut key = self.head;
            for _ in 0..index {
                key = self.node(key).next;
            }
            key
        } else {
            let mut key = self.tail;
            for _ in index + 1..self.len {
                key = self.node(key).prev;
            }
            key
        }
    }

    // =========================================================================
    // Linking
    //
    // Each of these is one structural change.
    // =========================================================================

    fn link_first(&mut self, value: T) -> K {
        let key = self.storage.insert(Node::new(value));
        let old_head = self.head;
        self.node_mut(key).next = old_head;
        if old_head.is_some() {
            self.node_mut(old_head).prev = key;
        } else {
            self.tail = key;
        }
        self.head = key;
        self.len += 1;
        self.mods.bump();
        key
    }

    pub(crate) fn link_last(&mut self, value: T) -> K {
        let key = self.storage.insert(Node::new(value));
        let old_tail = self.tail;
        self.node_mut(key).prev = old_tail;
        if old_tail.is_some() {
            self.node_mut(old_tail).next = key;
        } else {
            self.head = key;
        }
        self.tail = key;
        self.len += 1;
        self.mods.bump();
        key
    }

    /// Links `value` right before the live node `succ`.
    pub(crate) fn link_before(&mut self, value: T, succ: K) -> K {
        let key = self.storage.insert(Node::new(value));
        let pred = self.node(succ).prev;
        {
            let node = self.node_mut(key);
            node.prev = pred;
            node.next = succ;
        }
        self.node_mut(succ).prev = key;
        if pred.is_some() {
            self.node_mut(pred).next = key;
        } else {
            self.head = key;
        }
        self.len += 1;
        self.mods.bump();
        key
    }

    /// Unlinks the live node `key` and moves its element out.
    pub(crate) fn unlink(&mut self, key: K) -> T {
        let (prev, next) = {
            let node = self.node(key);
            (node.prev, node.next)
        };

        if prev.is_some() {
            self.node_mut(prev).next = next;
        } else {
            self.head = next;
        }

        if next.is_some() {
            self.node_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }

        self.len -= 1;
        self.mods.bump();
        match self.storage.remove(key) {
            Some(node) => node.data,
            None => unreachable!("linked key missing from storage"),
        }
    }

    // =========================================================================
    // Positional access
    // =========================================================================

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.len)?;
        Ok(&self.node(self.key_at(index)).data)
    }

    /// Mutable element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.len)?;
        let key = self.key_at(index);
        Ok(&mut self.node_mut(key).data)
    }

    /// Replaces the element at `index`, returning the previous value. Not
    /// structural.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let slot = self.get_mut(index)?;
        Ok(core::mem::replace(slot, value))
    }

    /// Inserts `value` at `index` (`index <= len`).
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_position(index, self.len)?;
        if index == self.len {
            self.link_last(value);
        } else {
            let succ = self.key_at(index);
            self.link_before(value, succ);
        }
        Ok(())
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len)?;
        let key = self.key_at(index);
        Ok(self.unlink(key))
    }

    // =========================================================================
    // Ends
    // =========================================================================

    /// Inserts at the front.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        self.link_first(value);
    }

    /// Inserts at the back.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.link_last(value);
    }

    /// Removes the front element, if any.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_none() {
            return None;
        }
        Some(self.unlink(self.head))
    }

    /// Removes the back element, if any.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.tail.is_none() {
            return None;
        }
        Some(self.unlink(self.tail))
    }

    /// Front element, if any.
    pub fn front(&self) -> Option<&T> {
        if self.head.is_none() {
            None
        } else {
            Some(&self.node(self.head).data)
        }
    }

    /// Back element, if any.
    pub fn back(&self) -> Option<&T> {
        if self.tail.is_none() {
            None
        } else {
            Some(&self.node(self.tail).data)
        }
    }

    /// Mutable front element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.head.is_none() {
            None
        } else {
            let head = self.head;
            Some(&mut self.node_mut(head).data)
        }
    }

    /// Mutable back element, if any.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.tail.is_none() {
            None
        } else {
            let tail = self.tail;
            Some(&mut self.node_mut(tail).data)
        }
    }

    // =========================================================================
    // Search and removal by value
    // =========================================================================

    /// Position of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|e| e == item)
    }

    /// Position of the last element equal to `item`.
    pub fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().rev().position(|e| e == item).map(|i| self.len - 1 - i)
    }

    /// Returns `true` if any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|e| e == item)
    }

    /// Removes the first element equal to `item`.
    pub fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let mut key = self.head;
        while key.is_some() {
            let node = self.node(key);
            if node.data == *item {
                drop(self.unlink(key));
                return true;
            }
            key = node.next;
        }
        false
    }

    /// Removes the last element equal to `item`.
    pub fn remove_last_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let mut key = self.tail;
        while key.is_some() {
            let node = self.node(key);
            if node.data == *item {
                drop(self.unlink(key));
                return true;
            }
            key = node.prev;
        }
        false
    }

    // =========================================================================
    // Bulk
    // =========================================================================

    /// Removes every element.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
        self.mods.bump();
    }

    /// Appends every item. Returns `true` if anything was added.
    pub fn add_all<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len;
        // Infallible: `len` is always a valid insertion position
        self.insert_all(len, items).unwrap_or(false)
    }

    /// Inserts every item before position `index`, preserving their order.
    ///
    /// The whole insertion is a single structural change. `items` is drained
    /// before any node is linked, so a panicking iterator leaves the list as
    /// it was.
    pub fn insert_all<I>(&mut self, index: usize, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        check_position(index, self.len)?;
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Ok(false);
        }

        let succ = if index == self.len { K::NONE } else { self.key_at(index) };
        let mut pred = if succ.is_none() { self.tail } else { self.node(succ).prev };

        let added = items.len();
        for value in items {
            let key = self.storage.insert(Node::new(value));
            self.node_mut(key).prev = pred;
            if pred.is_some() {
                self.node_mut(pred).next = key;
            } else {
                self.head = key;
            }
            pred = key;
        }

        if succ.is_some() {
            self.node_mut(pred).next = succ;
            self.node_mut(succ).prev = pred;
        } else {
            self.tail = pred;
        }
        self.len += added;
        self.mods.bump();
        Ok(true)
    }

    // =========================================================================
    // Iteration and export
    // =========================================================================

    /// Borrowing iterator, head to tail.
    pub fn iter(&self) -> Iter<'_, T, S, K> {
        Iter::new(&self.storage, self.head, self.tail, self.len)
    }

    /// Borrowing mutable iterator, head to tail.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, S, K> {
        IterMut::new(&mut self.storage, self.head, self.tail, self.len)
    }

    /// Borrowing iterator, tail to head.
    pub fn descending_iter(&self) -> core::iter::Rev<Iter<'_, T, S, K>> {
        self.iter().rev()
    }

    /// Calls `f` on each element in order.
    pub fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.iter().for_each(f);
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// See [`ArrayList::to_array_in`].
    pub fn to_array_in(&self, dest: Vec<Option<T>>) -> Vec<Option<T>>
    where
        T: Clone,
    {
        copy_into(self.iter(), self.len, dest)
    }

    /// Ordered polynomial hash of the elements.
    pub fn hash_code(&self) -> i32
    where
        T: ValueHash,
    {
        hash_ordered(self.iter())
    }

    // =========================================================================
    // Detached handles
    // =========================================================================

    /// Fail-fast bidirectional cursor starting before `index`.
    pub fn list_iter(&self, index: usize) -> Result<LinkedListIter<T, K>> {
        check_position(index, self.len)?;
        let next = if index == self.len { K::NONE } else { self.key_at(index) };
        Ok(LinkedListIter::new(next, index, self.stamp()))
    }

    /// Fail-fast cursor walking tail to head.
    pub fn descending_cursor(&self) -> DescendingIter<T, K> {
        DescendingIter::new(LinkedListIter::new(K::NONE, self.len, self.stamp()))
    }

    /// Splittable cursor. Binds on first use.
    pub fn splitter(&self) -> LinkedSplitter<T, S, K> {
        LinkedSplitter::new(self.owner)
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T, S, K: Key> Deque<T> for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn add_first(&mut self, value: T) {
        self.push_front(value);
    }

    fn add_last(&mut self, value: T) {
        self.push_back(value);
    }

    fn remove_first(&mut self) -> Result<T> {
        self.pop_front().ok_or(CollectionError::Empty)
    }

    fn remove_last(&mut self) -> Result<T> {
        self.pop_back().ok_or(CollectionError::Empty)
    }

    fn get_first(&self) -> Result<&T> {
        self.front().ok_or(CollectionError::Empty)
    }

    fn get_last(&self) -> Result<&T> {
        self.back().ok_or(CollectionError::Empty)
    }

    fn peek_first(&self) -> Option<&T> {
        self.front()
    }

    fn peek_last(&self) -> Option<&T> {
        self.back()
    }

    fn poll_first(&mut self) -> Option<T> {
        self.pop_front()
    }

    fn poll_last(&mut self) -> Option<T> {
        self.pop_back()
    }
}

impl<T, S, K: Key> Sequence<T> for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Result<&T> {
        LinkedList::get(self, index)
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        LinkedList::get_mut(self, index)
    }

    fn set(&mut self, index: usize, value: T) -> Result<T> {
        LinkedList::set(self, index, value)
    }

    fn add(&mut self, value: T) -> Result<()> {
        self.push_back(value);
        Ok(())
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        LinkedList::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Result<T> {
        LinkedList::remove(self, index)
    }

    fn clear(&mut self) {
        LinkedList::clear(self)
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        LinkedList::for_each(self, f)
    }

    fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        LinkedList::index_of(self, item)
    }

    fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        LinkedList::last_index_of(self, item)
    }
}

impl<T: PartialEq, S, K: Key> Contains<T> for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn contains(&self, item: &T) -> bool {
        LinkedList::contains(self, item)
    }
}

impl<T: Clone, S, K: Key> Clone for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Copies the elements into a new list with fresh identity and version.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug, S, K: Key> fmt::Debug for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash, S, K: Key> Hash for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for e in self.iter() {
            e.hash(state);
        }
    }
}

fn iter_eq<'a, 'b, T: PartialEq<U> + 'a, U: 'b>(
    a: impl ExactSizeIterator<Item = &'a T>,
    b: impl ExactSizeIterator<Item = &'b U>,
) -> bool {
    a.len() == b.len() && a.zip(b).all(|(x, y)| x == y)
}

impl<T, U, S, S2, K: Key, K2: Key> PartialEq<LinkedList<U, S2, K2>> for LinkedList<T, S, K>
where
    T: PartialEq<U>,
    S: Storage<Node<T, K>, Key = K>,
    S2: Storage<Node<U, K2>, Key = K2>,
{
    fn eq(&self, other: &LinkedList<U, S2, K2>) -> bool {
        iter_eq(self.iter(), other.iter())
    }
}

impl<T: Eq, S, K: Key> Eq for LinkedList<T, S, K> where S: Storage<Node<T, K>, Key = K> {}

impl<T, U, S, K: Key> PartialEq<ArrayList<U>> for LinkedList<T, S, K>
where
    T: PartialEq<U>,
    S: Storage<Node<T, K>, Key = K>,
{
    fn eq(&self, other: &ArrayList<U>) -> bool {
        iter_eq(self.iter(), other.iter())
    }
}

impl<T, U, S, K: Key> PartialEq<LinkedList<U, S, K>> for ArrayList<T>
where
    T: PartialEq<U>,
    S: Storage<Node<U, K>, Key = K>,
{
    fn eq(&self, other: &LinkedList<U, S, K>) -> bool {
        iter_eq(self.iter(), other.iter())
    }
}

impl<T, U, S, K: Key> PartialEq<[U]> for LinkedList<T, S, K>
where
    T: PartialEq<U>,
    S: Storage<Node<T, K>, Key = K>,
{
    fn eq(&self, other: &[U]) -> bool {
        iter_eq(self.iter(), other.iter())
    }
}

impl<T, U, S, K: Key, const N: usize> PartialEq<[U; N]> for LinkedList<T, S, K>
where
    T: PartialEq<U>,
    S: Storage<Node<T, K>, Key = K>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        iter_eq(self.iter(), other.iter())
    }
}

impl<T, U, S, K: Key> PartialEq<Vec<U>> for LinkedList<T, S, K>
where
    T: PartialEq<U>,
    S: Storage<Node<T, K>, Key = K>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        iter_eq(self.iter(), other.iter())
    }
}

impl<T, S, K: Key> Extend<T> for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<T, S, K: Key> FromIterator<T> for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.add_all(iter);
        list
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for LinkedList<T> {
    fn from(items: &[T]) -> Self {
        items.iter().cloned().collect()
    }
}

impl<T, S, K: Key> IntoIterator for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = T;
    type IntoIter = IntoIter<T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, S, K: Key> IntoIterator for &'a LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, S, K: Key> IntoIterator for &'a mut LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}


#[cfg(test)]
mod bench_latency {
    use super::*;
    use hdrhistogram::Histogram;

    #[inline]
    fn rdtscp() -> u64 {
        #[cfg(target_arch = "x86_64")]
        unsafe {
            core::arch::x86_64::__rdtscp(&mut 0)
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            std::time::Instant::now().elapsed().as_nanos() as u64
        }
    }

    fn print_histogram(name: &str, hist: &Histogram<u64>) {
        println!(
            "{:24} p50: {:4} cycles | p99: {:4} cycles | p999: {:5} cycles | min: {:4} | max: {:5}",
            name,
            hist.value_at_quantile(0.50),
            hist.value_at_quantile(0.99),
            hist.value_at_quantile(0.999),
            hist.min(),
            hist.max(),
        );
    }

    const WARMUP: usize = 10_000;
    const ITERATIONS: usize = 100_000;

    #[test]
    #[ignore]
    fn bench_push_back() {
        let mut list: LinkedList<u64> = LinkedList::with_capacity(16);
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for i in 0..WARMUP {
            list.push_back(i as u64);
            let _ = list.pop_back();
        }

        for i in 0..ITERATIONS {
            let start = rdtscp();
            list.push_back(i as u64);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            let _ = list.pop_back();
        }

        print_histogram("push_back", &hist);
    }

    #[test]
    #[ignore]
    fn bench_pop_front() {
        let mut list: LinkedList<u64> = LinkedList::with_capacity(16);
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for _ in 0..WARMUP {
            list.push_back(1);
            let _ = list.pop_front();
        }

        for _ in 0..ITERATIONS {
            list.push_back(1);
            let start = rdtscp();
            let v = list.pop_front();
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            core::hint::black_box(v);
        }

        print_histogram("pop_front", &hist);
    }

    #[test]
    #[ignore]
    fn bench_cursor_remove() {
        let mut list: LinkedList<u64> = (0..ITERATIONS as u64).collect();
        let mut it = list.list_iter(0).unwrap();
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for _ in 0..ITERATIONS {
            let _ = it.next(&list);
            let start = rdtscp();
            let v = it.remove(&mut list);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            core::hint::black_box(v.ok());
        }

        print_histogram("cursor remove", &hist);
    }
}
