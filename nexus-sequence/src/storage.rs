//! Node storage with stable keys.
//!
//! A [`LinkedList`](crate::LinkedList) keeps its nodes in an arena and links
//! them by key. Keys stay valid until the node is removed, and removed slots
//! may be handed out again, so a stale key is only safe to follow after the
//! list's version has been validated.
//!
//! Two backends are provided:
//!
//! | Backend | Key | Node links |
//! |---------|-----|------------|
//! | `slab::Slab<T>` | `usize` | two words |
//! | [`KeyedSlab<T, K>`] | any [`Key`], `u32` by default | two `K`s |

use core::marker::PhantomData;

use crate::Key;

/// Slab-like growable storage with stable keys.
///
/// # Requirements
///
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get
/// - **Slot reuse**: removed slots may be reused by later inserts
///
/// The default implementation is `slab::Slab<T>`.
pub trait Storage<T>: Default {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Inserts a value, returning its key.
    fn insert(&mut self, value: T) -> Self::Key;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;

    /// Removes every value.
    fn clear(&mut self);
}

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn insert(&mut self, value: T) -> usize {
        slab::Slab::insert(self, value)
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }

    #[inline]
    fn clear(&mut self) {
        slab::Slab::clear(self)
    }
}

/// Slab handing out narrow keys.
///
/// With `K = u32` every link in a node is four bytes instead of eight,
/// at the cost of capping the arena at `u32::MAX - 1` live slots.
///
/// # Example
///
/// ```
/// use nexus_sequence::{KeyedSlab, LinkedList, Node};
///
/// let mut list: LinkedList<u8, KeyedSlab<Node<u8, u32>>, u32> =
///     LinkedList::with_storage(KeyedSlab::with_capacity(16));
/// list.extend([1, 2, 3]);
/// assert_eq!(list, [1, 2, 3]);
/// ```
pub struct KeyedSlab<T, K: Key = u32> {
    slab: slab::Slab<T>,
    _key: PhantomData<K>,
}

impl<T, K: Key> KeyedSlab<T, K> {
    /// Creates an empty slab.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty slab with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slab: slab::Slab::with_capacity(capacity),
            _key: PhantomData,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }
}

impl<T, K: Key> Default for KeyedSlab<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug, K: Key> core::fmt::Debug for KeyedSlab<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyedSlab")
            .field("len", &self.slab.len())
            .field("capacity", &self.slab.capacity())
            .finish()
    }
}

impl<T, K: Key> Storage<T> for KeyedSlab<T, K> {
    type Key = K;

    /// # Panics
    ///
    /// Panics if the next free slot index is not representable as `K`.
    #[inline]
    fn insert(&mut self, value: T) -> K {
        let slot = self.slab.vacant_key();
        match K::from_usize(slot) {
            Some(key) => {
                self.slab.insert(value);
                key
            }
            None => panic!("slot {slot} does not fit the storage key type"),
        }
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        self.slab.try_remove(key.as_usize())
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.slab.get(key.as_usize())
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        // Safety: caller guarantees the slot is occupied
        unsafe { self.slab.get_unchecked(key.as_usize()) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        // Safety: caller guarantees the slot is occupied
        unsafe { self.slab.get_unchecked_mut(key.as_usize()) }
    }

    #[inline]
    fn clear(&mut self) {
        self.slab.clear()
    }
}
