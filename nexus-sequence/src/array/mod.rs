//! Contiguous growable list.
//!
//! [`ArrayList`] owns a single [`RawBuffer`] and shifts elements in place on
//! positional insertion and removal. Every structural change bumps the list's
//! version, which detached handles ([`ListIter`], [`SubList`],
//! [`ArraySplitter`]) check before touching the buffer.
//!
//! # Example
//!
//! ```
//! use nexus_sequence::ArrayList;
//!
//! let mut list = ArrayList::new();
//! list.push(1).unwrap();
//! list.push(3).unwrap();
//! list.insert(1, 2).unwrap();
//! assert_eq!(list, [1, 2, 3]);
//!
//! // Detached cursor: the list is passed to every call
//! let mut it = list.list_iter(0).unwrap();
//! while let Some(&v) = it.next(&list).unwrap() {
//!     if v == 2 {
//!         break;
//!     }
//! }
//! it.remove(&mut list).unwrap();
//! assert_eq!(list, [1, 3]);
//! ```
//!
//! # Fail-fast handles
//!
//! ```
//! use nexus_sequence::{ArrayList, CollectionError};
//!
//! let mut list: ArrayList<u32> = (0..4).collect();
//! let mut it = list.list_iter(0).unwrap();
//!
//! list.push(9).unwrap(); // structural change behind the cursor
//! assert!(matches!(
//!     it.next(&list),
//!     Err(CollectionError::ConcurrentModification { .. })
//! ));
//! ```

mod iter;
mod split;
mod view;

pub use iter::{IntoIter, ListIter};
pub use split::ArraySplitter;
pub use view::{SubList, SubListIter};

use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};
use core::ptr;

use crate::buffer::RawBuffer;
use crate::config::GrowthPolicy;
use crate::error::{CollectionError, Result, check_index, check_position, check_range};
use crate::hash::{ValueHash, hash_ordered};
use crate::tracking::{ModCount, OwnerId, Stamp};
use crate::traits::{Contains, Sequence};

/// A growable list backed by one contiguous buffer.
///
/// A list created with [`new`](Self::new) holds no storage until the first
/// insertion, which allocates room for
/// [`GrowthPolicy::DEFAULT_CAPACITY`] elements (or more if required). Later
/// growth is by half of the current capacity.
///
/// Reads and [`set`](Self::set) are not structural. Insertion, removal,
/// clearing, sorting, [`replace_all`](Self::replace_all) and buffer
/// reallocation through [`ensure_capacity`](Self::ensure_capacity) or
/// [`trim_to_size`](Self::trim_to_size) all are.
pub struct ArrayList<T> {
    buf: RawBuffer<T>,
    mods: ModCount,
    owner: OwnerId,
    policy: GrowthPolicy,
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Construction and accessors
// =============================================================================

impl<T> ArrayList<T> {
    /// Creates an empty list with the default growth policy.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Creates an empty list with a custom growth policy.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_sequence::{ArrayList, CollectionError, GrowthPolicy};
    ///
    /// let mut list = ArrayList::with_policy(GrowthPolicy::with_max_len(2));
    /// list.push(1).unwrap();
    /// list.push(2).unwrap();
    /// assert!(matches!(list.push(3), Err(CollectionError::CapacityExhausted { .. })));
    /// ```
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            buf: RawBuffer::new(),
            mods: ModCount::new(),
            owner: OwnerId::next(),
            policy,
        }
    }

    /// Creates an empty list with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`GrowthPolicy::DEFAULT_MAX_LEN`].
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(list) => list,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty list with room for exactly `capacity` elements.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `capacity` exceeds
    /// the maximum sequence length.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let policy = GrowthPolicy::default();
        if capacity > policy.max_len {
            return Err(CollectionError::InvalidArgument(
                "capacity exceeds the maximum sequence length",
            ));
        }
        Ok(Self {
            buf: RawBuffer::with_capacity(capacity)?,
            mods: ModCount::new(),
            owner: OwnerId::next(),
            policy,
        })
    }

    /// Copies every element of another sequence, in order.
    pub fn from_sequence<S>(source: &S) -> Result<Self>
    where
        S: Sequence<T> + ?Sized,
        T: Clone,
    {
        let mut list = Self::try_with_capacity(source.len())?;
        source.for_each(|e| list.buf.push(e.clone()));
        Ok(list)
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the list holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of elements the list can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Number of times the backing buffer has been reallocated.
    #[inline]
    pub fn reallocations(&self) -> usize {
        self.buf.reallocations()
    }

    /// Current structural version.
    #[inline]
    pub fn version(&self) -> u64 {
        self.mods.get()
    }

    /// Growth policy in effect.
    #[inline]
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
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
    pub(crate) fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Grows the buffer so that `required` elements fit. Not structural on
    /// its own; callers bump the version for the operation as a whole.
    #[inline]
    fn reserve_for(&mut self, required: usize) -> Result<()> {
        self.buf.grow(required, &self.policy)?;
        Ok(())
    }

    // =========================================================================
    // Element access
    // =========================================================================

    /// Returns the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        Ok(&self.buf.as_slice()[index])
    }

    /// Returns the element at `index` mutably.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.len())?;
        Ok(&mut self.buf.as_mut_slice()[index])
    }

    /// Replaces the element at `index`, returning the previous value.
    ///
    /// Not a structural change: live iterators stay valid.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let slot = self.get_mut(index)?;
        Ok(core::mem::replace(slot, value))
    }

    /// First element, if any.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.buf.as_slice().first()
    }

    /// Last element, if any.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.buf.as_slice().last()
    }

    /// Elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Elements as a mutable slice.
    ///
    /// Writes through the slice are not structural and do not advance the
    /// version, and that includes reordering such as `sort` or `swap`. Live
    /// cursors keep their positions and will observe the new order. Use
    /// [`sort_by`](Self::sort_by) when open handles must be invalidated.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    /// Borrowing iterator.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.buf.as_slice().iter()
    }

    /// Borrowing mutable iterator. Like [`as_mut_slice`](Self::as_mut_slice),
    /// writes through it are not structural.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.buf.as_mut_slice().iter_mut()
    }

    /// Calls `f` on each element in order.
    pub fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.iter().for_each(f);
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Appends `value`.
    ///
    /// Amortized O(1). Fails with [`CollectionError::CapacityExhausted`] if
    /// the list already holds the policy's maximum length.
    pub fn push(&mut self, value: T) -> Result<()> {
        let len = self.len();
        if len == self.buf.capacity() {
            self.reserve_for(len + 1)?;
        }
        self.mods.bump();
        self.buf.push(value);
        Ok(())
    }

    /// Inserts `value` at `index`, shifting `[index, len)` one slot back.
    ///
    /// Requires `index <= len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        check_position(index, len)?;
        if len == self.buf.capacity() {
            self.reserve_for(len + 1)?;
        }
        self.mods.bump();
        self.buf.insert(index, value);
        Ok(())
    }

    /// Appends every item, in order.
    ///
    /// Reserves for the iterator's lower size bound up front. Returns
    /// `true` if anything was added. On a capacity failure the items added so
    /// far stay in the list.
    pub fn add_all<I>(&mut self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        let start = self.len();
        self.reserve_for(start.saturating_add(items.size_hint().0))?;
        for item in items {
            let len = self.len();
            if len == self.buf.capacity() {
                self.reserve_for(len + 1)?;
            }
            if len == start {
                self.mods.bump();
            }
            self.buf.push(item);
        }
        Ok(self.len() != start)
    }

    /// Appends clones of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<bool>
    where
        T: Clone,
    {
        self.add_all(items.iter().cloned())
    }

    /// Inserts every item at `index`, preserving their order, with a single
    /// shift of the tail.
    pub fn insert_all<I>(&mut self, index: usize, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        check_position(index, len)?;
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Ok(false);
        }
        self.reserve_for(len.saturating_add(items.len()))?;
        self.mods.bump();
        self.buf.insert_many(index, items);
        Ok(true)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        self.mods.bump();
        Ok(self.buf.remove(index))
    }

    /// Removes the first element equal to `item`. Returns `true` if one was
    /// found.
    pub fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(item) {
            Some(index) => {
                self.mods.bump();
                drop(self.buf.remove(index));
                true
            }
            None => false,
        }
    }

    /// Removes `[from, to)` with a single shift of the tail.
    ///
    /// Fails with [`CollectionError::InvalidRange`] if `from > to`, or
    /// [`CollectionError::OutOfBounds`] if `to > len`.
    pub fn remove_range(&mut self, from: usize, to: usize) -> Result<()> {
        check_range(from, to, self.len())?;
        self.mods.bump();
        self.buf.remove_range(from, to);
        Ok(())
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.mods.bump();
        self.buf.clear();
    }

    /// Removes every element that `c` contains.
    pub fn remove_all<C>(&mut self, c: &C) -> bool
    where
        C: Contains<T> + ?Sized,
    {
        let len = self.len();
        infallible(self.batch_remove_range(0, len, false, |e| Ok(c.contains(e))))
    }

    /// Keeps only the elements that `c` contains.
    pub fn retain_all<C>(&mut self, c: &C) -> bool
    where
        C: Contains<T> + ?Sized,
    {
        let len = self.len();
        infallible(self.batch_remove_range(0, len, true, |e| Ok(c.contains(e))))
    }

    /// Removes from `[from, to)` every element whose membership differs from
    /// `complement`.
    ///
    /// `membership` is called once per element in a single forward scan.
    /// If it fails, or panics, the elements it has not yet examined are
    /// shifted back over the gap before the error propagates: nothing is
    /// lost and the list stays consistent. The version advances by the
    /// number of elements removed.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_sequence::{ArrayList, CollectionError};
    ///
    /// let mut list: ArrayList<u32> = (0..6).collect();
    /// let result = list.try_batch_remove(0, 6, false, |&e| {
    ///     if e == 4 {
    ///         Err(CollectionError::InvalidArgument("unreadable"))
    ///     } else {
    ///         Ok(e % 2 == 1)
    ///     }
    /// });
    /// assert!(result.is_err());
    /// // 1 and 3 were removed before the failure; 4 and 5 were kept
    /// assert_eq!(list, [0, 2, 4, 5]);
    /// ```
    pub fn try_batch_remove<E, F>(
        &mut self,
        from: usize,
        to: usize,
        complement: bool,
        membership: F,
    ) -> Result<bool, E>
    where
        E: From<CollectionError>,
        F: FnMut(&T) -> Result<bool, E>,
    {
        check_range(from, to, self.len()).map_err(E::from)?;
        self.batch_remove_range(from, to, complement, membership)
    }

    fn batch_remove_range<E, F>(
        &mut self,
        from: usize,
        to: usize,
        complement: bool,
        mut membership: F,
    ) -> Result<bool, E>
    where
        F: FnMut(&T) -> Result<bool, E>,
    {
        let slice = self.buf.as_slice();
        let mut first = from;
        loop {
            if first == to {
                return Ok(false);
            }
            if membership(&slice[first])? != complement {
                break;
            }
            first += 1;
        }

        let mut gap = Compactor::new(&mut self.buf, Some(&mut self.mods), first);
        gap.discard();
        while gap.read < to {
            // Safety: read < to <= old_len, slot is live
            let keep = membership(unsafe { gap.current() })? == complement;
            if keep {
                gap.keep();
            } else {
                gap.discard();
            }
        }
        Ok(true)
    }

    /// Removes every element matching `pred`. Returns `true` if any was
    /// removed.
    ///
    /// `pred` sees every element before anything moves: a panicking
    /// predicate leaves the list untouched.
    pub fn remove_if<F>(&mut self, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let len = self.len();
        self.remove_if_range(0, len, pred)
    }

    /// Keeps only the elements matching `keep`.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.remove_if(|e| !keep(e))
    }

    fn remove_if_range<F>(&mut self, from: usize, to: usize, mut pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let expected = self.mods.get();
        let slice = self.buf.as_slice();
        let Some(first) = slice[from..to].iter().position(&mut pred) else {
            return false;
        };
        let first = from + first;

        // Pass 1: record the doomed positions
        let mut doomed = DeathRow::new(to - first);
        doomed.set(0);
        for (i, e) in slice[first + 1..to].iter().enumerate() {
            if pred(e) {
                doomed.set(i + 1);
            }
        }
        debug_assert_eq!(self.mods.get(), expected);

        // Pass 2: compact
        self.mods.bump();
        let mut gap = Compactor::new(&mut self.buf, None, first);
        for i in 0..to - first {
            if doomed.get(i) {
                gap.discard();
            } else {
                gap.keep();
            }
        }
        true
    }

    // =========================================================================
    // Bulk mutation
    // =========================================================================

    /// Updates every element in place. Structural.
    pub fn replace_all<F>(&mut self, f: F)
    where
        F: FnMut(&mut T),
    {
        self.buf.as_mut_slice().iter_mut().for_each(f);
        self.mods.bump();
    }

    /// Stable sort by `compare`. Always structural, even if nothing moved.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.buf.as_mut_slice().sort_by(compare);
        self.mods.bump();
    }

    /// Stable sort in ascending order.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(Ord::cmp);
    }

    // =========================================================================
    // Capacity
    // =========================================================================

    /// Ensures room for at least `min_capacity` elements.
    ///
    /// A default-constructed list that has not allocated yet ignores requests
    /// at or below the default capacity. Structural when it reallocates.
    pub fn ensure_capacity(&mut self, min_capacity: usize) -> Result<()> {
        if min_capacity <= self.buf.capacity() {
            return Ok(());
        }
        if self.buf.is_lazy_default() && min_capacity <= self.policy.default_capacity {
            return Ok(());
        }
        self.reserve_for(min_capacity)?;
        self.mods.bump();
        Ok(())
    }

    /// Shrinks capacity to the current length. Structural.
    pub fn trim_to_size(&mut self) -> Result<()> {
        self.mods.bump();
        self.buf.trim()?;
        Ok(())
    }

    // =========================================================================
    // Search
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
        self.iter().rposition(|e| e == item)
    }

    /// Returns `true` if any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(item).is_some()
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    /// Copies the elements into `dest` if it is large enough, else into a
    /// fresh vector of exactly `len` slots.
    ///
    /// When `dest` is strictly larger, the slot right after the last element
    /// is set to `None`; later slots are left as they were.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_sequence::ArrayList;
    ///
    /// let list: ArrayList<u32> = (1..=2).collect();
    /// let out = list.to_array_in(vec![Some(9); 4]);
    /// assert_eq!(out, [Some(1), Some(2), None, Some(9)]);
    /// ```
    pub fn to_array_in(&self, dest: Vec<Option<T>>) -> Vec<Option<T>>
    where
        T: Clone,
    {
        copy_into(self.iter(), self.len(), dest)
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
    pub fn list_iter(&self, index: usize) -> Result<ListIter<T>> {
        check_position(index, self.len())?;
        Ok(ListIter::new(index, self.stamp()))
    }

    /// View over `[from, to)`.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_sequence::ArrayList;
    ///
    /// let mut list: ArrayList<char> = "abcde".chars().collect();
    /// let view = list.sub_list(1, 4).unwrap();
    /// view.remove(&mut list, 0).unwrap();
    /// assert_eq!(view.len(&list).unwrap(), 2);
    /// assert_eq!(list, ['a', 'c', 'd', 'e']);
    /// ```
    pub fn sub_list(&self, from: usize, to: usize) -> Result<SubList<T>> {
        check_range(from, to, self.len())?;
        Ok(SubList::over(self, from, to))
    }

    /// Splittable cursor over the whole list. Binds to the list's length and
    /// version on first use.
    pub fn splitter(&self) -> ArraySplitter<T> {
        ArraySplitter::new(self.owner)
    }
}

/// Copies `len` items into `dest` (reused if large enough).
pub(crate) fn copy_into<'a, T, I>(items: I, len: usize, mut dest: Vec<Option<T>>) -> Vec<Option<T>>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    if dest.len() < len {
        return items.map(|e| Some(e.clone())).collect();
    }
    for (slot, e) in dest.iter_mut().zip(items) {
        *slot = Some(e.clone());
    }
    if dest.len() > len {
        dest[len] = None;
    }
    dest
}

#[inline]
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// =============================================================================
// Compaction
// =============================================================================

/// Forward keep/drop scan over a buffer.
///
/// While alive the compactor owns every slot from its start position on.
/// Slots in `[write, read)` are vacant. Dropping it, normally or during an
/// unwind, shifts `[read, old_len)` down to `write`, so elements that were
/// never examined are kept.
struct Compactor<'a, T> {
    buf: &'a mut RawBuffer<T>,
    mods: Option<&'a mut ModCount>,
    base: *mut T,
    read: usize,
    write: usize,
    old_len: usize,
}

impl<'a, T> Compactor<'a, T> {
    fn new(buf: &'a mut RawBuffer<T>, mods: Option<&'a mut ModCount>, start: usize) -> Self {
        let old_len = buf.len();
        let base = buf.as_mut_ptr();
        // Safety: [0, start) stays initialized; the rest is tracked here
        unsafe { buf.set_len(start) };
        Self {
            buf,
            mods,
            base,
            read: start,
            write: start,
            old_len,
        }
    }

    /// # Safety
    ///
    /// `read < old_len`.
    #[inline]
    unsafe fn current(&self) -> &T {
        unsafe { &*self.base.add(self.read) }
    }

    #[inline]
    fn keep(&mut self) {
        debug_assert!(self.read < self.old_len);
        if self.read != self.write {
            // Safety: read is live, write is vacant, both below old_len
            unsafe { ptr::copy_nonoverlapping(self.base.add(self.read), self.base.add(self.write), 1) };
        }
        self.read += 1;
        self.write += 1;
    }

    #[inline]
    fn discard(&mut self) {
        debug_assert!(self.read < self.old_len);
        let slot = unsafe { self.base.add(self.read) };
        // Vacate before dropping so a panicking destructor is not run twice
        self.read += 1;
        // Safety: slot was live and is no longer tracked
        unsafe { ptr::drop_in_place(slot) };
    }
}

impl<T> Drop for Compactor<'_, T> {
    fn drop(&mut self) {
        let removed = self.read - self.write;
        // Safety: [0, write) and [read, old_len) are live, [write, read) is
        // vacant
        unsafe {
            self.buf.set_len(self.old_len);
            self.buf.close_gap(self.write, self.read);
        }
        if let Some(mods) = self.mods.as_deref_mut() {
            mods.bump_by(removed);
        }
    }
}

/// Bitset of positions marked for removal.
struct DeathRow {
    words: Vec<u64>,
}

impl DeathRow {
    fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    #[inline]
    fn set(&mut self, idx: usize) {
        self.words[idx / 64] |= 1 << (idx % 64);
    }

    #[inline]
    fn get(&self, idx: usize) -> bool {
        (self.words[idx / 64] & (1 << (idx % 64))) != 0
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T: Clone> Clone for ArrayList<T> {
    /// Copies the live elements into an exactly-sized buffer. The copy is a
    /// new list: fresh identity, version zero.
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.len());
        out.policy = self.policy;
        for e in self.iter() {
            out.buf.push(e.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash> Hash for ArrayList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, U> PartialEq<ArrayList<U>> for ArrayList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &ArrayList<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ArrayList<T> {}

impl<T, U> PartialEq<[U]> for ArrayList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for ArrayList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for ArrayList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<Vec<U>> for ArrayList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> Index<usize> for ArrayList<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for ArrayList<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T> Extend<T> for ArrayList<T> {
    /// # Panics
    ///
    /// Panics if the list would exceed its maximum length.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.add_all(iter) {
            panic!("{err}");
        }
    }
}

impl<'a, T: Clone + 'a> Extend<&'a T> for ArrayList<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> From<Vec<T>> for ArrayList<T> {
    fn from(items: Vec<T>) -> Self {
        let mut list = Self::with_capacity(items.len());
        list.buf.insert_many(0, items);
        list
    }
}

impl<T: Clone> From<&[T]> for ArrayList<T> {
    fn from(items: &[T]) -> Self {
        items.to_vec().into()
    }
}

impl<T> IntoIterator for ArrayList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.buf)
    }
}

impl<'a, T> IntoIterator for &'a ArrayList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ArrayList<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq> Contains<T> for ArrayList<T> {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        ArrayList::contains(self, item)
    }
}

impl<T> Sequence<T> for ArrayList<T> {
    fn len(&self) -> usize {
        ArrayList::len(self)
    }

    fn get(&self, index: usize) -> Result<&T> {
        ArrayList::get(self, index)
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        ArrayList::get_mut(self, index)
    }

    fn set(&mut self, index: usize, value: T) -> Result<T> {
        ArrayList::set(self, index, value)
    }

    fn add(&mut self, value: T) -> Result<()> {
        self.push(value)
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        ArrayList::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Result<T> {
        ArrayList::remove(self, index)
    }

    fn clear(&mut self) {
        ArrayList::clear(self)
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        ArrayList::for_each(self, f)
    }

    fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        ArrayList::index_of(self, item)
    }

    fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        ArrayList::last_index_of(self, item)
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        ArrayList::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    fn list_of(n: u32) -> ArrayList<u32> {
        (0..n).collect()
    }

    #[test]
    fn new_list_is_empty() {
        let list: ArrayList<u32> = ArrayList::new();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), 0);
        assert_eq!(list.first(), None);
        assert_eq!(list.version(), 0);
    }

    #[test]
    fn push_and_get() {
        let mut list = ArrayList::new();
        list.push(10).unwrap();
        list.push(20).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.capacity(), 10);
        assert_eq!(list.get(1), Ok(&20));
        assert_eq!(
            list.get(2),
            Err(CollectionError::OutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn growth_follows_policy() {
        let mut list = ArrayList::new();
        for i in 0..11 {
            list.push(i).unwrap();
        }
        assert_eq!(list.capacity(), 15);
        assert_eq!(list.reallocations(), 2);

        // Bulk adds reserve for the whole batch
        let bulk = list_of(11);
        assert_eq!(bulk.capacity(), 11);
    }

    #[test]
    fn insert_bounds() {
        let mut list = list_of(3);
        list.insert(3, 30).unwrap();
        list.insert(0, 40).unwrap();
        assert_eq!(list, [40, 0, 1, 2, 30]);
        assert_eq!(
            list.insert(6, 0),
            Err(CollectionError::OutOfBounds { index: 6, len: 5 })
        );
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn set_is_not_structural() {
        let mut list = list_of(3);
        let version = list.version();
        assert_eq!(list.set(1, 7), Ok(1));
        assert_eq!(list.version(), version);
        assert_eq!(list, [0, 7, 2]);
    }

    #[test]
    fn remove_shifts() {
        let mut list = list_of(5);
        assert_eq!(list.remove(0), Ok(0));
        assert_eq!(list.remove(3), Ok(4));
        assert_eq!(list, [1, 2, 3]);
        assert!(list.remove(3).is_err());
    }

    #[test]
    fn remove_item_first_match() {
        let mut list: ArrayList<u32> = vec![1, 2, 1, 2].into();
        assert!(list.remove_item(&2));
        assert_eq!(list, [1, 1, 2]);
        assert!(!list.remove_item(&9));
    }

    #[test]
    fn remove_range_checks() {
        let mut list = list_of(6);
        assert_eq!(
            list.remove_range(4, 2),
            Err(CollectionError::InvalidRange { from: 4, to: 2 })
        );
        assert_eq!(
            list.remove_range(2, 7),
            Err(CollectionError::OutOfBounds { index: 7, len: 6 })
        );
        list.remove_range(1, 4).unwrap();
        assert_eq!(list, [0, 4, 5]);
    }

    #[test]
    fn add_all_and_insert_all() {
        let mut list = list_of(2);
        assert!(list.add_all([5, 6]).unwrap());
        assert!(!list.add_all(core::iter::empty()).unwrap());
        assert!(list.insert_all(1, vec![8, 9]).unwrap());
        assert_eq!(list, [0, 8, 9, 1, 5, 6]);
        assert!(!list.insert_all(6, Vec::new()).unwrap());
        assert!(list.insert_all(7, vec![1]).is_err());
    }

    #[test]
    fn empty_bulk_insert_keeps_handles_live() {
        let mut list = list_of(3);
        let version = list.version();
        let mut it = list.list_iter(0).unwrap();
        let view = list.sub_list(0, 2).unwrap();

        assert_eq!(list.insert_all(1, Vec::new()), Ok(false));
        assert_eq!(list.add_all(core::iter::empty()), Ok(false));
        assert_eq!(list.version(), version);
        assert_eq!(it.next(&list), Ok(Some(&0)));
        assert_eq!(view.len(&list), Ok(2));

        assert_eq!(list.insert_all(3, [7]), Ok(true));
        assert_eq!(list.version(), version + 1);
        assert!(it.next(&list).unwrap_err().is_concurrent_modification());
    }

    #[test]
    fn slice_writes_are_not_structural() {
        let mut list = list_of(4);
        let mut it = list.list_iter(0).unwrap();
        list.as_mut_slice().reverse();
        assert_eq!(it.next(&list), Ok(Some(&3)));

        list.sort();
        assert!(it.next(&list).unwrap_err().is_concurrent_modification());
    }

    #[test]
    fn remove_all_and_retain_all() {
        let mut list = list_of(10);
        let evens: HashSet<u32> = (0..10).filter(|v| v % 2 == 0).collect();

        let version = list.version();
        assert!(list.remove_all(&evens));
        assert_eq!(list, [1, 3, 5, 7, 9]);
        // One bump per removed element
        assert_eq!(list.version(), version + 5);

        assert!(list.retain_all(&[3u32, 7][..]));
        assert_eq!(list, [3, 7]);
        assert!(!list.retain_all(&[3u32, 7][..]));
    }

    #[test]
    fn batch_remove_restores_tail_on_error() {
        let mut list = list_of(8);
        let result: Result<bool> = list.try_batch_remove(1, 7, false, |&e| {
            if e == 5 {
                Err(CollectionError::InvalidArgument("boom"))
            } else {
                Ok(e % 2 == 0)
            }
        });
        assert_eq!(result, Err(CollectionError::InvalidArgument("boom")));
        // 2 and 4 removed; 5, 6, 7 never lost
        assert_eq!(list, [0, 1, 3, 5, 6, 7]);
    }

    #[test]
    fn batch_remove_restores_tail_on_panic() {
        let mut list = list_of(8);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _ = list.try_batch_remove::<CollectionError, _>(0, 8, true, |&e| {
                assert!(e != 6, "predicate failure");
                Ok(e % 3 != 0)
            });
        }));
        assert!(result.is_err());
        assert_eq!(list, [1, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn batch_remove_range_checked() {
        let mut list = list_of(3);
        let result: Result<bool> = list.try_batch_remove(2, 1, false, |_| Ok(true));
        assert_eq!(result, Err(CollectionError::InvalidRange { from: 2, to: 1 }));
    }

    #[test]
    fn remove_if_bumps_once() {
        let mut list = list_of(10);
        let version = list.version();
        assert!(list.remove_if(|&e| e % 3 == 0));
        assert_eq!(list, [1, 2, 4, 5, 7, 8]);
        assert_eq!(list.version(), version + 1);
        assert!(!list.remove_if(|&e| e > 100));
        assert_eq!(list.version(), version + 1);
    }

    #[test]
    fn remove_if_panic_leaves_list_untouched() {
        let mut list = list_of(6);
        let result = catch_unwind(AssertUnwindSafe(|| {
            list.remove_if(|&e| {
                assert!(e != 4, "predicate failure");
                e % 2 == 1
            })
        }));
        assert!(result.is_err());
        assert_eq!(list, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn retain_keeps_matches() {
        let mut list = list_of(6);
        list.retain(|&e| e >= 3);
        assert_eq!(list, [3, 4, 5]);
    }

    #[test]
    fn removal_drops_exactly_once() {
        let tracker = Rc::new(());
        let mut list: ArrayList<Rc<()>> = (0..6).map(|_| Rc::clone(&tracker)).collect();
        let counter = Cell::new(0);
        list.remove_if(|_| {
            counter.set(counter.get() + 1);
            counter.get() % 2 == 0
        });
        assert_eq!(list.len(), 3);
        assert_eq!(Rc::strong_count(&tracker), 4);
        drop(list);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn replace_all_and_sort_are_structural() {
        let mut list: ArrayList<u32> = vec![3, 1, 2].into();
        let version = list.version();
        list.replace_all(|e| *e *= 10);
        assert_eq!(list, [30, 10, 20]);
        list.sort();
        assert_eq!(list, [10, 20, 30]);
        list.sort();
        assert_eq!(list.version(), version + 3);
    }

    #[test]
    fn sort_is_stable() {
        let mut list: ArrayList<(u32, char)> = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')].into();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(list, [(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }

    #[test]
    fn ensure_capacity_and_trim() {
        let mut list: ArrayList<u32> = ArrayList::new();
        list.ensure_capacity(5).unwrap();
        assert_eq!(list.capacity(), 0);
        assert_eq!(list.version(), 0);

        list.ensure_capacity(40).unwrap();
        assert_eq!(list.capacity(), 40);
        assert_eq!(list.version(), 1);

        list.push(1).unwrap();
        list.trim_to_size().unwrap();
        assert_eq!(list.capacity(), 1);
        list.trim_to_size().unwrap();
        assert_eq!(list.capacity(), 1);
        assert_eq!(list, [1]);
    }

    #[test]
    fn try_with_capacity_rejects_huge() {
        assert!(matches!(
            ArrayList::<u8>::try_with_capacity(usize::MAX),
            Err(CollectionError::InvalidArgument(_))
        ));
        let list = ArrayList::<u8>::try_with_capacity(0).unwrap();
        assert_eq!(list.capacity(), 0);
    }

    #[test]
    fn search() {
        let list: ArrayList<u32> = vec![1, 2, 3, 2, 1].into();
        assert_eq!(list.index_of(&2), Some(1));
        assert_eq!(list.last_index_of(&2), Some(3));
        assert_eq!(list.index_of(&9), None);
        assert!(list.contains(&3));
    }

    #[test]
    fn to_array_in_reuses_or_allocates() {
        let list = list_of(3);
        let small = list.to_array_in(vec![None; 1]);
        assert_eq!(small, [Some(0), Some(1), Some(2)]);

        let exact = list.to_array_in(vec![Some(9); 3]);
        assert_eq!(exact, [Some(0), Some(1), Some(2)]);

        let large = list.to_array_in(vec![Some(9); 5]);
        assert_eq!(large, [Some(0), Some(1), Some(2), None, Some(9)]);
    }

    #[test]
    fn clone_is_fresh() {
        let mut list = list_of(4);
        list.push(4).unwrap();
        let copy = list.clone();
        assert_eq!(copy, list);
        assert_eq!(copy.version(), 0);
        assert_eq!(copy.capacity(), 5);
        assert_ne!(copy.owner(), list.owner());
    }

    #[test]
    fn hash_code_matches_ordered_hash() {
        let list: ArrayList<i32> = vec![1, 2, 3].into();
        assert_eq!(list.hash_code(), 30817);
        assert_eq!(ArrayList::<i32>::new().hash_code(), 1);
    }

    #[test]
    fn from_sequence_copies() {
        let source = list_of(4);
        let copy = ArrayList::from_sequence(&source).unwrap();
        assert_eq!(copy, source);
        assert_eq!(copy.capacity(), 4);
    }

    #[test]
    fn zero_sized_elements() {
        let mut list = ArrayList::new();
        for _ in 0..100 {
            list.push(()).unwrap();
        }
        list.remove_range(10, 90).unwrap();
        assert_eq!(list.len(), 20);
        assert!(list.remove_if(|_| true));
        assert!(list.is_empty());
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
    fn bench_push_pop_back() {
        let mut list: ArrayList<u64> = ArrayList::with_capacity(16);
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for i in 0..WARMUP {
            let _ = list.push(i as u64);
            let _ = list.remove(list.len() - 1);
        }

        for i in 0..ITERATIONS {
            let start = rdtscp();
            let _ = list.push(i as u64);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            let _ = list.remove(list.len() - 1);
        }

        print_histogram("push", &hist);
    }

    #[test]
    #[ignore]
    fn bench_insert_front_of_1k() {
        let mut list: ArrayList<u64> = (0..1024).collect();
        list.ensure_capacity(2048).unwrap();
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for i in 0..WARMUP {
            let _ = list.insert(0, i as u64);
            let _ = list.remove(0);
        }

        for i in 0..ITERATIONS {
            let start = rdtscp();
            let _ = list.insert(0, i as u64);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            let _ = list.remove(0);
        }

        print_histogram("insert(0) len=1024", &hist);
    }

    #[test]
    #[ignore]
    fn bench_list_iter_step() {
        let list: ArrayList<u64> = (0..ITERATIONS as u64).collect();
        let mut it = list.list_iter(0).unwrap();
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for _ in 0..ITERATIONS {
            let start = rdtscp();
            let v = it.next(&list);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            core::hint::black_box(v.ok());
        }

        print_histogram("list_iter next", &hist);
    }
}
