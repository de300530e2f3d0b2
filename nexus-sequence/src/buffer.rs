//! Growable contiguous storage.
//!
//! [`RawBuffer`] owns a single heap allocation holding `capacity` slots of
//! which the first `len` are initialized. It performs the shift-based moves
//! that positional insertion and removal need, and reallocates according to a
//! [`GrowthPolicy`]. It knows nothing about modification tracking; the owning
//! list bumps its version around every call that changes the layout.
//!
//! ```text
//! [ live | live | live | uninit | uninit ]
//!   0      1      2      3        4
//!   |<----- len ----->|
//!   |<------------- capacity ------------>|
//! ```

use core::mem::{self, ManuallyDrop};
use core::ptr::{self, NonNull};
use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::marker::PhantomData;

use crate::config::GrowthPolicy;
use crate::error::{CollectionError, Result};

/// Contiguous storage with explicit capacity management.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    len: usize,
    /// Untouched storage of a default-constructed list. The first growth of
    /// such a buffer jumps to the policy's default capacity.
    lazy_default: bool,
    reallocations: usize,
    _marker: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Empty buffer that will grow to the default capacity on first use.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            len: 0,
            lazy_default: true,
            reallocations: 0,
            _marker: PhantomData,
        }
    }

    /// Buffer with exactly `capacity` slots.
    ///
    /// A zero capacity grows exactly to what is required, not to the default.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buf = Self::new();
        buf.lazy_default = false;
        if capacity > 0 {
            buf.reallocate(capacity)?;
            buf.reallocations = 0;
        }
        Ok(buf)
    }

    /// Number of initialized slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is initialized.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots available without reallocating.
    #[inline]
    pub const fn capacity(&self) -> usize {
        if Self::IS_ZST { usize::MAX } else { self.capacity }
    }

    /// Returns `true` while a default-constructed buffer has never allocated.
    #[inline]
    pub const fn is_lazy_default(&self) -> bool {
        self.lazy_default
    }

    /// Number of times the backing allocation has been replaced.
    #[inline]
    pub const fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Pointer to the first slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// The initialized slots.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // Safety: [0, len) is initialized
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The initialized slots, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safety: [0, len) is initialized and uniquely borrowed
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Sets the initialized length.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and slots `[0, len)` must be initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.len = len;
    }

    /// Ensures room for at least `required` elements.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn grow(&mut self, required: usize, policy: &GrowthPolicy) -> Result<bool> {
        if required <= self.capacity() {
            return Ok(false);
        }
        let new_capacity = policy.new_capacity(self.capacity, required, self.lazy_default)?;
        self.reallocate(new_capacity)?;
        tracing::debug!(
            from = self.len,
            capacity = new_capacity,
            reallocations = self.reallocations,
            "buffer grown"
        );
        Ok(true)
    }

    /// Shrinks the allocation to exactly `len` slots.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn trim(&mut self) -> Result<bool> {
        if Self::IS_ZST || self.len >= self.capacity {
            return Ok(false);
        }
        self.reallocate(self.len)?;
        tracing::debug!(capacity = self.len, "buffer trimmed");
        Ok(true)
    }

    /// Appends without growing.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full.
    #[inline]
    pub fn push(&mut self, value: T) {
        assert!(self.len < self.capacity(), "push into a full buffer");
        // Safety: slot `len` is within capacity and uninitialized
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Shifts `[index, len)` one slot right and writes `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full or `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        assert!(self.len < self.capacity(), "insert into a full buffer");
        assert!(index <= self.len, "insert position past the end");
        // Safety: index <= len < capacity, the shifted range stays in bounds
        unsafe {
            let p = self.as_mut_ptr().add(index);
            if index < self.len {
                ptr::copy(p, p.add(1), self.len - index);
            }
            p.write(value);
        }
        self.len += 1;
    }

    /// Moves every element of `items` in at `index` with a single tail shift.
    ///
    /// # Panics
    ///
    /// Panics if there is not enough spare capacity or `index > len`.
    pub fn insert_many(&mut self, index: usize, mut items: Vec<T>) {
        let count = items.len();
        assert!(count <= self.capacity() - self.len, "insert_many beyond capacity");
        assert!(index <= self.len, "insert position past the end");
        // Safety: the shifted tail and the copied-in run both stay within
        // capacity; `items` gives up ownership before it is dropped
        unsafe {
            let p = self.as_mut_ptr().add(index);
            ptr::copy(p, p.add(count), self.len - index);
            ptr::copy_nonoverlapping(items.as_ptr(), p, count);
            items.set_len(0);
        }
        self.len += count;
    }

    /// Removes the element at `index`, shifting `[index + 1, len)` left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "remove index out of bounds");
        // Safety: index < len; the value is read out before its slot is
        // overwritten, and the trailing slot becomes uninitialized
        unsafe {
            let p = self.as_mut_ptr().add(index);
            let value = p.read();
            ptr::copy(p.add(1), p, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drops `[from, to)` and shifts the tail over the gap in one move.
    ///
    /// # Panics
    ///
    /// Panics if `from > to` or `to > len`.
    pub fn remove_range(&mut self, from: usize, to: usize) {
        assert!(from <= to && to <= self.len, "invalid removal range");
        if from == to {
            return;
        }
        let old_len = self.len;
        // A panicking destructor leaks the tail rather than double-dropping it.
        self.len = from;
        // Safety: [from, to) is initialized and no longer reachable through len
        unsafe {
            let gap = self.as_mut_ptr().add(from);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(gap, to - from));
            ptr::copy(self.as_ptr().add(to), gap, old_len - to);
        }
        self.len = old_len - (to - from);
    }

    /// Moves the live tail `[src, len)` down to start at `dst`.
    ///
    /// Slots `[dst, src)` must already be vacated (moved out or dropped).
    ///
    /// # Safety
    ///
    /// `dst <= src <= len`, and `[dst, src)` holds no live values.
    pub(crate) unsafe fn close_gap(&mut self, dst: usize, src: usize) {
        debug_assert!(dst <= src && src <= self.len);
        unsafe {
            ptr::copy(self.as_ptr().add(src), self.as_mut_ptr().add(dst), self.len - src);
        }
        self.len -= src - dst;
    }

    /// Drops every element past `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        self.len = len;
        // Safety: [len, len + tail) was initialized and is now unreachable
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), tail));
        }
    }

    /// Drops all elements, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Consumes the buffer, returning its parts without dropping elements.
    pub(crate) fn into_raw_parts(self) -> (NonNull<T>, usize, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr, this.len, this.capacity)
    }

    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.len);
        self.lazy_default = false;

        if Self::IS_ZST {
            return Ok(());
        }

        let new_ptr = if new_capacity == 0 {
            NonNull::dangling()
        } else {
            let layout = array_layout::<T>(new_capacity)?;
            // Safety: layout has non-zero size
            let raw = unsafe { alloc(layout) } as *mut T;
            let Some(new_ptr) = NonNull::new(raw) else {
                handle_alloc_error(layout);
            };
            // Safety: both regions are valid for len elements and disjoint
            unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len) };
            new_ptr
        };

        self.release();
        self.ptr = new_ptr;
        self.capacity = new_capacity;
        self.reallocations += 1;
        Ok(())
    }

    /// Frees the allocation without touching elements.
    fn release(&mut self) {
        if Self::IS_ZST || self.capacity == 0 {
            return;
        }
        // Layout was valid when the allocation was made
        if let Ok(layout) = array_layout::<T>(self.capacity) {
            // Safety: ptr was allocated with this layout
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) };
        }
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.clear();
        self.release();
    }
}

// Safety: RawBuffer owns its elements exclusively
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

/// Frees a buffer previously split by [`RawBuffer::into_raw_parts`].
///
/// # Safety
///
/// `ptr` and `capacity` must come from `into_raw_parts`, and every element
/// must already have been moved out or dropped.
pub(crate) unsafe fn dealloc_parts<T>(ptr: NonNull<T>, capacity: usize) {
    if mem::size_of::<T>() == 0 || capacity == 0 {
        return;
    }
    if let Ok(layout) = array_layout::<T>(capacity) {
        unsafe { dealloc(ptr.as_ptr() as *mut u8, layout) };
    }
}

#[inline]
fn array_layout<T>(capacity: usize) -> Result<Layout> {
    Layout::array::<T>(capacity).map_err(|_| CollectionError::CapacityExhausted {
        requested: capacity,
        max: isize::MAX as usize / mem::size_of::<T>().max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: u64) -> RawBuffer<u64> {
        let policy = GrowthPolicy::default();
        let mut buf = RawBuffer::new();
        for i in 0..n {
            buf.grow(buf.len() + 1, &policy).unwrap();
            buf.push(i);
        }
        buf
    }

    #[test]
    fn default_buffer_grows_to_ten() {
        let mut buf: RawBuffer<u64> = RawBuffer::new();
        assert_eq!(buf.capacity(), 0);

        assert!(buf.grow(1, &GrowthPolicy::default()).unwrap());
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.reallocations(), 1);
    }

    #[test]
    fn growth_sequence() {
        let buf = filled(23);
        // 10 -> 15 -> 22 -> 33
        assert_eq!(buf.capacity(), 33);
        assert_eq!(buf.reallocations(), 4);
        assert_eq!(buf.as_slice(), (0..23).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn insert_shifts_right() {
        let mut buf = filled(4);
        buf.insert(1, 99);
        assert_eq!(buf.as_slice(), &[0, 99, 1, 2, 3]);
        buf.insert(5, 100);
        assert_eq!(buf.as_slice(), &[0, 99, 1, 2, 3, 100]);
    }

    #[test]
    fn insert_many_shifts_once() {
        let mut buf = filled(4);
        buf.grow(7, &GrowthPolicy::default()).unwrap();
        buf.insert_many(2, vec![20, 21, 22]);
        assert_eq!(buf.as_slice(), &[0, 1, 20, 21, 22, 2, 3]);
        buf.insert_many(7, Vec::new());
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn remove_shifts_left() {
        let mut buf = filled(5);
        assert_eq!(buf.remove(0), 0);
        assert_eq!(buf.remove(3), 4);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn remove_range_closes_gap() {
        let mut buf = filled(8);
        buf.remove_range(2, 5);
        assert_eq!(buf.as_slice(), &[0, 1, 5, 6, 7]);
        buf.remove_range(3, 3);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn trim_to_len() {
        let mut buf = filled(3);
        assert!(buf.trim().unwrap());
        assert_eq!(buf.capacity(), 3);
        assert!(!buf.trim().unwrap());
        assert_eq!(buf.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn explicit_capacity_is_exact() {
        let buf: RawBuffer<u64> = RawBuffer::with_capacity(7).unwrap();
        assert_eq!(buf.capacity(), 7);
        assert_eq!(buf.reallocations(), 0);

        let mut empty: RawBuffer<u64> = RawBuffer::with_capacity(0).unwrap();
        empty.grow(1, &GrowthPolicy::default()).unwrap();
        assert_eq!(empty.capacity(), 1);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let mut buf: RawBuffer<()> = RawBuffer::new();
        assert!(!buf.grow(1000, &GrowthPolicy::default()).unwrap());
        for _ in 0..1000 {
            buf.push(());
        }
        assert_eq!(buf.len(), 1000);
        buf.remove_range(0, 500);
        assert_eq!(buf.len(), 500);
    }

    #[test]
    fn drops_live_elements_only() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        {
            let mut buf = RawBuffer::new();
            buf.grow(4, &GrowthPolicy::default()).unwrap();
            for _ in 0..4 {
                buf.push(Rc::clone(&tracker));
            }
            drop(buf.remove(0));
            buf.remove_range(0, 2);
            assert_eq!(Rc::strong_count(&tracker), 2);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }
}
