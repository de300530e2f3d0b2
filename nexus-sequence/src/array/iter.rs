//! Owning iterator and detached list cursor for [`ArrayList`].

use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use super::ArrayList;
use crate::buffer::{RawBuffer, dealloc_parts};
use crate::error::{CollectionError, Result};
use crate::tracking::Stamp;

// =============================================================================
// IntoIter
// =============================================================================

/// Owning iterator returned by [`ArrayList::into_iter`].
pub struct IntoIter<T> {
    ptr: NonNull<T>,
    capacity: usize,
    front: usize,
    back: usize,
    _marker: PhantomData<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(buf: RawBuffer<T>) -> Self {
        let (ptr, len, capacity) = buf.into_raw_parts();
        Self {
            ptr,
            capacity,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }

    /// Elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // Safety: [front, back) is initialized and not yet moved out
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr().add(self.front), self.back - self.front) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // Safety: front < back, slot is live and read exactly once
        let value = unsafe { self.ptr.as_ptr().add(self.front).read() };
        self.front += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // Safety: back was live and is read exactly once
        Some(unsafe { self.ptr.as_ptr().add(self.back).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.back - self.front;
        // Safety: the unread slots are live; the allocation came from
        // `RawBuffer::into_raw_parts`
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(self.front), remaining));
            dealloc_parts(self.ptr, self.capacity);
        }
    }
}

// Safety: IntoIter owns its remaining elements exclusively
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

// =============================================================================
// ListIter
// =============================================================================

/// Fail-fast bidirectional cursor over an [`ArrayList`].
///
/// The cursor sits between elements. It holds no borrow: each call takes
/// the list, checks that it is the list the cursor was created from and that
/// no structural change happened since, then acts. Changes made through the
/// cursor's own [`remove`](Self::remove) and [`add`](Self::add) keep it
/// valid.
///
/// ```text
///   a   b   c
/// ^   ^   ^   ^
/// 0   1   2   3     cursor positions
/// ```
#[derive(Clone, Debug)]
pub struct ListIter<T> {
    cursor: usize,
    last_ret: Option<usize>,
    stamp: Stamp,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ListIter<T> {
    pub(super) fn new(cursor: usize, stamp: Stamp) -> Self {
        Self {
            cursor,
            last_ret: None,
            stamp,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if an element follows the cursor.
    #[inline]
    pub fn has_next(&self, list: &ArrayList<T>) -> bool {
        self.cursor != list.len()
    }

    /// Returns `true` if an element precedes the cursor.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.cursor != 0
    }

    /// Index of the element a call to `next` would return.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.cursor
    }

    /// Index of the element a call to `previous` would return.
    #[inline]
    pub fn previous_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Advances past the next element and returns it.
    pub fn next<'a>(&mut self, list: &'a ArrayList<T>) -> Result<Option<&'a T>> {
        list.validate(&self.stamp)?;
        let i = self.cursor;
        let Some(value) = list.as_slice().get(i) else {
            return Ok(None);
        };
        self.cursor = i + 1;
        self.last_ret = Some(i);
        Ok(Some(value))
    }

    /// Steps back over the previous element and returns it.
    pub fn previous<'a>(&mut self, list: &'a ArrayList<T>) -> Result<Option<&'a T>> {
        list.validate(&self.stamp)?;
        let Some(i) = self.cursor.checked_sub(1) else {
            return Ok(None);
        };
        let value = list.get(i)?;
        self.cursor = i;
        self.last_ret = Some(i);
        Ok(Some(value))
    }

    /// Removes the element last returned by `next` or `previous`.
    ///
    /// Fails with [`CollectionError::IllegalState`] if there is none, or if
    /// it was already removed or `add` was called since.
    pub fn remove(&mut self, list: &mut ArrayList<T>) -> Result<T> {
        let last = self.last_ret.ok_or(CollectionError::IllegalState)?;
        list.validate(&self.stamp)?;
        let value = list.remove(last)?;
        self.cursor = last;
        self.last_ret = None;
        self.stamp.refresh(list.mods);
        Ok(value)
    }

    /// Replaces the element last returned by `next` or `previous`.
    pub fn set(&mut self, list: &mut ArrayList<T>, value: T) -> Result<T> {
        let last = self.last_ret.ok_or(CollectionError::IllegalState)?;
        list.validate(&self.stamp)?;
        list.set(last, value)
    }

    /// Inserts `value` before the cursor; a following `next` is unaffected.
    pub fn add(&mut self, list: &mut ArrayList<T>, value: T) -> Result<()> {
        list.validate(&self.stamp)?;
        list.insert(self.cursor, value)?;
        self.cursor += 1;
        self.last_ret = None;
        self.stamp.refresh(list.mods);
        Ok(())
    }

    /// Visits every element after the cursor, leaving the cursor at the end.
    pub fn for_each_remaining<F>(&mut self, list: &ArrayList<T>, mut f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        list.validate(&self.stamp)?;
        let len = list.len();
        if self.cursor >= len {
            return Ok(());
        }
        for e in &list.as_slice()[self.cursor..] {
            f(e);
        }
        self.cursor = len;
        self.last_ret = Some(len - 1);
        Ok(())
    }
}
