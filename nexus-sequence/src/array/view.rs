//! Range views over an [`ArrayList`].
//!
//! A [`SubList`] owns no storage. It records where its window starts in the
//! root list, how many elements it spans, and the root version at which that
//! record was last known to be right. Views can be carved out of views; each
//! keeps a link to its parent so that a change made through a child can be
//! pushed up the chain.
//!
//! ```text
//! root   [ a  b  c  d  e  f  g ]
//! outer        [ c  d  e  f ]        offset 2, size 4
//! inner           [ d  e ]           offset 3, size 2, parent = outer
//!
//! inner.remove(0)  ->  root and outer shrink by one; both stay valid
//!                      any other view over root is now stale
//! ```

use core::cell::Cell;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use std::rc::Rc;

use super::{ArrayList, ArraySplitter, copy_into};
use crate::error::{CollectionError, Result, check_index, check_position, check_range};
use crate::hash::{ValueHash, hash_ordered};
use crate::tracking::OwnerId;
use crate::traits::Contains;

struct ViewFrame {
    owner: OwnerId,
    offset: usize,
    size: Cell<usize>,
    version: Cell<u64>,
    parent: Option<Rc<ViewFrame>>,
}

/// Window `[offset, offset + size)` over an [`ArrayList`].
///
/// Every operation takes the root list and fails with
/// [`CollectionError::ConcurrentModification`] if the root was structurally
/// changed other than through this view (or one of its descendants).
/// Cloning a `SubList` yields another handle to the same view.
///
/// # Example
///
/// ```
/// use nexus_sequence::ArrayList;
///
/// let mut list: ArrayList<u32> = (0..8).collect();
/// let outer = list.sub_list(2, 7).unwrap();
/// let inner = outer.sub_list(1, 3).unwrap();
///
/// inner.insert(&mut list, 0, 99).unwrap();
/// assert_eq!(outer.len(&list).unwrap(), 6);
/// assert_eq!(inner.to_vec(&list).unwrap(), [99, 3, 4]);
/// assert_eq!(list, [0, 1, 2, 99, 3, 4, 5, 6, 7]);
/// ```
pub struct SubList<T> {
    frame: Rc<ViewFrame>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SubList<T> {
    fn clone(&self) -> Self {
        Self {
            frame: Rc::clone(&self.frame),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SubList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubList")
            .field("offset", &self.frame.offset)
            .field("size", &self.frame.size.get())
            .field("version", &self.frame.version.get())
            .finish()
    }
}

impl<T> SubList<T> {
    pub(super) fn over(root: &ArrayList<T>, from: usize, to: usize) -> Self {
        Self::from_frame(ViewFrame {
            owner: root.owner(),
            offset: from,
            size: Cell::new(to - from),
            version: Cell::new(root.version()),
            parent: None,
        })
    }

    fn from_frame(frame: ViewFrame) -> Self {
        Self {
            frame: Rc::new(frame),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn offset(&self) -> usize {
        self.frame.offset
    }

    #[inline]
    fn size(&self) -> usize {
        self.frame.size.get()
    }

    #[inline]
    fn end(&self) -> usize {
        self.offset() + self.size()
    }

    /// Root version this view last observed.
    #[inline]
    pub fn version(&self) -> u64 {
        self.frame.version.get()
    }

    fn validate(&self, root: &ArrayList<T>) -> Result<()> {
        if self.frame.owner != root.owner() {
            return Err(CollectionError::ForeignContainer);
        }
        root.mods.check(self.version())
    }

    /// Applies a size change made through this view to it and every
    /// ancestor, and records the root's new version at each level.
    fn propagate(&self, root: &ArrayList<T>, delta: isize) {
        let version = root.version();
        let mut frame = Some(&self.frame);
        while let Some(f) = frame {
            f.size.set(f.size.get().wrapping_add_signed(delta));
            f.version.set(version);
            frame = f.parent.as_ref();
        }
    }

    /// The view's root-range as a slice.
    fn window<'a>(&self, root: &'a ArrayList<T>) -> Result<&'a [T]> {
        self.validate(root)?;
        Ok(&root.as_slice()[self.offset()..self.end()])
    }

    // =========================================================================
    // Size and access
    // =========================================================================

    /// Number of elements in the view.
    pub fn len(&self, root: &ArrayList<T>) -> Result<usize> {
        self.validate(root)?;
        Ok(self.size())
    }

    /// Returns `true` if the view is empty.
    pub fn is_empty(&self, root: &ArrayList<T>) -> Result<bool> {
        Ok(self.len(root)? == 0)
    }

    /// Element at `index` within the view.
    pub fn get<'a>(&self, root: &'a ArrayList<T>, index: usize) -> Result<&'a T> {
        check_index(index, self.size())?;
        self.validate(root)?;
        Ok(&root.as_slice()[self.offset() + index])
    }

    /// Mutable element at `index` within the view.
    pub fn get_mut<'a>(&self, root: &'a mut ArrayList<T>, index: usize) -> Result<&'a mut T> {
        check_index(index, self.size())?;
        self.validate(root)?;
        Ok(&mut root.as_mut_slice()[self.offset() + index])
    }

    /// Replaces the element at `index`. Not structural.
    pub fn set(&self, root: &mut ArrayList<T>, index: usize, value: T) -> Result<T> {
        let slot = self.get_mut(root, index)?;
        Ok(core::mem::replace(slot, value))
    }

    /// The view's elements as a slice.
    pub fn as_slice<'a>(&self, root: &'a ArrayList<T>) -> Result<&'a [T]> {
        self.window(root)
    }

    /// Snapshot of the view's elements.
    pub fn to_vec(&self, root: &ArrayList<T>) -> Result<Vec<T>>
    where
        T: Clone,
    {
        Ok(self.window(root)?.to_vec())
    }

    /// See [`ArrayList::to_array_in`].
    pub fn to_array_in(&self, root: &ArrayList<T>, dest: Vec<Option<T>>) -> Result<Vec<Option<T>>>
    where
        T: Clone,
    {
        let window = self.window(root)?;
        Ok(copy_into(window.iter(), window.len(), dest))
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Appends `value` at the end of the view.
    pub fn add(&self, root: &mut ArrayList<T>, value: T) -> Result<()> {
        self.insert(root, self.size(), value)
    }

    /// Inserts `value` at `index` within the view.
    pub fn insert(&self, root: &mut ArrayList<T>, index: usize, value: T) -> Result<()> {
        check_position(index, self.size())?;
        self.validate(root)?;
        root.insert(self.offset() + index, value)?;
        self.propagate(root, 1);
        Ok(())
    }

    /// Removes and returns the element at `index` within the view.
    pub fn remove(&self, root: &mut ArrayList<T>, index: usize) -> Result<T> {
        check_index(index, self.size())?;
        self.validate(root)?;
        let value = root.remove(self.offset() + index)?;
        self.propagate(root, -1);
        Ok(value)
    }

    /// Removes `[from, to)` within the view.
    pub fn remove_range(&self, root: &mut ArrayList<T>, from: usize, to: usize) -> Result<()> {
        check_range(from, to, self.size())?;
        self.validate(root)?;
        root.remove_range(self.offset() + from, self.offset() + to)?;
        self.propagate(root, from as isize - to as isize);
        Ok(())
    }

    /// Removes every element of the view.
    pub fn clear(&self, root: &mut ArrayList<T>) -> Result<()> {
        self.remove_range(root, 0, self.size())
    }

    /// Appends every item at the end of the view.
    pub fn add_all<I>(&self, root: &mut ArrayList<T>, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_all(root, self.size(), items)
    }

    /// Inserts every item at `index` within the view.
    pub fn insert_all<I>(&self, root: &mut ArrayList<T>, index: usize, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        check_position(index, self.size())?;
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Ok(false);
        }
        self.validate(root)?;
        let count = items.len();
        root.insert_all(self.offset() + index, items)?;
        self.propagate(root, count as isize);
        Ok(true)
    }

    /// Removes every element of the view that `c` contains.
    pub fn remove_all<C>(&self, root: &mut ArrayList<T>, c: &C) -> Result<bool>
    where
        C: Contains<T> + ?Sized,
    {
        self.batch_remove(root, c, false)
    }

    /// Keeps only the elements of the view that `c` contains.
    pub fn retain_all<C>(&self, root: &mut ArrayList<T>, c: &C) -> Result<bool>
    where
        C: Contains<T> + ?Sized,
    {
        self.batch_remove(root, c, true)
    }

    fn batch_remove<C>(&self, root: &mut ArrayList<T>, c: &C, complement: bool) -> Result<bool>
    where
        C: Contains<T> + ?Sized,
    {
        self.validate(root)?;
        let old_len = root.len();
        let modified = super::infallible(root.batch_remove_range(
            self.offset(),
            self.end(),
            complement,
            |e| Ok(c.contains(e)),
        ));
        if modified {
            self.propagate(root, root.len() as isize - old_len as isize);
        }
        Ok(modified)
    }

    /// Fallible batch removal over `[from, to)` of the view. See
    /// [`ArrayList::try_batch_remove`].
    ///
    /// The view's size is updated for whatever was removed, including when
    /// `membership` fails part way.
    pub fn try_batch_remove<E, F>(
        &self,
        root: &mut ArrayList<T>,
        from: usize,
        to: usize,
        complement: bool,
        membership: F,
    ) -> Result<bool, E>
    where
        E: From<CollectionError>,
        F: FnMut(&T) -> Result<bool, E>,
    {
        check_range(from, to, self.size()).map_err(E::from)?;
        self.validate(root).map_err(E::from)?;
        let old_len = root.len();
        let result = root.batch_remove_range(self.offset() + from, self.offset() + to, complement, membership);
        if root.len() != old_len {
            self.propagate(root, root.len() as isize - old_len as isize);
        }
        result
    }

    /// Removes every element of the view matching `pred`.
    pub fn remove_if<F>(&self, root: &mut ArrayList<T>, pred: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.validate(root)?;
        let old_len = root.len();
        let modified = root.remove_if_range(self.offset(), self.end(), pred);
        if modified {
            self.propagate(root, root.len() as isize - old_len as isize);
        }
        Ok(modified)
    }

    /// Updates every element of the view in place. Not structural.
    pub fn replace_all<F>(&self, root: &mut ArrayList<T>, f: F) -> Result<()>
    where
        F: FnMut(&mut T),
    {
        self.validate(root)?;
        let (start, end) = (self.offset(), self.end());
        root.as_mut_slice()[start..end].iter_mut().for_each(f);
        Ok(())
    }

    /// Stable sort of the view's elements. Not structural.
    pub fn sort_by<F>(&self, root: &mut ArrayList<T>, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.validate(root)?;
        let (start, end) = (self.offset(), self.end());
        root.as_mut_slice()[start..end].sort_by(compare);
        Ok(())
    }

    // =========================================================================
    // Search and comparison
    //
    // The root is checked after the scan as well as before: a stale view
    // never reports a result.
    // =========================================================================

    /// Position of the first element equal to `item`, relative to the view.
    pub fn index_of(&self, root: &ArrayList<T>, item: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let found = self.window(root)?.iter().position(|e| e == item);
        self.validate(root)?;
        Ok(found)
    }

    /// Position of the last element equal to `item`, relative to the view.
    pub fn last_index_of(&self, root: &ArrayList<T>, item: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let found = self.window(root)?.iter().rposition(|e| e == item);
        self.validate(root)?;
        Ok(found)
    }

    /// Returns `true` if any element of the view equals `item`.
    pub fn contains(&self, root: &ArrayList<T>, item: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.index_of(root, item)?.is_some())
    }

    /// Element-wise equality with `other`.
    pub fn eq_slice<U>(&self, root: &ArrayList<T>, other: &[U]) -> Result<bool>
    where
        T: PartialEq<U>,
    {
        let equal = self.window(root)? == other;
        self.validate(root)?;
        Ok(equal)
    }

    /// Ordered polynomial hash of the view's elements.
    pub fn hash_code(&self, root: &ArrayList<T>) -> Result<i32>
    where
        T: ValueHash,
    {
        let hash = hash_ordered(self.window(root)?);
        self.validate(root)?;
        Ok(hash)
    }

    // =========================================================================
    // Derived handles
    // =========================================================================

    /// View over `[from, to)` of this view.
    ///
    /// Inherits this view's recorded version: carving a child out of a stale
    /// view yields a stale child.
    pub fn sub_list(&self, from: usize, to: usize) -> Result<SubList<T>> {
        check_range(from, to, self.size())?;
        Ok(Self::from_frame(ViewFrame {
            owner: self.frame.owner,
            offset: self.offset() + from,
            size: Cell::new(to - from),
            version: Cell::new(self.version()),
            parent: Some(Rc::clone(&self.frame)),
        }))
    }

    /// Fail-fast cursor over the view, starting before `index`.
    pub fn list_iter(&self, root: &ArrayList<T>, index: usize) -> Result<SubListIter<T>> {
        self.validate(root)?;
        check_position(index, self.size())?;
        Ok(SubListIter {
            view: self.clone(),
            cursor: index,
            last_ret: None,
            expected: self.version(),
        })
    }

    /// Splittable cursor bounded to the view's current range.
    pub fn splitter(&self, root: &ArrayList<T>) -> Result<ArraySplitter<T>> {
        self.validate(root)?;
        Ok(ArraySplitter::bound(
            self.frame.owner,
            self.offset(),
            self.end(),
            self.version(),
        ))
    }
}

// =============================================================================
// SubListIter
// =============================================================================

/// Fail-fast bidirectional cursor over a [`SubList`].
///
/// Indices are relative to the view. Removals and insertions made through
/// the cursor go through the view, so its ancestors stay valid too.
#[derive(Debug)]
pub struct SubListIter<T> {
    view: SubList<T>,
    cursor: usize,
    last_ret: Option<usize>,
    expected: u64,
}

impl<T> SubListIter<T> {
    fn check(&self, root: &ArrayList<T>) -> Result<()> {
        if self.view.frame.owner != root.owner() {
            return Err(CollectionError::ForeignContainer);
        }
        root.mods.check(self.expected)
    }

    /// Returns `true` if an element follows the cursor.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor != self.view.size()
    }

    /// Returns `true` if an element precedes the cursor.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.cursor != 0
    }

    /// Index, within the view, of the element `next` would return.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.cursor
    }

    /// Index, within the view, of the element `previous` would return.
    #[inline]
    pub fn previous_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Advances past the next element and returns it.
    pub fn next<'a>(&mut self, root: &'a ArrayList<T>) -> Result<Option<&'a T>> {
        self.check(root)?;
        let i = self.cursor;
        if i >= self.view.size() {
            return Ok(None);
        }
        self.cursor = i + 1;
        self.last_ret = Some(i);
        Ok(Some(&root.as_slice()[self.view.offset() + i]))
    }

    /// Steps back over the previous element and returns it.
    pub fn previous<'a>(&mut self, root: &'a ArrayList<T>) -> Result<Option<&'a T>> {
        self.check(root)?;
        let Some(i) = self.cursor.checked_sub(1) else {
            return Ok(None);
        };
        self.cursor = i;
        self.last_ret = Some(i);
        Ok(Some(&root.as_slice()[self.view.offset() + i]))
    }

    /// Removes the element last returned by `next` or `previous`.
    pub fn remove(&mut self, root: &mut ArrayList<T>) -> Result<T> {
        let last = self.last_ret.ok_or(CollectionError::IllegalState)?;
        self.check(root)?;
        let value = self.view.remove(root, last)?;
        self.cursor = last;
        self.last_ret = None;
        self.expected = self.view.version();
        Ok(value)
    }

    /// Replaces the element last returned by `next` or `previous`.
    pub fn set(&mut self, root: &mut ArrayList<T>, value: T) -> Result<T> {
        let last = self.last_ret.ok_or(CollectionError::IllegalState)?;
        self.check(root)?;
        root.set(self.view.offset() + last, value)
    }

    /// Inserts `value` before the cursor.
    pub fn add(&mut self, root: &mut ArrayList<T>, value: T) -> Result<()> {
        self.check(root)?;
        self.view.insert(root, self.cursor, value)?;
        self.cursor += 1;
        self.last_ret = None;
        self.expected = self.view.version();
        Ok(())
    }

    /// Visits every element after the cursor, leaving the cursor at the end.
    pub fn for_each_remaining<F>(&mut self, root: &ArrayList<T>, mut f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        self.check(root)?;
        let size = self.view.size();
        if self.cursor >= size {
            return Ok(());
        }
        let (start, end) = (self.view.offset() + self.cursor, self.view.end());
        for e in &root.as_slice()[start..end] {
            f(e);
        }
        self.cursor = size;
        self.last_ret = Some(size - 1);
        Ok(())
    }
}
