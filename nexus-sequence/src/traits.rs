//! Capability traits shared by the list implementations.
//!
//! - [`Sequence`]: ordered, index-addressable, mutable sequence
//! - [`Deque`]: double-ended queue / stack operations
//! - [`Contains`]: membership test used by bulk removal
//!
//! The lists implement every operation inherently as well; the traits exist
//! so that code can be written once against either list.

use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

use crate::error::Result;

// =============================================================================
// Sequence
// =============================================================================

/// An ordered, index-addressable, mutable sequence.
///
/// # Example
///
/// ```
/// use nexus_sequence::{ArrayList, LinkedList, Sequence};
///
/// fn fill<S: Sequence<u32>>(seq: &mut S) {
///     for i in 0..4 {
///         seq.add(i).unwrap();
///     }
///     seq.remove(0).unwrap();
/// }
///
/// let mut array = ArrayList::new();
/// let mut linked = LinkedList::new();
/// fill(&mut array);
/// fill(&mut linked);
/// assert_eq!(array, linked);
/// ```
pub trait Sequence<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the sequence holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`.
    fn get(&self, index: usize) -> Result<&T>;

    /// Mutable element at `index`.
    fn get_mut(&mut self, index: usize) -> Result<&mut T>;

    /// Replaces the element at `index`, returning the old value.
    fn set(&mut self, index: usize, value: T) -> Result<T>;

    /// Appends to the end.
    fn add(&mut self, value: T) -> Result<()>;

    /// Inserts at `index`, shifting later elements back.
    fn insert(&mut self, index: usize, value: T) -> Result<()>;

    /// Removes and returns the element at `index`.
    fn remove(&mut self, index: usize) -> Result<T>;

    /// Removes every element.
    fn clear(&mut self);

    /// Calls `f` on each element in order.
    fn for_each<F: FnMut(&T)>(&self, f: F);

    /// Position of the first element equal to `item`.
    fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq;

    /// Position of the last element equal to `item`.
    fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq;

    /// Snapshot of the elements in order.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        self.for_each(|e| out.push(e.clone()));
        out
    }
}

// =============================================================================
// Deque
// =============================================================================

/// Double-ended queue operations.
///
/// "Must exist" accessors (`remove_*`, `get_*`, `element`) fail with
/// [`CollectionError::Empty`](crate::CollectionError::Empty) on an empty
/// deque; their `poll_*`/`peek_*` counterparts return `None` instead.
pub trait Deque<T> {
    /// Inserts at the front.
    fn add_first(&mut self, value: T);

    /// Inserts at the back.
    fn add_last(&mut self, value: T);

    /// Removes the front element.
    fn remove_first(&mut self) -> Result<T>;

    /// Removes the back element.
    fn remove_last(&mut self) -> Result<T>;

    /// Front element.
    fn get_first(&self) -> Result<&T>;

    /// Back element.
    fn get_last(&self) -> Result<&T>;

    /// Front element, if any.
    fn peek_first(&self) -> Option<&T>;

    /// Back element, if any.
    fn peek_last(&self) -> Option<&T>;

    /// Removes the front element, if any.
    fn poll_first(&mut self) -> Option<T>;

    /// Removes the back element, if any.
    fn poll_last(&mut self) -> Option<T>;

    /// Inserts at the front. Always succeeds.
    fn offer_first(&mut self, value: T) -> bool {
        self.add_first(value);
        true
    }

    /// Inserts at the back. Always succeeds.
    fn offer_last(&mut self, value: T) -> bool {
        self.add_last(value);
        true
    }

    /// Queue insert (back).
    fn offer(&mut self, value: T) -> bool {
        self.offer_last(value)
    }

    /// Queue removal (front), if any.
    fn poll(&mut self) -> Option<T> {
        self.poll_first()
    }

    /// Queue head, if any.
    fn peek(&self) -> Option<&T> {
        self.peek_first()
    }

    /// Queue head; fails on an empty deque.
    fn element(&self) -> Result<&T> {
        self.get_first()
    }

    /// Stack push (front).
    fn push(&mut self, value: T) {
        self.add_first(value);
    }

    /// Stack pop (front); fails on an empty deque.
    fn pop(&mut self) -> Result<T> {
        self.remove_first()
    }
}

// =============================================================================
// Contains
// =============================================================================

/// Membership test.
pub trait Contains<T> {
    /// Returns `true` if `item` is a member.
    fn contains(&self, item: &T) -> bool;
}

impl<T: PartialEq> Contains<T> for [T] {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        <[T]>::contains(self, item)
    }
}

impl<T: PartialEq, const N: usize> Contains<T> for [T; N] {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

impl<T: PartialEq> Contains<T> for Vec<T> {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

impl<T: Eq + Hash, H: BuildHasher> Contains<T> for HashSet<T, H> {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        HashSet::contains(self, item)
    }
}

impl<T: Ord> Contains<T> for BTreeSet<T> {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        BTreeSet::contains(self, item)
    }
}

impl<T, C: Contains<T> + ?Sized> Contains<T> for &C {
    #[inline]
    fn contains(&self, item: &T) -> bool {
        (**self).contains(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_members<C: Contains<u32> + ?Sized>(c: &C, items: &[u32]) -> usize {
        items.iter().filter(|i| c.contains(i)).count()
    }

    #[test]
    fn contains_impls_agree() {
        let probe = [1, 2, 3, 4, 5];
        let vec = vec![2, 4, 6];
        let hash: HashSet<u32> = vec.iter().copied().collect();
        let tree: BTreeSet<u32> = vec.iter().copied().collect();

        assert_eq!(count_members(vec.as_slice(), &probe), 2);
        assert_eq!(count_members(&vec, &probe), 2);
        assert_eq!(count_members(&[2u32, 4, 6], &probe), 2);
        assert_eq!(count_members(&hash, &probe), 2);
        assert_eq!(count_members(&tree, &probe), 2);
    }
}
