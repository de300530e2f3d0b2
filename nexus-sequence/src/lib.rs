//! Ordered sequence containers with fail-fast detached handles.
//!
//! Two general-purpose lists sharing one contract:
//!
//! ```text
//! ArrayList<T>   - contiguous buffer, O(1) indexed access, amortized O(1) append
//! LinkedList<T>  - doubly-linked nodes in a slab, O(1) at both ends, deque API
//! ```
//!
//! Both carry a structural version that is bumped on every change to their
//! shape (add, remove, clear, bulk insert or removal, sort, grow, trim) and an
//! identity fixed at construction. Iterators, range views, and splittable
//! cursors are *detached*: they hold positions rather than borrows and take
//! the list as an argument on each call, validating identity and version
//! before acting.
//!
//! ```text
//!                 ┌────────────┐
//!   ListIter ───► │            │ ◄─── SubList ◄─── SubList (nested)
//!                 │ ArrayList  │
//! ArraySplitter ► │            │
//!                 └────────────┘
//!                 ┌────────────┐
//! LinkedListIter► │ LinkedList │ ◄─── LinkedSplitter ───► Batch
//!                 └────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use nexus_sequence::{ArrayList, LinkedList, Deque};
//!
//! let mut array: ArrayList<u32> = (0..5).collect();
//! array.remove_if(|&e| e % 2 == 1);
//! assert_eq!(array, [0, 2, 4]);
//!
//! let mut linked: LinkedList<u32> = array.iter().copied().collect();
//! linked.add_first(9);
//! assert_eq!(linked.poll_last(), Some(4));
//! assert_eq!(linked, [9, 0, 2]);
//! ```
//!
//! # Range views
//!
//! A [`SubList`] is a window onto a parent list. Structural changes made
//! through the view shift the parent and every enclosing view; changes made
//! any other way invalidate it.
//!
//! ```
//! use nexus_sequence::ArrayList;
//!
//! let mut list: ArrayList<char> = "abcde".chars().collect();
//! let view = list.sub_list(1, 4).unwrap();
//! assert_eq!(view.to_vec(&list).unwrap(), ['b', 'c', 'd']);
//!
//! view.remove(&mut list, 0).unwrap();
//! assert_eq!(list, ['a', 'c', 'd', 'e']);
//! assert_eq!(view.to_vec(&list).unwrap(), ['c', 'd']);
//!
//! // A change made behind the view's back invalidates it
//! list.push('f').unwrap();
//! assert!(view.len(&list).is_err());
//! ```
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for both lists as plain sequences

#![warn(missing_docs)]

pub mod array;
pub mod buffer;
pub mod config;
pub mod error;
pub mod hash;
pub mod key;
pub mod linked;
pub mod split;
pub mod storage;
pub mod tracking;
pub mod traits;

#[cfg(feature = "serde")]
mod serde_impl;

pub use array::{ArrayList, ArraySplitter, IntoIter, ListIter, SubList, SubListIter};
pub use buffer::RawBuffer;
pub use config::{BATCH_UNIT, GrowthPolicy, MAX_BATCH};
pub use error::{CollectionError, Result};
pub use hash::{ValueHash, hash_ordered};
pub use key::Key;
pub use linked::{Batch, DescendingIter, LinkedList, LinkedListIter, LinkedSplitter, Node, NodeSlab};
pub use split::SplitCursor;
pub use storage::{KeyedSlab, Storage};
pub use tracking::{ModCount, OwnerId, Stamp};
pub use traits::{Contains, Deque, Sequence};
