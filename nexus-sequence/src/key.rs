//! Key trait for node storage indices.
//!
//! Linked nodes refer to their neighbours by key rather than by pointer. A
//! reserved sentinel (`NONE`) stands for "no neighbour", which keeps a node
//! two words of links instead of two `Option`s.

/// Copyable storage key with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use nexus_sequence::Key;
///
/// let key: usize = 3;
/// assert!(key.is_some());
/// assert!(usize::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// Sentinel value representing "no key".
    const NONE: Self;

    /// Narrows a slot index to a key. `None` if the index does not fit or
    /// collides with [`NONE`](Key::NONE).
    fn from_usize(val: usize) -> Option<Self>;

    /// Widens the key back to a slot index.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Option<Self> {
                    <$ty>::try_from(val).ok().filter(|k| *k != Self::NONE)
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u32, u64, usize);
