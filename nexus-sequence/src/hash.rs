//! Ordered polynomial value hash.
//!
//! Independent of [`core::hash::Hash`]: a [`ValueHash`] is a fixed 32-bit
//! value per element so the hash of a sequence is stable across processes
//! and platforms. The sequence hash is
//!
//! ```text
//! h = 1
//! for e in seq: h = 31 * h + e.value_hash()     (wrapping i32)
//! ```

/// A stable 32-bit hash of a single value.
pub trait ValueHash {
    /// Returns the value hash of `self`.
    fn value_hash(&self) -> i32;
}

/// Hashes elements in order with the `31 * acc + h` recurrence.
///
/// # Example
///
/// ```
/// use nexus_sequence::hash_ordered;
///
/// assert_eq!(hash_ordered(&Vec::<i32>::new()), 1);
/// assert_eq!(hash_ordered(&[1, 2, 3]), 30817);
/// ```
pub fn hash_ordered<'a, T, I>(items: I) -> i32
where
    T: ValueHash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .fold(1i32, |acc, e| acc.wrapping_mul(31).wrapping_add(e.value_hash()))
}

macro_rules! impl_value_hash_narrow {
    ($($ty:ty),*) => {
        $(
            impl ValueHash for $ty {
                #[inline]
                fn value_hash(&self) -> i32 {
                    *self as i32
                }
            }
        )*
    };
}

macro_rules! impl_value_hash_wide {
    ($($ty:ty),*) => {
        $(
            impl ValueHash for $ty {
                #[inline]
                fn value_hash(&self) -> i32 {
                    let v = *self as u64;
                    (v ^ (v >> 32)) as i32
                }
            }
        )*
    };
}

impl_value_hash_narrow!(i8, u8, i16, u16, i32, u32);
impl_value_hash_wide!(i64, u64, isize, usize);

impl ValueHash for bool {
    #[inline]
    fn value_hash(&self) -> i32 {
        if *self { 1231 } else { 1237 }
    }
}

impl ValueHash for char {
    #[inline]
    fn value_hash(&self) -> i32 {
        *self as i32
    }
}

impl ValueHash for f32 {
    #[inline]
    fn value_hash(&self) -> i32 {
        // All NaNs hash alike
        let bits = if self.is_nan() { f32::NAN.to_bits() } else { self.to_bits() };
        bits as i32
    }
}

impl ValueHash for f64 {
    #[inline]
    fn value_hash(&self) -> i32 {
        let bits = if self.is_nan() { f64::NAN.to_bits() } else { self.to_bits() };
        (bits ^ (bits >> 32)) as i32
    }
}

impl ValueHash for str {
    /// Polynomial hash over the UTF-16 code units.
    fn value_hash(&self) -> i32 {
        self.encode_utf16()
            .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(unit as i32))
    }
}

impl ValueHash for String {
    #[inline]
    fn value_hash(&self) -> i32 {
        self.as_str().value_hash()
    }
}

impl<T: ValueHash> ValueHash for Option<T> {
    #[inline]
    fn value_hash(&self) -> i32 {
        self.as_ref().map_or(0, ValueHash::value_hash)
    }
}

impl<T: ValueHash + ?Sized> ValueHash for &T {
    #[inline]
    fn value_hash(&self) -> i32 {
        (**self).value_hash()
    }
}

impl<T: ValueHash + ?Sized> ValueHash for Box<T> {
    #[inline]
    fn value_hash(&self) -> i32 {
        (**self).value_hash()
    }
}
