//! Growth and batching parameters.

use crate::error::{CollectionError, Result};

/// Capacity policy for [`ArrayList`](crate::ArrayList) buffers.
///
/// A fresh default-constructed list holds no storage. Its first growth jumps
/// straight to `max(default_capacity, required)`; every later growth prefers
/// 1.5x the current capacity but never less than what was required.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity of the first allocation of a default-constructed list.
    ///
    /// Default: 10.
    pub default_capacity: usize,

    /// Largest length a list may reach.
    ///
    /// Default: `i32::MAX - 8`. Growth beyond it fails with
    /// [`CollectionError::CapacityExhausted`].
    pub max_len: usize,
}

impl GrowthPolicy {
    /// Default first-allocation capacity.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Default maximum sequence length.
    pub const DEFAULT_MAX_LEN: usize = i32::MAX as usize - 8;

    /// Policy with the default capacity and the given length limit.
    pub const fn with_max_len(max_len: usize) -> Self {
        Self {
            default_capacity: Self::DEFAULT_CAPACITY,
            max_len,
        }
    }

    /// Computes the capacity to grow to.
    ///
    /// `lazy_default` is true when the buffer is the untouched storage of a
    /// default-constructed list.
    pub fn new_capacity(&self, current: usize, required: usize, lazy_default: bool) -> Result<usize> {
        if required > self.max_len {
            return Err(CollectionError::CapacityExhausted {
                requested: required,
                max: self.max_len,
            });
        }

        if current == 0 && lazy_default {
            return Ok(self.default_capacity.max(required).min(self.max_len));
        }

        let preferred = current.saturating_add(current >> 1).min(self.max_len);
        Ok(preferred.max(required))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::with_max_len(Self::DEFAULT_MAX_LEN)
    }
}

/// First batch peeled off by a linked-list split.
pub const BATCH_UNIT: usize = 1 << 10;

/// Largest batch a linked-list split will peel off.
pub const MAX_BATCH: usize = 1 << 25;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_growth_uses_default_capacity() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.new_capacity(0, 1, true), Ok(10));
        assert_eq!(policy.new_capacity(0, 25, true), Ok(25));
    }

    #[test]
    fn explicit_zero_capacity_grows_exactly() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.new_capacity(0, 1, false), Ok(1));
    }

    #[test]
    fn grows_by_half() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.new_capacity(10, 11, false), Ok(15));
        assert_eq!(policy.new_capacity(15, 16, false), Ok(22));
        assert_eq!(policy.new_capacity(10, 40, false), Ok(40));
    }

    #[test]
    fn clamps_preferred_growth_to_max() {
        let policy = GrowthPolicy::with_max_len(20);
        assert_eq!(policy.new_capacity(16, 17, false), Ok(20));
        assert_eq!(
            policy.new_capacity(20, 21, false),
            Err(CollectionError::CapacityExhausted {
                requested: 21,
                max: 20
            })
        );
    }
}
