//! Integer bit operations - popcount, bit scans, logarithms
//!
//! Each scan lowers to a single instruction when the target enables it
//! (`popcnt`, `lzcnt`, `bmi1`; always on aarch64) and to the software
//! fallbacks in [`super::soft`] otherwise. All functions are total.

#[allow(unused_imports)]
use super::soft;

/// True when `value` has exactly one bit set.
#[inline(always)]
pub const fn is_power_of_two(value: u64) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

/// Population count of a 32-bit word.
#[inline(always)]
pub fn pop_count32(value: u32) -> u32 {
    #[cfg(any(target_feature = "popcnt", target_arch = "aarch64"))]
    {
        value.count_ones()
    }
    #[cfg(not(any(target_feature = "popcnt", target_arch = "aarch64")))]
    {
        soft::pop_count32(value)
    }
}

/// Population count of a 64-bit word.
#[inline(always)]
pub fn pop_count(value: u64) -> u32 {
    #[cfg(any(target_feature = "popcnt", target_arch = "aarch64"))]
    {
        value.count_ones()
    }
    #[cfg(not(any(target_feature = "popcnt", target_arch = "aarch64")))]
    {
        soft::pop_count64(value)
    }
}

/// Leading zero count of a 32-bit word; 32 for zero.
#[inline(always)]
pub fn leading_zero_count32(value: u32) -> u32 {
    #[cfg(any(target_feature = "lzcnt", target_arch = "aarch64"))]
    {
        value.leading_zeros()
    }
    #[cfg(not(any(target_feature = "lzcnt", target_arch = "aarch64")))]
    {
        soft::leading_zero_count32(value)
    }
}

/// Leading zero count of a 64-bit word; 64 for zero.
#[inline(always)]
pub fn leading_zero_count(value: u64) -> u32 {
    #[cfg(any(target_feature = "lzcnt", target_arch = "aarch64"))]
    {
        value.leading_zeros()
    }
    #[cfg(not(any(target_feature = "lzcnt", target_arch = "aarch64")))]
    {
        soft::leading_zero_count64(value)
    }
}

/// Trailing zero count of a 32-bit word; 32 for zero.
#[inline(always)]
pub fn trailing_zero_count32(value: u32) -> u32 {
    #[cfg(any(target_feature = "bmi1", target_arch = "aarch64"))]
    {
        value.trailing_zeros()
    }
    #[cfg(not(any(target_feature = "bmi1", target_arch = "aarch64")))]
    {
        soft::trailing_zero_count32(value)
    }
}

/// Trailing zero count of a 64-bit word; 64 for zero.
#[inline(always)]
pub fn trailing_zero_count(value: u64) -> u32 {
    #[cfg(any(target_feature = "bmi1", target_arch = "aarch64"))]
    {
        value.trailing_zeros()
    }
    #[cfg(not(any(target_feature = "bmi1", target_arch = "aarch64")))]
    {
        soft::trailing_zero_count64(value)
    }
}

/// Floor of log2 for a 32-bit word.
///
/// Zero is coerced to one before the scan, so `log2_32(0) == 0`. Callers
/// that must distinguish zero check it themselves.
#[inline(always)]
pub fn log2_32(value: u32) -> u32 {
    31 ^ leading_zero_count32(value | 1)
}

/// Floor of log2 for a 64-bit word, with the same zero coercion as
/// [`log2_32`].
#[inline(always)]
pub fn log2(value: u64) -> u32 {
    63 ^ leading_zero_count(value | 1)
}

/// Ceiling of log2: `log2(value)`, plus one unless `value` is a power of two.
///
/// Follows the zero coercion of [`log2`], so `log2_ceiling(0) == 1`.
#[inline(always)]
pub fn log2_ceiling(value: u64) -> u32 {
    let floor = log2(value);
    if pop_count(value) == 1 {
        floor
    } else {
        floor + 1
    }
}

#[inline(always)]
pub const fn rotate_left32(value: u32, offset: u32) -> u32 {
    value.rotate_left(offset)
}

#[inline(always)]
pub const fn rotate_right32(value: u32, offset: u32) -> u32 {
    value.rotate_right(offset)
}

#[inline(always)]
pub const fn rotate_left(value: u64, offset: u32) -> u64 {
    value.rotate_left(offset)
}

#[inline(always)]
pub const fn rotate_right(value: u64, offset: u32) -> u64 {
    value.rotate_right(offset)
}

/// Smallest power of two `>= value`.
///
/// Returns 0 for 0 and for inputs above `2^31`, where the result does not
/// fit in 32 bits.
#[inline]
pub fn round_up_to_power_of_two(value: u32) -> u32 {
    if value == 0 || value > (1 << 31) {
        return 0;
    }
    if value == 1 {
        return 1;
    }
    1 << (32 - leading_zero_count32(value - 1))
}
