//! Division-free modulo for a fixed divisor
//!
//! Purpose: repeated `value % divisor` during index lookups without a
//! division instruction.
//!
//! Algorithm (Lemire, "Faster Remainder by Direct Computation"):
//! - `multiplier = u64::MAX / divisor + 1` (wrapping), precomputed once
//! - `fast_mod = ((multiplier * value) mod 2^64 * divisor) >> 64`
//!
//! The identity holds for every 32-bit value and every divisor `>= 1`.
//! For `divisor == 1` the multiplier wraps to zero and the result is zero,
//! which is still correct.
//!
//! On targets with 32-bit pointers the 128-bit multiply is not worth it;
//! the multiplier is 0 and plain `%` is used.
//!
//! References:
//! - https://arxiv.org/abs/1902.01961
//! - https://github.com/lemire/fastmod

/// Precompute the fast-modulo multiplier for `divisor`.
///
/// Preconditions:
/// - `divisor >= 1`. Enforced with a `debug_assert!`.
#[inline]
pub fn compute_multiplier(divisor: u32) -> u64 {
    debug_assert!(divisor >= 1, "fast modulo divisor must be non-zero");

    #[cfg(target_pointer_width = "64")]
    {
        (u64::MAX / u64::from(divisor)).wrapping_add(1)
    }
    #[cfg(not(target_pointer_width = "64"))]
    {
        0
    }
}

/// `value % divisor` using the multiplier from [`compute_multiplier`].
#[inline(always)]
pub fn fast_mod(value: u32, divisor: u32, multiplier: u64) -> u32 {
    #[cfg(target_pointer_width = "64")]
    {
        let lowbits = multiplier.wrapping_mul(u64::from(value));
        ((u128::from(lowbits) * u128::from(divisor)) >> 64) as u32
    }
    #[cfg(not(target_pointer_width = "64"))]
    {
        let _ = multiplier;
        value % divisor
    }
}

/// A divisor bundled with its precomputed multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastModulo {
    divisor: u32,
    multiplier: u64,
}

impl FastModulo {
    /// Returns `None` for a zero divisor.
    pub fn new(divisor: u32) -> Option<Self> {
        if divisor == 0 {
            return None;
        }
        Some(Self {
            divisor,
            multiplier: compute_multiplier(divisor),
        })
    }

    #[inline]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    #[inline]
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// `value % self.divisor()`
    #[inline(always)]
    pub fn reduce(&self, value: u32) -> u32 {
        fast_mod(value, self.divisor, self.multiplier)
    }
}
