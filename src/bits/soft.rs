//! Software fallbacks - SWAR population count and De Bruijn bit scans
//!
//! These are used by [`super::primitives`] when the target lacks the
//! matching instruction, and are always compiled so tests can check them
//! against the hardware path.

/// De Bruijn table indexed by `(isolated_lowest_bit * 0x077C_B531) >> 27`.
const TRAILING_ZERO_DE_BRUIJN: [u8; 32] = [
    0, 1, 28, 2, 29, 14, 24, 3, 30, 22, 20, 15, 25, 17, 4, 8, 31, 27, 13, 23, 21, 19, 16, 7, 26,
    12, 18, 6, 11, 5, 10, 9,
];

/// De Bruijn table indexed by `(smeared_value * 0x07C4_ACDD) >> 27`.
const LOG2_DE_BRUIJN: [u8; 32] = [
    0, 9, 1, 10, 13, 21, 2, 29, 11, 14, 16, 18, 22, 25, 3, 30, 8, 12, 20, 28, 15, 17, 24, 7, 19,
    27, 23, 6, 26, 5, 4, 31,
];

/// SWAR population count of a 32-bit word.
#[inline]
pub const fn pop_count32(value: u32) -> u32 {
    const C1: u32 = 0x5555_5555;
    const C2: u32 = 0x3333_3333;
    const C3: u32 = 0x0F0F_0F0F;
    const C4: u32 = 0x0101_0101;

    let mut v = value;
    v -= (v >> 1) & C1;
    v = (v & C2) + ((v >> 2) & C2);
    v = ((v + (v >> 4)) & C3).wrapping_mul(C4) >> 24;
    v
}

/// SWAR population count of a 64-bit word.
#[inline]
pub const fn pop_count64(value: u64) -> u32 {
    const C1: u64 = 0x5555_5555_5555_5555;
    const C2: u64 = 0x3333_3333_3333_3333;
    const C3: u64 = 0x0F0F_0F0F_0F0F_0F0F;
    const C4: u64 = 0x0101_0101_0101_0101;

    let mut v = value;
    v -= (v >> 1) & C1;
    v = (v & C2) + ((v >> 2) & C2);
    v = ((v + (v >> 4)) & C3).wrapping_mul(C4) >> 56;
    v as u32
}

/// Floor log2 of a non-zero 32-bit word via De Bruijn lookup.
///
/// Zero maps to 0; callers decide what zero means.
#[inline]
pub const fn log2_32(value: u32) -> u32 {
    let mut v = value;
    // Smear the highest set bit downward.
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    LOG2_DE_BRUIJN[(v.wrapping_mul(0x07C4_ACDD) >> 27) as usize] as u32
}

/// Trailing zero count of a 32-bit word; 32 for zero.
#[inline]
pub const fn trailing_zero_count32(value: u32) -> u32 {
    if value == 0 {
        return 32;
    }
    let lowest = value & value.wrapping_neg();
    TRAILING_ZERO_DE_BRUIJN[(lowest.wrapping_mul(0x077C_B531) >> 27) as usize] as u32
}

/// Trailing zero count of a 64-bit word; 64 for zero.
#[inline]
pub const fn trailing_zero_count64(value: u64) -> u32 {
    let lo = value as u32;
    if lo != 0 {
        trailing_zero_count32(lo)
    } else {
        32 + trailing_zero_count32((value >> 32) as u32)
    }
}

/// Leading zero count of a 32-bit word; 32 for zero.
#[inline]
pub const fn leading_zero_count32(value: u32) -> u32 {
    if value == 0 {
        return 32;
    }
    31 - log2_32(value)
}

/// Leading zero count of a 64-bit word; 64 for zero.
#[inline]
pub const fn leading_zero_count64(value: u64) -> u32 {
    let hi = (value >> 32) as u32;
    if hi != 0 {
        leading_zero_count32(hi)
    } else {
        32 + leading_zero_count32(value as u32)
    }
}
