//! Scalar word kernels - small-count cascades and unrolled loops
//!
//! The cascades mirror a fallthrough switch: for `n <= 7` each index is
//! touched by one straight-line statement, highest index first, with no
//! loop setup. Everything else is an unrolled loop that finishes with a
//! cascade.

use crate::bits;

/// Largest word count handled by the straight-line cascade.
pub(crate) const SMALL_MAX: usize = 7;

#[inline(always)]
pub(crate) fn binary_cascade<F: Fn(u32, u32) -> u32>(dst: &mut [u32], src: &[u32], op: F) {
    let n = dst.len();
    debug_assert!(n <= SMALL_MAX);
    let src = &src[..n];
    if n > 6 {
        dst[6] = op(dst[6], src[6]);
    }
    if n > 5 {
        dst[5] = op(dst[5], src[5]);
    }
    if n > 4 {
        dst[4] = op(dst[4], src[4]);
    }
    if n > 3 {
        dst[3] = op(dst[3], src[3]);
    }
    if n > 2 {
        dst[2] = op(dst[2], src[2]);
    }
    if n > 1 {
        dst[1] = op(dst[1], src[1]);
    }
    if n > 0 {
        dst[0] = op(dst[0], src[0]);
    }
}

#[inline(always)]
pub(crate) fn unary_cascade<F: Fn(u32) -> u32>(buf: &mut [u32], op: F) {
    let n = buf.len();
    debug_assert!(n <= SMALL_MAX);
    if n > 6 {
        buf[6] = op(buf[6]);
    }
    if n > 5 {
        buf[5] = op(buf[5]);
    }
    if n > 4 {
        buf[4] = op(buf[4]);
    }
    if n > 3 {
        buf[3] = op(buf[3]);
    }
    if n > 2 {
        buf[2] = op(buf[2]);
    }
    if n > 1 {
        buf[1] = op(buf[1]);
    }
    if n > 0 {
        buf[0] = op(buf[0]);
    }
}

/// Remainder loop behind the vector kernels: 4 words per step, then the
/// cascade for the last 0..=3.
#[inline(always)]
pub(crate) fn binary_unrolled4<F: Fn(u32, u32) -> u32>(dst: &mut [u32], src: &[u32], op: F) {
    let src = &src[..dst.len()];
    let mut d = dst.chunks_exact_mut(4);
    let mut s = src.chunks_exact(4);
    for (dc, sc) in (&mut d).zip(&mut s) {
        dc[0] = op(dc[0], sc[0]);
        dc[1] = op(dc[1], sc[1]);
        dc[2] = op(dc[2], sc[2]);
        dc[3] = op(dc[3], sc[3]);
    }
    binary_cascade(d.into_remainder(), s.remainder(), op);
}

#[inline(always)]
pub(crate) fn unary_unrolled4<F: Fn(u32) -> u32>(buf: &mut [u32], op: F) {
    let mut chunks = buf.chunks_exact_mut(4);
    for c in &mut chunks {
        c[0] = op(c[0]);
        c[1] = op(c[1]);
        c[2] = op(c[2]);
        c[3] = op(c[3]);
    }
    unary_cascade(chunks.into_remainder(), op);
}

#[inline(always)]
fn binary_unrolled8<F: Fn(u32, u32) -> u32>(dst: &mut [u32], src: &[u32], op: F) {
    let src = &src[..dst.len()];
    let mut d = dst.chunks_exact_mut(8);
    let mut s = src.chunks_exact(8);
    for (dc, sc) in (&mut d).zip(&mut s) {
        dc[0] = op(dc[0], sc[0]);
        dc[1] = op(dc[1], sc[1]);
        dc[2] = op(dc[2], sc[2]);
        dc[3] = op(dc[3], sc[3]);
        dc[4] = op(dc[4], sc[4]);
        dc[5] = op(dc[5], sc[5]);
        dc[6] = op(dc[6], sc[6]);
        dc[7] = op(dc[7], sc[7]);
    }
    binary_cascade(d.into_remainder(), s.remainder(), op);
}

#[inline(always)]
fn unary_unrolled8<F: Fn(u32) -> u32>(buf: &mut [u32], op: F) {
    let mut chunks = buf.chunks_exact_mut(8);
    for c in &mut chunks {
        c[0] = op(c[0]);
        c[1] = op(c[1]);
        c[2] = op(c[2]);
        c[3] = op(c[3]);
        c[4] = op(c[4]);
        c[5] = op(c[5]);
        c[6] = op(c[6]);
        c[7] = op(c[7]);
    }
    unary_cascade(chunks.into_remainder(), op);
}

pub(crate) fn and(dst: &mut [u32], src: &[u32]) {
    binary_unrolled8(dst, src, |a, b| a & b);
}

pub(crate) fn or(dst: &mut [u32], src: &[u32]) {
    binary_unrolled8(dst, src, |a, b| a | b);
}

pub(crate) fn xor(dst: &mut [u32], src: &[u32]) {
    binary_unrolled8(dst, src, |a, b| a ^ b);
}

pub(crate) fn and_not(dst: &mut [u32], src: &[u32]) {
    binary_unrolled8(dst, src, |a, b| a & !b);
}

pub(crate) fn not(buf: &mut [u32]) {
    unary_unrolled8(buf, |a| !a);
}

pub(crate) fn fill(buf: &mut [u32], value: u32) {
    unary_unrolled8(buf, |_| value);
}

/// Total set bits across `words`, four independent accumulators.
pub(crate) fn pop_count(words: &[u32]) -> u64 {
    let mut chunks = words.chunks_exact(4);
    let (mut a, mut b, mut c, mut d) = (0u64, 0u64, 0u64, 0u64);
    for w in &mut chunks {
        a += u64::from(bits::pop_count32(w[0]));
        b += u64::from(bits::pop_count32(w[1]));
        c += u64::from(bits::pop_count32(w[2]));
        d += u64::from(bits::pop_count32(w[3]));
    }
    let tail: u64 = chunks
        .remainder()
        .iter()
        .map(|&w| u64::from(bits::pop_count32(w)))
        .sum();
    a + b + c + d + tail
}
