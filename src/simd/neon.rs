//! aarch64 NEON kernels (128-bit, four words per step)
//!
//! NEON is part of the aarch64 baseline; the dispatcher still confirms it
//! before installing these.

use super::scalar;
use std::arch::aarch64::*;

const LANES: usize = 4;

#[target_feature(enable = "neon")]
unsafe fn binary<V, S>(dst: &mut [u32], src: &[u32], vop: V, sop: S)
where
    V: Fn(uint32x4_t, uint32x4_t) -> uint32x4_t,
    S: Fn(u32, u32) -> u32,
{
    let count = dst.len();
    debug_assert!(src.len() >= count);
    let d = dst.as_mut_ptr();
    let s = src.as_ptr();
    let mut i = 0;
    while i + LANES <= count {
        let a = vld1q_u32(d.add(i));
        let b = vld1q_u32(s.add(i));
        vst1q_u32(d.add(i), vop(a, b));
        i += LANES;
    }
    scalar::binary_unrolled4(&mut dst[i..], &src[i..count], sop);
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn and(dst: &mut [u32], src: &[u32]) {
    binary(dst, src, |a, b| vandq_u32(a, b), |x, y| x & y);
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn or(dst: &mut [u32], src: &[u32]) {
    binary(dst, src, |a, b| vorrq_u32(a, b), |x, y| x | y);
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn xor(dst: &mut [u32], src: &[u32]) {
    binary(dst, src, |a, b| veorq_u32(a, b), |x, y| x ^ y);
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn and_not(dst: &mut [u32], src: &[u32]) {
    binary(dst, src, |a, b| vbicq_u32(a, b), |x, y| x & !y);
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn not(buf: &mut [u32]) {
    let count = buf.len();
    let p = buf.as_mut_ptr();
    let mut i = 0;
    while i + LANES <= count {
        vst1q_u32(p.add(i), vmvnq_u32(vld1q_u32(p.add(i))));
        i += LANES;
    }
    scalar::unary_unrolled4(&mut buf[i..], |x| !x);
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn fill(buf: &mut [u32], value: u32) {
    let splat = vdupq_n_u32(value);
    let count = buf.len();
    let p = buf.as_mut_ptr();
    let mut i = 0;
    while i + LANES <= count {
        vst1q_u32(p.add(i), splat);
        i += LANES;
    }
    scalar::unary_unrolled4(&mut buf[i..], |_| value);
}
