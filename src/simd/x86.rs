//! x86_64 vector kernels - SSE2 (128-bit), AVX2 (256-bit), AVX-512F (512-bit)
//!
//! Every kernel walks the buffer one vector at a time with unaligned
//! loads and stores, then hands the remainder to the scalar 4-way loop.
//!
//! # Safety
//! Each function requires its target feature at runtime. The dispatcher
//! only installs a kernel after `is_x86_feature_detected!` confirmed it.

use super::scalar;
use std::arch::x86_64::*;

macro_rules! vector_binary {
    (
        $dst:ident, $src:ident, $vec:ty, $load:path, $store:path,
        |$a:ident, $b:ident| $vop:expr,
        |$x:ident, $y:ident| $sop:expr
    ) => {{
        const LANES: usize = core::mem::size_of::<$vec>() / core::mem::size_of::<u32>();
        let count = $dst.len();
        debug_assert!($src.len() >= count);
        let d = $dst.as_mut_ptr();
        let s = $src.as_ptr();
        let mut i = 0;
        while i + LANES <= count {
            let $a: $vec = $load((d.add(i) as *const u32).cast());
            let $b: $vec = $load(s.add(i).cast());
            $store(d.add(i).cast(), $vop);
            i += LANES;
        }
        scalar::binary_unrolled4(&mut $dst[i..], &$src[i..count], |$x, $y| $sop);
    }};
}

macro_rules! vector_unary {
    (
        $buf:ident, $vec:ty, $load:path, $store:path,
        |$a:ident| $vop:expr,
        |$x:ident| $sop:expr
    ) => {{
        const LANES: usize = core::mem::size_of::<$vec>() / core::mem::size_of::<u32>();
        let count = $buf.len();
        let p = $buf.as_mut_ptr();
        let mut i = 0;
        while i + LANES <= count {
            let $a: $vec = $load((p.add(i) as *const u32).cast());
            $store(p.add(i).cast(), $vop);
            i += LANES;
        }
        scalar::unary_unrolled4(&mut $buf[i..], |$x| $sop);
    }};
}

macro_rules! x86_kernels {
    (
        mod $module:ident,
        feature = $feature:literal,
        vector = $vec:ty,
        load = $load:path,
        store = $store:path,
        splat = $splat:path,
        and = $and:path,
        or = $or:path,
        xor = $xor:path,
        andnot = $andnot:path $(,)?
    ) => {
        pub(crate) mod $module {
            use super::*;

            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn and(dst: &mut [u32], src: &[u32]) {
                vector_binary!(dst, src, $vec, $load, $store, |a, b| $and(a, b), |x, y| x & y);
            }

            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn or(dst: &mut [u32], src: &[u32]) {
                vector_binary!(dst, src, $vec, $load, $store, |a, b| $or(a, b), |x, y| x | y);
            }

            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn xor(dst: &mut [u32], src: &[u32]) {
                vector_binary!(dst, src, $vec, $load, $store, |a, b| $xor(a, b), |x, y| x ^ y);
            }

            // andnot computes `!first & second`, so the source goes first.
            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn and_not(dst: &mut [u32], src: &[u32]) {
                vector_binary!(dst, src, $vec, $load, $store, |a, b| $andnot(b, a), |x, y| x & !y);
            }

            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn not(buf: &mut [u32]) {
                let ones: $vec = $splat(-1);
                vector_unary!(buf, $vec, $load, $store, |a| $xor(a, ones), |x| !x);
            }

            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn fill(buf: &mut [u32], value: u32) {
                let splat: $vec = $splat(value as i32);
                let count = buf.len();
                let p = buf.as_mut_ptr();
                let lanes = core::mem::size_of::<$vec>() / core::mem::size_of::<u32>();
                let mut i = 0;
                while i + lanes <= count {
                    $store(p.add(i).cast(), splat);
                    i += lanes;
                }
                scalar::unary_unrolled4(&mut buf[i..], |_| value);
            }
        }
    };
}

x86_kernels! {
    mod sse2,
    feature = "sse2",
    vector = __m128i,
    load = _mm_loadu_si128,
    store = _mm_storeu_si128,
    splat = _mm_set1_epi32,
    and = _mm_and_si128,
    or = _mm_or_si128,
    xor = _mm_xor_si128,
    andnot = _mm_andnot_si128,
}

x86_kernels! {
    mod avx2,
    feature = "avx2",
    vector = __m256i,
    load = _mm256_loadu_si256,
    store = _mm256_storeu_si256,
    splat = _mm256_set1_epi32,
    and = _mm256_and_si256,
    or = _mm256_or_si256,
    xor = _mm256_xor_si256,
    andnot = _mm256_andnot_si256,
}

#[cfg(feature = "avx512")]
x86_kernels! {
    mod avx512,
    feature = "avx512f",
    vector = __m512i,
    load = _mm512_loadu_si512,
    store = _mm512_storeu_si512,
    splat = _mm512_set1_epi32,
    and = _mm512_and_si512,
    or = _mm512_or_si512,
    xor = _mm512_xor_si512,
    andnot = _mm512_andnot_si512,
}
