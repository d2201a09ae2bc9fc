//! Vectorized word operations - bulk AND/OR/XOR/NOT/fill over `u32` buffers
//!
//! Design: Capability-probed strategy, selected once:
//! 1. Small buffers (`<= 7` words) take a straight-line cascade
//! 2. Larger buffers go through a [`Kernel`] table for the widest
//!    vector width the host supports (512/256/128-bit or scalar)
//! 3. The chosen level is cached in an atomic on first use
//!
//! The cache is a read-mostly flag: racing writers all store the same
//! probed value, so no ordering beyond `Relaxed` is needed.
//!
//! Kernels never allocate. Destination buffers are mutated in place;
//! sources are read-only.

mod scalar;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod x86;


use crate::errors::{CoreError, Result};
use crate::logging::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

pub(crate) use scalar::SMALL_MAX;

/// Vector width a kernel runs at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdLevel {
    /// Unrolled scalar loops only.
    Scalar,
    /// x86_64 SSE2, 128-bit lanes.
    Sse2,
    /// x86_64 AVX2, 256-bit lanes.
    Avx2,
    /// x86_64 AVX-512F, 512-bit lanes (requires the `avx512` feature).
    Avx512,
    /// aarch64 NEON, 128-bit lanes.
    Neon,
}

impl SimdLevel {
    /// Widest level this host can run.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            #[cfg(feature = "avx512")]
            {
                if is_x86_feature_detected!("avx512f") {
                    return SimdLevel::Avx512;
                }
            }
            if is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx2;
            }
            if is_x86_feature_detected!("sse2") {
                return SimdLevel::Sse2;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                return SimdLevel::Neon;
            }
        }

        SimdLevel::Scalar
    }

    /// True when kernels for this level are compiled in and the CPU has
    /// the instructions.
    pub fn is_supported(self) -> bool {
        match self {
            SimdLevel::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse2 => is_x86_feature_detected!("sse2"),
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdLevel::Avx512 => is_x86_feature_detected!("avx512f"),
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => std::arch::is_aarch64_feature_detected!("neon"),
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    /// Lane width in bits; 32 for scalar.
    pub fn lane_bits(self) -> u32 {
        match self {
            SimdLevel::Scalar => 32,
            SimdLevel::Sse2 | SimdLevel::Neon => 128,
            SimdLevel::Avx2 => 256,
            SimdLevel::Avx512 => 512,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SimdLevel::Scalar => "scalar",
            SimdLevel::Sse2 => "sse2",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Avx512 => "avx512",
            SimdLevel::Neon => "neon",
        }
    }

    fn to_tag(self) -> u8 {
        match self {
            SimdLevel::Scalar => 1,
            SimdLevel::Sse2 => 2,
            SimdLevel::Avx2 => 3,
            SimdLevel::Avx512 => 4,
            SimdLevel::Neon => 5,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(SimdLevel::Scalar),
            2 => Some(SimdLevel::Sse2),
            3 => Some(SimdLevel::Avx2),
            4 => Some(SimdLevel::Avx512),
            5 => Some(SimdLevel::Neon),
            _ => None,
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type BinaryFn = unsafe fn(&mut [u32], &[u32]);
type UnaryFn = unsafe fn(&mut [u32]);
type FillFn = unsafe fn(&mut [u32], u32);

/// Function pointer table for one vector width
///
/// # Safety
/// Entries may require CPU features; a table is only reachable through
/// [`kernel_for`], which is only called for supported levels.
struct Kernel {
    and: BinaryFn,
    or: BinaryFn,
    xor: BinaryFn,
    and_not: BinaryFn,
    not: UnaryFn,
    fill: FillFn,
}

static SCALAR_KERNEL: Kernel = Kernel {
    and: scalar::and,
    or: scalar::or,
    xor: scalar::xor,
    and_not: scalar::and_not,
    not: scalar::not,
    fill: scalar::fill,
};

#[cfg(target_arch = "x86_64")]
static SSE2_KERNEL: Kernel = Kernel {
    and: x86::sse2::and,
    or: x86::sse2::or,
    xor: x86::sse2::xor,
    and_not: x86::sse2::and_not,
    not: x86::sse2::not,
    fill: x86::sse2::fill,
};

#[cfg(target_arch = "x86_64")]
static AVX2_KERNEL: Kernel = Kernel {
    and: x86::avx2::and,
    or: x86::avx2::or,
    xor: x86::avx2::xor,
    and_not: x86::avx2::and_not,
    not: x86::avx2::not,
    fill: x86::avx2::fill,
};

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
static AVX512_KERNEL: Kernel = Kernel {
    and: x86::avx512::and,
    or: x86::avx512::or,
    xor: x86::avx512::xor,
    and_not: x86::avx512::and_not,
    not: x86::avx512::not,
    fill: x86::avx512::fill,
};

#[cfg(target_arch = "aarch64")]
static NEON_KERNEL: Kernel = Kernel {
    and: neon::and,
    or: neon::or,
    xor: neon::xor,
    and_not: neon::and_not,
    not: neon::not,
    fill: neon::fill,
};

fn kernel_for(level: SimdLevel) -> Option<&'static Kernel> {
    match level {
        SimdLevel::Scalar => Some(&SCALAR_KERNEL),
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Sse2 => Some(&SSE2_KERNEL),
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 => Some(&AVX2_KERNEL),
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdLevel::Avx512 => Some(&AVX512_KERNEL),
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon => Some(&NEON_KERNEL),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// 0 = not probed yet, otherwise a `SimdLevel` tag.
static ACTIVE_LEVEL: AtomicU8 = AtomicU8::new(0);

/// The level the free functions dispatch to, probing on first use.
pub fn active_level() -> SimdLevel {
    if let Some(level) = SimdLevel::from_tag(ACTIVE_LEVEL.load(Ordering::Relaxed)) {
        return level;
    }
    let level = SimdLevel::detect();
    ACTIVE_LEVEL.store(level.to_tag(), Ordering::Relaxed);
    debug!(target: "simd", level = %level, lane_bits = level.lane_bits(), "word kernel selected");
    level
}

/// Pin the level used by the free functions.
///
/// Fails with [`CoreError::UnsupportedSimdLevel`] instead of falling back
/// when the host cannot run `level`.
pub fn pin_level(level: SimdLevel) -> Result<()> {
    if !level.is_supported() || kernel_for(level).is_none() {
        return Err(CoreError::UnsupportedSimdLevel { level: level.name() });
    }
    ACTIVE_LEVEL.store(level.to_tag(), Ordering::Relaxed);
    debug!(target: "simd", level = %level, "word kernel pinned");
    Ok(())
}

/// Dispatcher bound to one vector width
///
/// All operations act on `dst.len()` (or `buf.len()`) words. Binary
/// operations panic if `src` is shorter than `dst`; that single check is
/// what keeps the vector loads in bounds.
#[derive(Clone, Copy)]
pub struct WordOps {
    level: SimdLevel,
    kernel: &'static Kernel,
}

impl fmt::Debug for WordOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordOps").field("level", &self.level).finish()
    }
}

impl WordOps {
    /// Dispatcher for the cached process-wide level.
    pub fn active() -> Self {
        let level = active_level();
        match kernel_for(level) {
            Some(kernel) => Self { level, kernel },
            None => Self::scalar(),
        }
    }

    /// Dispatcher for an explicit level.
    pub fn with_level(level: SimdLevel) -> Result<Self> {
        if !level.is_supported() {
            return Err(CoreError::UnsupportedSimdLevel { level: level.name() });
        }
        let kernel =
            kernel_for(level).ok_or(CoreError::UnsupportedSimdLevel { level: level.name() })?;
        Ok(Self { level, kernel })
    }

    pub fn scalar() -> Self {
        Self {
            level: SimdLevel::Scalar,
            kernel: &SCALAR_KERNEL,
        }
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }

    /// `dst[i] &= src[i]`
    #[inline]
    pub fn and(&self, dst: &mut [u32], src: &[u32]) {
        let src = &src[..dst.len()];
        if dst.len() <= SMALL_MAX {
            scalar::binary_cascade(dst, src, |a, b| a & b);
            return;
        }
        // SAFETY: the kernel was selected for a supported level and
        // `src` covers every word of `dst`.
        unsafe { (self.kernel.and)(dst, src) }
    }

    /// `dst[i] |= src[i]`
    #[inline]
    pub fn or(&self, dst: &mut [u32], src: &[u32]) {
        let src = &src[..dst.len()];
        if dst.len() <= SMALL_MAX {
            scalar::binary_cascade(dst, src, |a, b| a | b);
            return;
        }
        // SAFETY: see `and`.
        unsafe { (self.kernel.or)(dst, src) }
    }

    /// `dst[i] ^= src[i]`
    #[inline]
    pub fn xor(&self, dst: &mut [u32], src: &[u32]) {
        let src = &src[..dst.len()];
        if dst.len() <= SMALL_MAX {
            scalar::binary_cascade(dst, src, |a, b| a ^ b);
            return;
        }
        // SAFETY: see `and`.
        unsafe { (self.kernel.xor)(dst, src) }
    }

    /// `dst[i] &= !src[i]`
    #[inline]
    pub fn and_not(&self, dst: &mut [u32], src: &[u32]) {
        let src = &src[..dst.len()];
        if dst.len() <= SMALL_MAX {
            scalar::binary_cascade(dst, src, |a, b| a & !b);
            return;
        }
        // SAFETY: see `and`.
        unsafe { (self.kernel.and_not)(dst, src) }
    }

    /// `buf[i] = !buf[i]`
    #[inline]
    pub fn not(&self, buf: &mut [u32]) {
        if buf.len() <= SMALL_MAX {
            scalar::unary_cascade(buf, |a| !a);
            return;
        }
        // SAFETY: the kernel was selected for a supported level.
        unsafe { (self.kernel.not)(buf) }
    }

    /// `buf[i] = value`
    #[inline]
    pub fn fill(&self, buf: &mut [u32], value: u32) {
        if buf.len() <= SMALL_MAX {
            scalar::unary_cascade(buf, |_| value);
            return;
        }
        // SAFETY: the kernel was selected for a supported level.
        unsafe { (self.kernel.fill)(buf, value) }
    }

    /// Number of set bits across `words`.
    #[inline]
    pub fn pop_count(&self, words: &[u32]) -> u64 {
        scalar::pop_count(words)
    }
}

impl Default for WordOps {
    fn default() -> Self {
        Self::active()
    }
}

/// `dst[i] &= src[i]` at the active level.
#[inline]
pub fn and(dst: &mut [u32], src: &[u32]) {
    WordOps::active().and(dst, src)
}

/// `dst[i] |= src[i]` at the active level.
#[inline]
pub fn or(dst: &mut [u32], src: &[u32]) {
    WordOps::active().or(dst, src)
}

/// `dst[i] ^= src[i]` at the active level.
#[inline]
pub fn xor(dst: &mut [u32], src: &[u32]) {
    WordOps::active().xor(dst, src)
}

/// `dst[i] &= !src[i]` at the active level.
#[inline]
pub fn and_not(dst: &mut [u32], src: &[u32]) {
    WordOps::active().and_not(dst, src)
}

/// `buf[i] = !buf[i]` at the active level.
#[inline]
pub fn not(buf: &mut [u32]) {
    WordOps::active().not(buf)
}

/// `buf[i] = value` at the active level.
#[inline]
pub fn fill(buf: &mut [u32], value: u32) {
    WordOps::active().fill(buf, value)
}

#[inline]
pub fn pop_count(words: &[u32]) -> u64 {
    scalar::pop_count(words)
}
