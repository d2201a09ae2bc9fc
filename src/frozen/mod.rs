//! Frozen hash index - build once, query read-only
//!
//! Design: Two-phase build:
//! 1. Sizing (`sizing`) - pick a prime bucket count under a collision budget
//! 2. Materialization - chain items per bucket, then flatten the chains
//!    into one cache-line aligned block: `[Bucket; B]` followed by the
//!    hash codes grouped by bucket
//!
//! A query is one fast modulo plus one bucket read. The index narrows
//! candidates by hash code only; callers compare their full keys across
//! the returned range.

pub mod pool;
pub mod primes;
pub mod sizing;

#[cfg(test)]
mod tests;

use crate::allocator::{self, AlignedBlock};
use crate::bits::{compute_multiplier, fast_mod};
use crate::errors::{CoreError, Result};
use crate::logging::{log_index_built, perf};
use core::fmt;
use core::mem::size_of;
use core::ops::Range;

pub use sizing::calc_num_buckets;

/// Alignment of the combined bucket/code block
pub const CACHE_LINE: usize = 64;

/// Contiguous run of the ordered codes sharing one bucket
///
/// Empty buckets are `(0, 0)`, so their `end_index` is `-1`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    pub start_index: i32,
    pub count: i32,
}

impl Bucket {
    /// Inclusive last index; below `start_index` when empty.
    #[inline]
    pub const fn end_index(&self) -> i32 {
        self.start_index + self.count - 1
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        let start = self.start_index as usize;
        start..start + self.count as usize
    }
}

/// Immutable hash-code index over one owned aligned block
pub struct FrozenHashIndex {
    storage: AlignedBlock<'static>,
    bucket_count: u32,
    multiplier: u64,
    len: usize,
}

impl FrozenHashIndex {
    /// Build an index over `hash_codes`.
    ///
    /// `hash_codes_are_unique` skips the distinct pass during sizing; it is
    /// a promise, not something the builder checks.
    pub fn build(hash_codes: &[i32], hash_codes_are_unique: bool) -> Result<Self> {
        Self::build_with_mapping(hash_codes, hash_codes_are_unique, |_, _| {})
    }

    /// Build and report where each input landed.
    ///
    /// `mapping(dest, src)` is called once per input with its position in
    /// the ordered codes and its original position, so callers can lay
    /// out keys and values in the same order.
    pub fn build_with_mapping<F>(
        hash_codes: &[i32],
        hash_codes_are_unique: bool,
        mut mapping: F,
    ) -> Result<Self>
    where
        F: FnMut(usize, usize),
    {
        let _timer = perf::track("frozen_build");

        let len = hash_codes.len();
        if i32::try_from(len).is_err() {
            return Err(CoreError::CapacityOverflow { requested: len as i64 });
        }

        let bucket_count = calc_num_buckets(hash_codes, hash_codes_are_unique)?;
        let multiplier = compute_multiplier(bucket_count);
        let buckets_len = bucket_count as usize;

        let bucket_bytes = buckets_len * size_of::<Bucket>();
        let total_bytes = len
            .checked_mul(size_of::<i32>())
            .and_then(|code_bytes| code_bytes.checked_add(bucket_bytes))
            .ok_or(CoreError::CapacityOverflow { requested: len as i64 })?;

        // Heads first, then one next link per item; -1 ends a chain.
        let mut scratch = pool::rent::<i32>(buckets_len + len);
        let (heads, next) = scratch.split_at_mut(buckets_len);
        heads.fill(-1);
        for (index, &code) in hash_codes.iter().enumerate() {
            let bucket = fast_mod(code as u32, bucket_count, multiplier) as usize;
            next[index] = heads[bucket];
            heads[bucket] = index as i32;
        }

        // Zeroed storage already holds (0, 0) for every empty bucket.
        let mut storage = allocator::global().alloc_block(total_bytes, CACHE_LINE)?;
        let base = storage.as_mut_ptr();
        // SAFETY: the block holds `buckets_len` buckets followed by `len`
        // codes; both regions are disjoint and suitably aligned since the
        // block is cache-line aligned and buckets are 8 bytes each.
        let (buckets, codes) = unsafe {
            (
                core::slice::from_raw_parts_mut(base.cast::<Bucket>(), buckets_len),
                core::slice::from_raw_parts_mut(base.add(bucket_bytes).cast::<i32>(), len),
            )
        };

        let mut dest = 0usize;
        for (bucket, &head) in heads.iter().enumerate() {
            if head < 0 {
                continue;
            }
            let start = dest;
            let mut cursor = head;
            while cursor >= 0 {
                let src = cursor as usize;
                codes[dest] = hash_codes[src];
                mapping(dest, src);
                dest += 1;
                cursor = next[src];
            }
            buckets[bucket] = Bucket {
                start_index: start as i32,
                count: (dest - start) as i32,
            };
        }
        debug_assert_eq!(dest, len);

        log_index_built(len, bucket_count);
        Ok(Self {
            storage,
            bucket_count,
            multiplier,
            len,
        })
    }

    /// Positions in [`FrozenHashIndex::hash_codes`] that may hold `hash_code`.
    #[inline]
    pub fn find_range(&self, hash_code: i32) -> Range<usize> {
        self.bucket_for(hash_code).range()
    }

    /// Bucket that `hash_code` maps to.
    #[inline]
    pub fn bucket_for(&self, hash_code: i32) -> Bucket {
        let bucket = fast_mod(hash_code as u32, self.bucket_count, self.multiplier) as usize;
        self.buckets()[bucket]
    }

    /// Positions whose stored code equals `hash_code`.
    pub fn matching_indices(&self, hash_code: i32) -> impl Iterator<Item = usize> + '_ {
        let codes = self.hash_codes();
        self.find_range(hash_code)
            .filter(move |&index| codes[index] == hash_code)
    }

    /// Codes grouped by bucket, in ascending bucket order.
    #[inline]
    pub fn hash_codes(&self) -> &[i32] {
        let offset = self.bucket_count as usize * size_of::<Bucket>();
        // SAFETY: layout established by build; the block lives as long as self.
        unsafe {
            core::slice::from_raw_parts(self.storage.as_ptr().add(offset).cast::<i32>(), self.len)
        }
    }

    #[inline]
    pub fn buckets(&self) -> &[Bucket] {
        unsafe {
            core::slice::from_raw_parts(
                self.storage.as_ptr().cast::<Bucket>(),
                self.bucket_count as usize,
            )
        }
    }

    #[inline]
    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    #[inline]
    pub fn fast_mod_multiplier(&self) -> u64 {
        self.multiplier
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Release the backing block now rather than at scope end.
    pub fn dispose(self) {
        drop(self);
    }
}

impl fmt::Debug for FrozenHashIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenHashIndex")
            .field("len", &self.len)
            .field("bucket_count", &self.bucket_count)
            .finish()
    }
}
