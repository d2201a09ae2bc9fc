//! Aligned allocator - power-of-two aligned blocks with O(1) free
//!
//! Design: Every block is one padded request to the system heap:
//! 1. Request `byte_count + alignment - 1 + HEADER_SIZE` raw bytes
//! 2. Round `raw + HEADER_SIZE` up to the alignment
//! 3. Store the raw handle in the 16 bytes just below the result
//!
//! Freeing reads the handle back, so callers never pass sizes or
//! alignments to `free`. Statistics are relaxed atomics; no locks.

mod block;
mod header;


pub use block::AlignedBlock;
pub use header::{BlockHeader, HEADER_SIZE};

use crate::bits::is_power_of_two;
use crate::errors::{CoreError, Result};
use crate::logging::{log_allocation, log_deallocation};
use core::ptr::{self, NonNull};
use header::{aligned_address, raw_size_for, RAW_ALIGN};
use std::alloc::{self as heap, Layout};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static GLOBAL: AlignedAllocator = AlignedAllocator::new();

/// Process-wide allocator used by the free functions and the frozen index
#[inline]
pub fn global() -> &'static AlignedAllocator {
    &GLOBAL
}

/// Aligned allocator with live-block accounting
#[derive(Debug, Default)]
pub struct AlignedAllocator {
    live_blocks: AtomicUsize,
    live_bytes: AtomicUsize,
    total_allocations: AtomicU64,
    total_frees: AtomicU64,
}

impl AlignedAllocator {
    pub const fn new() -> Self {
        Self {
            live_blocks: AtomicUsize::new(0),
            live_bytes: AtomicUsize::new(0),
            total_allocations: AtomicU64::new(0),
            total_frees: AtomicU64::new(0),
        }
    }

    /// Allocate `byte_count` uninitialized bytes at `alignment`.
    pub fn alloc(&self, byte_count: usize, alignment: usize) -> Result<NonNull<u8>> {
        self.alloc_inner(byte_count, alignment, false)
    }

    /// Allocate `byte_count` zeroed bytes at `alignment`.
    pub fn alloc_zeroed(&self, byte_count: usize, alignment: usize) -> Result<NonNull<u8>> {
        self.alloc_inner(byte_count, alignment, true)
    }

    fn alloc_inner(&self, byte_count: usize, alignment: usize, zeroed: bool) -> Result<NonNull<u8>> {
        if !is_power_of_two(alignment as u64) {
            return Err(CoreError::InvalidAlignment { alignment });
        }

        let overflow = || CoreError::CapacityOverflow {
            requested: i64::try_from(byte_count).unwrap_or(i64::MAX),
        };
        let raw_size = raw_size_for(byte_count, alignment).ok_or_else(overflow)?;
        let layout = Layout::from_size_align(raw_size, RAW_ALIGN).map_err(|_| overflow())?;

        // Only the user region needs zeroing; padding and header are
        // overwritten or never read.
        let raw = unsafe { heap::alloc(layout) };
        if raw.is_null() {
            return Err(CoreError::OutOfMemory { byte_count, alignment });
        }

        let aligned = aligned_address(raw as usize, alignment);
        let offset = aligned - raw as usize;
        debug_assert!(offset >= HEADER_SIZE && offset + byte_count <= raw_size);

        // SAFETY: offset + byte_count stays inside the raw block and the
        // header slot lies between raw and aligned.
        let aligned = unsafe {
            let aligned = raw.add(offset);
            BlockHeader { raw, raw_size }.write_below(aligned);
            if zeroed {
                ptr::write_bytes(aligned, 0, byte_count);
            }
            NonNull::new_unchecked(aligned)
        };

        self.live_blocks.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(raw_size, Ordering::Relaxed);
        self.total_allocations.fetch_add(1, Ordering::Relaxed);
        log_allocation(byte_count, alignment, aligned.as_ptr());

        Ok(aligned)
    }

    /// Release a block from [`AlignedAllocator::alloc`]. Null is a no-op.
    ///
    /// # Safety
    /// `ptr` must be null or a live pointer returned by this allocator.
    /// Freeing twice or freeing a foreign pointer is undefined behaviour.
    pub unsafe fn free(&self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }

        let header = BlockHeader::from_aligned(ptr);
        debug_assert!(
            (header.raw as usize) + HEADER_SIZE <= ptr as usize
                && (ptr as usize) <= header.raw as usize + header.raw_size,
            "pointer was not produced by the aligned allocator"
        );

        heap::dealloc(header.raw, header.layout());

        self.live_blocks.fetch_sub(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(header.raw_size, Ordering::Relaxed);
        self.total_frees.fetch_add(1, Ordering::Relaxed);
        log_deallocation(ptr, header.raw_size);
    }

    /// Move a block into a new allocation of `new_byte_count` bytes.
    ///
    /// The first `min(old, new)` bytes are preserved, where `old` is the
    /// usable capacity recorded for the block. A null `ptr` behaves like
    /// `alloc`. On error the original block is left untouched.
    ///
    /// # Safety
    /// Same contract as [`AlignedAllocator::free`].
    pub unsafe fn realloc(
        &self,
        ptr: *mut u8,
        new_byte_count: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>> {
        if ptr.is_null() {
            return self.alloc(new_byte_count, alignment);
        }

        let old_capacity = BlockHeader::from_aligned(ptr).capacity_from(ptr);
        let fresh = self.alloc(new_byte_count, alignment)?;
        ptr::copy_nonoverlapping(ptr, fresh.as_ptr(), old_capacity.min(new_byte_count));
        self.free(ptr);
        Ok(fresh)
    }

    /// Owned zeroed block released on drop.
    pub fn alloc_block(&self, byte_count: usize, alignment: usize) -> Result<AlignedBlock<'_>> {
        let ptr = self.alloc_zeroed(byte_count, alignment)?;
        // SAFETY: fresh zeroed block of exactly these parameters.
        Ok(unsafe { AlignedBlock::from_raw_parts(self, ptr, byte_count, alignment) })
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            live_blocks: self.live_blocks.load(Ordering::Relaxed),
            live_bytes: self.live_bytes.load(Ordering::Relaxed),
            total_allocations: self.total_allocations.load(Ordering::Relaxed),
            total_frees: self.total_frees.load(Ordering::Relaxed),
        }
    }
}

/// Allocator statistics for monitoring and leak checks
///
/// `live_bytes` counts raw heap bytes, padding and headers included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    pub live_blocks: usize,
    pub live_bytes: usize,
    pub total_allocations: u64,
    pub total_frees: u64,
}

/// [`AlignedAllocator::alloc`] on the global allocator.
#[inline]
pub fn alloc(byte_count: usize, alignment: usize) -> Result<NonNull<u8>> {
    GLOBAL.alloc(byte_count, alignment)
}

/// [`AlignedAllocator::alloc_zeroed`] on the global allocator.
#[inline]
pub fn alloc_zeroed(byte_count: usize, alignment: usize) -> Result<NonNull<u8>> {
    GLOBAL.alloc_zeroed(byte_count, alignment)
}

/// # Safety
/// See [`AlignedAllocator::free`]; `ptr` must come from the global allocator.
#[inline]
pub unsafe fn free(ptr: *mut u8) {
    GLOBAL.free(ptr)
}

/// # Safety
/// See [`AlignedAllocator::realloc`]; `ptr` must come from the global allocator.
#[inline]
pub unsafe fn realloc(ptr: *mut u8, new_byte_count: usize, alignment: usize) -> Result<NonNull<u8>> {
    GLOBAL.realloc(ptr, new_byte_count, alignment)
}
