//! Block header - raw allocation handle stored below each aligned pointer
//!
//! Layout: `[raw base .. padding .. header (16 bytes) | aligned data ..]`.
//! The header is read and written unaligned because the aligned pointer
//! may sit at any offset from the raw base when `alignment < 8`.

use std::alloc::Layout;

/// Bytes reserved directly below every aligned pointer
pub const HEADER_SIZE: usize = 16;

/// Alignment of the raw request handed to the system heap
pub(crate) const RAW_ALIGN: usize = core::mem::align_of::<usize>();

const _: () = assert!(core::mem::size_of::<BlockHeader>() <= HEADER_SIZE);

/// Raw allocation handle (C layout, two machine words)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub raw: *mut u8,
    pub raw_size: usize,
}

impl BlockHeader {
    /// Header address for an aligned data pointer.
    ///
    /// # Safety
    /// `aligned` must have at least `HEADER_SIZE` bytes of the same
    /// allocation below it.
    #[inline]
    pub unsafe fn slot(aligned: *mut u8) -> *mut BlockHeader {
        aligned.sub(HEADER_SIZE).cast()
    }

    /// Read the header stored below `aligned`.
    ///
    /// # Safety
    /// `aligned` must come from this allocator and not be freed yet.
    #[inline]
    pub unsafe fn from_aligned(aligned: *mut u8) -> Self {
        Self::slot(aligned).read_unaligned()
    }

    /// Store this header below `aligned`.
    ///
    /// # Safety
    /// Same as [`BlockHeader::slot`], and the slot must be writable.
    #[inline]
    pub unsafe fn write_below(self, aligned: *mut u8) {
        Self::slot(aligned).write_unaligned(self)
    }

    /// Layout the raw block was requested with.
    #[inline]
    pub fn layout(&self) -> Layout {
        // The same size and alignment already passed Layout validation
        // when the block was allocated.
        unsafe { Layout::from_size_align_unchecked(self.raw_size, RAW_ALIGN) }
    }

    /// Usable bytes from `aligned` to the end of the raw block.
    #[inline]
    pub fn capacity_from(&self, aligned: *const u8) -> usize {
        self.raw as usize + self.raw_size - aligned as usize
    }
}

/// Raw request size for a padded aligned block, `None` on overflow.
#[inline]
pub fn raw_size_for(byte_count: usize, alignment: usize) -> Option<usize> {
    byte_count
        .checked_add(alignment - 1)?
        .checked_add(HEADER_SIZE)
}

/// Lowest multiple of `alignment` at or above `raw + HEADER_SIZE`.
#[inline]
pub fn aligned_address(raw: usize, alignment: usize) -> usize {
    (raw + HEADER_SIZE + alignment - 1) & !(alignment - 1)
}
