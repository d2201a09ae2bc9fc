//! Owned aligned block - RAII wrapper released on drop

use super::AlignedAllocator;
use core::fmt;
use core::ptr::NonNull;

/// Zero-initialized aligned byte block owned by one allocator
///
/// Dropping the block returns it to the allocator that produced it.
pub struct AlignedBlock<'a> {
    allocator: &'a AlignedAllocator,
    ptr: NonNull<u8>,
    len: usize,
    alignment: usize,
}

// SAFETY: the block is uniquely owned and the allocator only touches
// atomics when freeing.
unsafe impl Send for AlignedBlock<'_> {}
unsafe impl Sync for AlignedBlock<'_> {}

impl<'a> AlignedBlock<'a> {
    /// # Safety
    /// `ptr` must be a live, initialized block of at least `len` bytes from
    /// `allocator`, not owned by anything else.
    pub(crate) unsafe fn from_raw_parts(
        allocator: &'a AlignedAllocator,
        ptr: NonNull<u8>,
        len: usize,
        alignment: usize,
    ) -> Self {
        Self { allocator, ptr, len, alignment }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: initialized at construction, owned for 'self.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Give up ownership; the caller must pass the pointer to `free`.
    pub fn into_raw(self) -> NonNull<u8> {
        let ptr = self.ptr;
        core::mem::forget(self);
        ptr
    }
}

impl Drop for AlignedBlock<'_> {
    fn drop(&mut self) {
        // SAFETY: the block owns a live pointer from this allocator.
        unsafe { self.allocator.free(self.ptr.as_ptr()) }
    }
}

impl fmt::Debug for AlignedBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .finish()
    }
}
