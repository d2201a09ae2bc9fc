//! Scratch buffer pool - reusable transient arrays for index builds
//!
//! Builds rent a buffer, use it for one phase and hand it back when the
//! guard drops. Shelves are small and bounded; oversized buffers are
//! released to the heap instead of being kept around.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// Buffers kept per element type
const MAX_SHELVED: usize = 8;

/// Buffers above this many elements are never shelved
const MAX_SHELVED_LEN: usize = 1 << 20;

static WORD_SHELF: Lazy<Mutex<Vec<Vec<u32>>>> = Lazy::new(|| Mutex::new(Vec::new()));
static INT_SHELF: Lazy<Mutex<Vec<Vec<i32>>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Element types with a shared shelf
pub trait Pooled: Copy + Default + 'static {
    fn shelf() -> &'static Mutex<Vec<Vec<Self>>>;
}

impl Pooled for u32 {
    fn shelf() -> &'static Mutex<Vec<Vec<Self>>> {
        &WORD_SHELF
    }
}

impl Pooled for i32 {
    fn shelf() -> &'static Mutex<Vec<Vec<Self>>> {
        &INT_SHELF
    }
}

/// Rented buffer of exactly the requested length, default-filled
pub struct Rented<T: Pooled> {
    buf: Vec<T>,
}

/// Rent `len` elements, reusing a shelved buffer when one is big enough.
pub fn rent<T: Pooled>(len: usize) -> Rented<T> {
    let reused = {
        let mut shelf = T::shelf().lock();
        shelf
            .iter()
            .position(|buf| buf.capacity() >= len)
            .map(|idx| shelf.swap_remove(idx))
    };

    let mut buf = reused.unwrap_or_default();
    buf.clear();
    buf.resize(len, T::default());
    Rented { buf }
}

/// Number of buffers currently shelved for `T`.
pub fn shelved<T: Pooled>() -> usize {
    T::shelf().lock().len()
}

impl<T: Pooled> Deref for Rented<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T: Pooled> DerefMut for Rented<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T: Pooled> Drop for Rented<T> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        if buf.capacity() == 0 || buf.capacity() > MAX_SHELVED_LEN {
            return;
        }
        let mut shelf = T::shelf().lock();
        if shelf.len() < MAX_SHELVED {
            shelf.push(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rented_buffers_are_default_filled() {
        {
            let mut buf = rent::<i32>(16);
            buf.fill(-1);
        }
        let buf = rent::<i32>(16);
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&v| v == 0));
    }

    #[test]
    fn zero_length_rent_is_empty() {
        let buf = rent::<u32>(0);
        assert!(buf.is_empty());
    }

    #[test]
    fn shelf_stays_bounded() {
        let guards: Vec<_> = (0..MAX_SHELVED * 2).map(|_| rent::<u32>(4)).collect();
        drop(guards);
        assert!(shelved::<u32>() <= MAX_SHELVED);
    }
}
