//! Marvin32 - seeded streaming hash over byte spans
//!
//! Algorithm:
//! - Split the 64-bit seed into `p0` (low half) and `p1` (high half)
//! - Each 8-byte block adds two little-endian words into `p0`, mixing
//!   after each
//! - A 4..7 byte tail adds one more full word first
//! - The last 0..3 bytes are packed little-endian with a `0x80` byte right
//!   after them, added to `p0`, followed by two mixing rounds
//!
//! The byte packing is fixed regardless of host endianness so hash codes
//! stay compatible across machines and with other Marvin implementations.

use crate::bits::rotate_left32;
use std::hash::Hasher;

/// One Marvin mixing round.
#[inline(always)]
fn block(p0: &mut u32, p1: &mut u32) {
    let mut a = *p0;
    let mut b = *p1;

    b ^= a;
    a = rotate_left32(a, 20).wrapping_add(b);
    b = rotate_left32(b, 9) ^ a;
    a = rotate_left32(a, 27).wrapping_add(b);
    b = rotate_left32(b, 19);

    *p0 = a;
    *p1 = b;
}

#[inline(always)]
fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Final word for a 0..=3 byte remainder: the bytes little-endian, then
/// the `0x80` terminator in the next byte position.
#[inline(always)]
fn final_word(rest: &[u8]) -> u32 {
    debug_assert!(rest.len() < 4);
    let mut word = 0x80u32 << (rest.len() * 8);
    for (i, &byte) in rest.iter().enumerate() {
        word |= u32::from(byte) << (i * 8);
    }
    word
}

/// Core state shared by the one-shot functions and [`Marvin`].
#[inline]
fn compute(data: &[u8], seed: u64) -> (u32, u32) {
    let mut p0 = seed as u32;
    let mut p1 = (seed >> 32) as u32;

    let mut blocks = data.chunks_exact(8);
    for chunk in &mut blocks {
        p0 = p0.wrapping_add(read_u32(&chunk[..4]));
        block(&mut p0, &mut p1);
        p0 = p0.wrapping_add(read_u32(&chunk[4..]));
        block(&mut p0, &mut p1);
    }

    finish(blocks.remainder(), p0, p1)
}

#[inline(always)]
fn finish(mut rest: &[u8], mut p0: u32, mut p1: u32) -> (u32, u32) {
    debug_assert!(rest.len() < 8);
    if rest.len() >= 4 {
        p0 = p0.wrapping_add(read_u32(rest));
        block(&mut p0, &mut p1);
        rest = &rest[4..];
    }

    p0 = p0.wrapping_add(final_word(rest));
    block(&mut p0, &mut p1);
    block(&mut p0, &mut p1);
    (p0, p1)
}

/// 32-bit Marvin hash of `data` under `seed`.
#[inline]
pub fn hash32(data: &[u8], seed: u64) -> i32 {
    let (p0, p1) = compute(data, seed);
    (p1 ^ p0) as i32
}

/// 64-bit Marvin result `(p1 << 32) | p0`, the form published test
/// vectors use.
#[inline]
pub fn hash64(data: &[u8], seed: u64) -> u64 {
    let (p0, p1) = compute(data, seed);
    (u64::from(p1) << 32) | u64::from(p0)
}

/// Incremental Marvin hasher
///
/// Feeding bytes in any split produces the same value as the one-shot
/// functions over the concatenation. Partial blocks are buffered.
#[derive(Debug, Clone)]
pub struct Marvin {
    p0: u32,
    p1: u32,
    pending: [u8; 8],
    pending_len: usize,
}

impl Marvin {
    pub fn new(seed: u64) -> Self {
        Self {
            p0: seed as u32,
            p1: (seed >> 32) as u32,
            pending: [0; 8],
            pending_len: 0,
        }
    }

    /// Hasher keyed by [`super::default_seed`].
    pub fn with_default_seed() -> Self {
        Self::new(super::default_seed())
    }

    fn absorb_block(&mut self, chunk: &[u8]) {
        self.p0 = self.p0.wrapping_add(read_u32(&chunk[..4]));
        block(&mut self.p0, &mut self.p1);
        self.p0 = self.p0.wrapping_add(read_u32(&chunk[4..8]));
        block(&mut self.p0, &mut self.p1);
    }

    pub fn update(&mut self, mut data: &[u8]) {
        if self.pending_len > 0 {
            let take = (8 - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];
            if self.pending_len < 8 {
                return;
            }
            let pending = self.pending;
            self.absorb_block(&pending);
            self.pending_len = 0;
        }

        let mut blocks = data.chunks_exact(8);
        for chunk in &mut blocks {
            self.absorb_block(chunk);
        }
        let rest = blocks.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    /// 32-bit result; the hasher can keep absorbing afterwards.
    pub fn finish32(&self) -> i32 {
        let (p0, p1) = finish(&self.pending[..self.pending_len], self.p0, self.p1);
        (p1 ^ p0) as i32
    }

    pub fn finish64(&self) -> u64 {
        let (p0, p1) = finish(&self.pending[..self.pending_len], self.p0, self.p1);
        (u64::from(p1) << 32) | u64::from(p0)
    }
}

impl Hasher for Marvin {
    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    fn finish(&self) -> u64 {
        self.finish64()
    }
}
