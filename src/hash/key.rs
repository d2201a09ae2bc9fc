//! Keys that can be turned into 32-bit hash codes
//!
//! Integer-like keys hash to a fixed mix of their bits and ignore the seed.
//! Byte, string and `Display` keys run through Marvin so an attacker who
//! does not know the seed cannot aim collisions at one bucket.

use super::marvin::Marvin;
use super::{default_seed, hash32};
use std::fmt::{self, Display, Write};

/// Closed set of key kinds accepted by the frozen index builders
#[derive(Clone, Copy)]
pub enum HashKey<'a> {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Bool(bool),
    Char(char),
    Bytes(&'a [u8]),
    Str(&'a str),
    /// Anything else, hashed through its `Display` text.
    Display(&'a dyn Display),
}

impl HashKey<'_> {
    /// Hash code under an explicit seed.
    pub fn hash_code(&self, seed: u64) -> i32 {
        match *self {
            HashKey::I32(v) => v,
            HashKey::U32(v) => v as i32,
            HashKey::I64(v) => fold64(v as u64),
            HashKey::U64(v) => fold64(v),
            HashKey::Bool(v) => i32::from(v),
            HashKey::Char(c) => c as i32,
            HashKey::Bytes(bytes) => hash32(bytes, seed),
            HashKey::Str(s) => hash32(s.as_bytes(), seed),
            HashKey::Display(value) => {
                let mut sink = MarvinWriter(Marvin::new(seed));
                // Writing into the hasher cannot fail; a Display impl that
                // reports an error still leaves whatever it wrote hashed.
                let _ = write!(sink, "{}", value);
                sink.0.finish32()
            }
        }
    }

    /// Hash code under the process-wide default seed.
    pub fn default_hash_code(&self) -> i32 {
        self.hash_code(default_seed())
    }
}

#[inline]
fn fold64(v: u64) -> i32 {
    (v as u32 ^ (v >> 32) as u32) as i32
}

struct MarvinWriter(Marvin);

impl Write for MarvinWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.update(s.as_bytes());
        Ok(())
    }
}

impl fmt::Debug for HashKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::I32(v) => f.debug_tuple("I32").field(v).finish(),
            HashKey::U32(v) => f.debug_tuple("U32").field(v).finish(),
            HashKey::I64(v) => f.debug_tuple("I64").field(v).finish(),
            HashKey::U64(v) => f.debug_tuple("U64").field(v).finish(),
            HashKey::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            HashKey::Char(v) => f.debug_tuple("Char").field(v).finish(),
            HashKey::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            HashKey::Str(v) => f.debug_tuple("Str").field(v).finish(),
            HashKey::Display(v) => f.debug_tuple("Display").field(&v.to_string()).finish(),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for HashKey<'_> {
                #[inline]
                fn from(value: $ty) -> Self {
                    HashKey::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    bool => Bool,
    char => Char,
}

impl<'a> From<&'a [u8]> for HashKey<'a> {
    fn from(value: &'a [u8]) -> Self {
        HashKey::Bytes(value)
    }
}

impl<'a> From<&'a str> for HashKey<'a> {
    fn from(value: &'a str) -> Self {
        HashKey::Str(value)
    }
}

impl<'a> From<&'a String> for HashKey<'a> {
    fn from(value: &'a String) -> Self {
        HashKey::Str(value.as_str())
    }
}
