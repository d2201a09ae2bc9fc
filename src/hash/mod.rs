//! Hashing - Marvin32 over byte spans plus seed management
//!
//! Design: three pieces:
//! 1. `marvin` - the one-shot functions and the incremental hasher
//! 2. `seed` - the once-initialized process default seed
//! 3. `key` - closed `HashKey` set mapping keys to 32-bit codes
//!
//! Marvin is not cryptographic. The seed only makes collisions hard to
//! predict for someone who cannot observe it.

pub mod key;
pub mod marvin;
pub mod seed;


pub use key::HashKey;
pub use marvin::{hash32, hash64, Marvin};
pub use seed::{default_seed, is_default_seed_set, set_default_seed};

/// 32-bit Marvin hash of `data` under the default seed.
#[inline]
pub fn hash32_default(data: &[u8]) -> i32 {
    hash32(data, default_seed())
}

/// Hash codes for a batch of keys, ready for the frozen index builder.
pub fn hash_codes<'a, I, K>(keys: I, seed: u64) -> Vec<i32>
where
    I: IntoIterator<Item = K>,
    K: Into<HashKey<'a>>,
{
    keys.into_iter()
        .map(|key| key.into().hash_code(seed))
        .collect()
}
