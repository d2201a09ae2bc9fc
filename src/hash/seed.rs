//! Process-wide default seed
//!
//! Drawn from `rand` on first use unless an override was installed first.
//! Once observed the seed never changes for the life of the process.

use crate::errors::{CoreError, Result};
use crate::logging::debug;
use once_cell::sync::OnceCell;

static DEFAULT_SEED: OnceCell<u64> = OnceCell::new();

/// Seed used when callers do not supply one.
#[inline]
pub fn default_seed() -> u64 {
    *DEFAULT_SEED.get_or_init(|| {
        let seed = rand::random::<u64>();
        debug!(target: "hash", "default seed generated");
        seed
    })
}

/// Fix the default seed before anything reads it.
///
/// Setting the value it already holds succeeds; any other value after the
/// seed was generated or set fails with [`CoreError::SeedAlreadySet`].
pub fn set_default_seed(seed: u64) -> Result<()> {
    match DEFAULT_SEED.set(seed) {
        Ok(()) => {
            debug!(target: "hash", seed, "default seed overridden");
            Ok(())
        }
        Err(_) if DEFAULT_SEED.get() == Some(&seed) => Ok(()),
        Err(_) => Err(CoreError::SeedAlreadySet),
    }
}

/// Whether the default seed has been fixed yet.
pub fn is_default_seed_set() -> bool {
    DEFAULT_SEED.get().is_some()
}
