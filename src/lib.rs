//! unmanaged-core - foundation layer for manually managed collections
//!
//! Three capabilities:
//! 1. `allocator` - power-of-two aligned blocks with O(1) free
//! 2. `frozen` - immutable, collision-minimizing hash-code index
//! 3. `bits` / `simd` / `hash` - bit primitives, width-adaptive word
//!    kernels and the seeded Marvin32 hash
//!
//! Ambient pieces (`errors`, `logging`, `config`) follow the same shape
//! everywhere: `CoreError` results, `tracing` events per subsystem, and one
//! TOML-or-env `CoreConfig` applied at startup through [`init`].

// Core modules
pub mod allocator;
pub mod bits;
pub mod frozen;
pub mod hash;
pub mod simd;

// Ambient modules
pub mod config;
pub mod errors;
pub mod logging;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used items
pub use allocator::{AlignedAllocator, AlignedBlock, AllocatorStats};
pub use bits::FastModulo;
pub use config::CoreConfig;
pub use errors::{CoreError, Result};
pub use frozen::{Bucket, FrozenHashIndex};
pub use hash::{default_seed, hash32, hash64, HashKey, Marvin};
pub use simd::{SimdLevel, WordOps};

/// Initialize logging and apply `config`
///
/// Logging is installed first so that seed and SIMD choices are traced.
/// Safe to call more than once; only the first logging setup takes effect.
pub fn init(config: &CoreConfig) -> Result<()> {
    logging::init_with_config(config.logging.to_log_config()?);
    logging::info!(target: "unmanaged_core", version = env!("CARGO_PKG_VERSION"), "initializing");
    config.apply()
}
