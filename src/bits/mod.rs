//! Bit primitives - branch-minimal integer building blocks
//!
//! Design: Two layers:
//! 1. `primitives` - the public entry points, lowered to hardware
//!    instructions when the target advertises them
//! 2. `soft` - SWAR and De Bruijn fallbacks used everywhere else
//!
//! `fastmod` builds on these for division-free bucket selection.

pub mod fastmod;
pub mod primitives;
pub mod soft;

#[cfg(test)]
mod tests;

pub use fastmod::{compute_multiplier, fast_mod, FastModulo};
pub use primitives::*;
