//! Error types for the `unmanaged-core` crate

/// Errors surfaced by the allocator, the frozen index and configuration
///
/// Only contract violations and resource exhaustion are reported here.
/// Caller misuse (double free, foreign pointers, use after dispose) is
/// undefined behaviour and is never checked in release builds.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Requested alignment is zero or not a power of two.
    #[error("alignment {alignment} is not a power of two")]
    InvalidAlignment { alignment: usize },

    /// The underlying heap could not satisfy the padded request.
    #[error("out of memory allocating {byte_count} bytes at alignment {alignment}")]
    OutOfMemory { byte_count: usize, alignment: usize },

    /// A requested capacity is negative or cannot be represented.
    #[error("capacity {requested} overflows the supported range")]
    CapacityOverflow { requested: i64 },

    /// A SIMD level was pinned that this host cannot execute.
    #[error("SIMD level {level} is not supported on this host")]
    UnsupportedSimdLevel { level: &'static str },

    /// The process-wide default seed was already fixed.
    #[error("default hash seed was already initialized")]
    SeedAlreadySet,

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}
