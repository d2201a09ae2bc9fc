//! Logging infrastructure - structured tracing for allocator, index and kernels
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Per-subsystem targets (`allocator`, `frozen`, `simd`, `hash`)
//! - Zero-cost when disabled
//! - Optional JSON output and a non-blocking file writer
//! - Drop guards for timing hot operations

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub use tracing::{debug, error, info, trace, warn, Level};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the file writer thread alive for the life of the process
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

static TRACK_PERFORMANCE: AtomicBool = AtomicBool::new(false);

/// Event targets emitted by this crate
pub const TARGETS: [&str; 5] = ["unmanaged_core", "allocator", "frozen", "simd", "hash"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
    /// Enable performance tracking
    pub track_performance: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
            track_performance: cfg!(debug_assertions),
        }
    }
}

/// Parse a level name, case-insensitive. Unknown names yield `None`.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // UNMANAGED_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level) = std::env::var("UNMANAGED_LOG_LEVEL") {
            config.level = parse_level(&level).unwrap_or(Level::INFO);
        }

        // UNMANAGED_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("UNMANAGED_LOG_FILE") {
            config.file_output = true;
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("UNMANAGED_LOG_JSON").is_ok_and(|v| truthy(&v));
        config.show_spans = std::env::var("UNMANAGED_LOG_SPANS").is_ok_and(|v| truthy(&v));

        if let Ok(val) = std::env::var("UNMANAGED_LOG_PERF") {
            config.track_performance = truthy(&val);
        }

        config
    }

    /// Create high-performance config (errors only)
    pub fn performance() -> Self {
        Self {
            level: Level::ERROR,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
            track_performance: false,
        }
    }

    /// Create debug config (every allocation traced to a file)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            file_output: true,
            log_path: Some("unmanaged_core.log".to_string()),
            json_format: false,
            show_spans: true,
            track_performance: true,
        }
    }

    /// Filter directives enabling `level` for every crate target.
    pub fn filter_directives(&self) -> String {
        let level = self.level.as_str().to_lowercase();
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber. `RUST_LOG` overrides the
/// configured level when set. If another subscriber is already installed
/// globally it is left in place.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        TRACK_PERFORMANCE.store(config.track_performance, Ordering::Relaxed);

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let json_layer = config.json_format.then(|| {
            fmt::layer()
                .json()
                .with_writer(io::stdout)
                .with_span_events(span_events.clone())
                .with_target(true)
        });

        let text_layer = (!config.json_format).then(|| {
            fmt::layer()
                .with_writer(io::stdout)
                .with_span_events(span_events.clone())
                .with_target(true)
                .with_thread_ids(cfg!(debug_assertions))
                .with_line_number(cfg!(debug_assertions))
        });

        let file_layer = config
            .log_path
            .as_deref()
            .filter(|_| config.file_output)
            .map(|path| {
                let path = Path::new(path);
                let dir = path
                    .parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|name| name.to_os_string())
                    .unwrap_or_else(|| "unmanaged_core.log".into());
                let appender = tracing_appender::rolling::never(dir, file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_span_events(span_events.clone())
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .with(text_layer)
            .with(file_layer)
            .try_init()
            .ok(); // Another global subscriber may already own the process
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Subsystem logging functions
// ============================================================================

/// Log an aligned allocation
#[inline]
pub fn log_allocation(byte_count: usize, alignment: usize, ptr: *const u8) {
    trace!(
        target: "allocator",
        byte_count,
        alignment,
        address = ?ptr,
        "aligned block allocated"
    );
}

/// Log an aligned free
#[inline]
pub fn log_deallocation(ptr: *const u8, raw_size: usize) {
    trace!(
        target: "allocator",
        raw_size,
        address = ?ptr,
        "aligned block freed"
    );
}

/// Log a finished frozen index build
#[inline]
pub fn log_index_built(len: usize, bucket_count: u32) {
    debug!(
        target: "frozen",
        len,
        bucket_count,
        "frozen index built"
    );
}

/// Performance tracking utilities
pub mod perf {
    use super::TRACK_PERFORMANCE;
    use std::sync::atomic::Ordering;
    use std::time::Instant;
    use tracing::debug;

    /// Track operation duration (returns guard that logs on drop)
    ///
    /// Inert unless performance tracking was enabled at init.
    #[must_use]
    pub fn track(operation: &'static str) -> PerformanceGuard {
        PerformanceGuard {
            operation,
            start: TRACK_PERFORMANCE
                .load(Ordering::Relaxed)
                .then(Instant::now),
        }
    }

    pub struct PerformanceGuard {
        operation: &'static str,
        start: Option<Instant>,
    }

    impl PerformanceGuard {
        pub fn is_active(&self) -> bool {
            self.start.is_some()
        }
    }

    impl Drop for PerformanceGuard {
        fn drop(&mut self) {
            if let Some(start) = self.start {
                debug!(
                    target: "unmanaged_core",
                    operation = self.operation,
                    duration_us = start.elapsed().as_micros() as u64,
                    "operation completed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.file_output);

        let perf_config = LogConfig::performance();
        assert_eq!(perf_config.level, Level::ERROR);
        assert!(!perf_config.track_performance);

        let debug_config = LogConfig::debug();
        assert_eq!(debug_config.level, Level::TRACE);
        assert!(debug_config.log_path.is_some());
    }

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("TRACE"), Some(Level::TRACE));
        assert_eq!(parse_level(" warn "), Some(Level::WARN));
        assert_eq!(parse_level("warning"), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn directives_cover_every_target() {
        let config = LogConfig {
            level: Level::DEBUG,
            ..LogConfig::default()
        };
        let directives = config.filter_directives();
        for target in TARGETS {
            assert!(directives.contains(&format!("{}=debug", target)));
        }
    }

    #[test]
    fn test_init_idempotent() {
        init_with_config(LogConfig::performance());
        init_with_config(LogConfig::debug()); // Should not panic
        assert!(is_initialized());
    }

    #[test]
    fn perf_guard_drops_cleanly() {
        let guard = perf::track("unit");
        drop(guard);
    }
}
