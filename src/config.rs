//! Runtime configuration - seed, SIMD level and logging from TOML or env
//!
//! ```toml
//! [hash]
//! seed = "0x004fb61a001bdbcc"   # or a plain integer
//!
//! [simd]
//! level = "auto"                # auto | scalar | sse2 | avx2 | avx512 | neon
//!
//! [logging]
//! level = "debug"
//! json = false
//! file = "unmanaged_core.log"
//! ```

use crate::errors::{CoreError, Result};
use crate::hash::set_default_seed;
use crate::logging::{parse_level, LogConfig};
use crate::simd::{pin_level, SimdLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub hash: HashConfig,

    #[serde(default)]
    pub simd: SimdConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    /// Fixed default seed; random when absent.
    #[serde(default)]
    pub seed: Option<SeedSetting>,
}

/// Seed written as an integer or as a decimal / `0x` hex string
///
/// TOML integers stop at `i64::MAX`, so seeds with the top bit set have
/// to be written as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedSetting {
    Int(u64),
    Text(String),
}

impl SeedSetting {
    pub fn value(&self) -> Result<u64> {
        match self {
            SeedSetting::Int(seed) => Ok(*seed),
            SeedSetting::Text(text) => parse_seed(text),
        }
    }
}

fn parse_seed(text: &str) -> Result<u64> {
    let text = text.trim().replace('_', "");
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| CoreError::Config(format!("invalid seed {:?}: {}", text, e)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimdConfig {
    #[serde(default)]
    pub level: SimdSetting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdSetting {
    /// Probe the host on first use.
    #[default]
    Auto,
    Scalar,
    Sse2,
    Avx2,
    Avx512,
    Neon,
}

impl SimdSetting {
    /// Level to pin, `None` for auto-detection.
    pub fn level(self) -> Option<SimdLevel> {
        match self {
            SimdSetting::Auto => None,
            SimdSetting::Scalar => Some(SimdLevel::Scalar),
            SimdSetting::Sse2 => Some(SimdLevel::Sse2),
            SimdSetting::Avx2 => Some(SimdLevel::Avx2),
            SimdSetting::Avx512 => Some(SimdLevel::Avx512),
            SimdSetting::Neon => Some(SimdLevel::Neon),
        }
    }

    fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "auto" => Ok(SimdSetting::Auto),
            "scalar" => Ok(SimdSetting::Scalar),
            "sse2" => Ok(SimdSetting::Sse2),
            "avx2" => Ok(SimdSetting::Avx2),
            "avx512" => Ok(SimdSetting::Avx512),
            "neon" => Ok(SimdSetting::Neon),
            other => Err(CoreError::Config(format!("unknown SIMD level {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Tracing setup for this section; unset fields keep `LogConfig` defaults.
    pub fn to_log_config(&self) -> Result<LogConfig> {
        let mut config = LogConfig::default();
        if let Some(name) = &self.level {
            config.level = parse_level(name)
                .ok_or_else(|| CoreError::Config(format!("unknown log level {:?}", name)))?;
        }
        config.json_format = self.json;
        if let Some(path) = &self.file {
            config.file_output = true;
            config.log_path = Some(path.clone());
        }
        Ok(config)
    }
}

impl CoreConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `UNMANAGED_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay values from `lookup`, which maps variable names to values.
    ///
    /// Reads `UNMANAGED_HASH_SEED`, `UNMANAGED_SIMD_LEVEL`,
    /// `UNMANAGED_LOG_LEVEL`, `UNMANAGED_LOG_JSON` and `UNMANAGED_LOG_FILE`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("UNMANAGED_HASH_SEED") {
            self.hash.seed = Some(SeedSetting::Int(parse_seed(&seed)?));
        }
        if let Some(level) = lookup("UNMANAGED_SIMD_LEVEL") {
            self.simd.level = SimdSetting::parse(&level)?;
        }
        if let Some(level) = lookup("UNMANAGED_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
        if let Some(json) = lookup("UNMANAGED_LOG_JSON") {
            self.logging.json = matches!(json.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(file) = lookup("UNMANAGED_LOG_FILE") {
            self.logging.file = Some(file);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if let Some(seed) = &self.hash.seed {
            seed.value()?;
        }
        self.logging.to_log_config()?;
        Ok(())
    }

    /// Install the seed override and pinned SIMD level.
    ///
    /// The seed can only be fixed before the first hash under the default
    /// seed; a conflicting later value fails with `SeedAlreadySet`.
    pub fn apply(&self) -> Result<()> {
        if let Some(seed) = &self.hash.seed {
            set_default_seed(seed.value()?)?;
        }
        if let Some(level) = self.simd.level.level() {
            pin_level(level)?;
        }
        Ok(())
    }
}
