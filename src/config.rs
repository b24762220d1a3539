use crate::defaults;
use crate::error::{ChalkboardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub sync: SyncConfig,
    pub reveal: RevealConfig,
    pub graph: GraphConfig,
}

/// Audio playback timeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub lookahead_ms: u64,
}

/// Visual sync scheduler configuration (narration lead-time heuristic)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    pub early_phase_ms: u64,
    pub mid_phase_ms: u64,
    pub early_delay_ms: u64,
    pub mid_delay_ms: u64,
    pub default_delay_ms: u64,
    pub flush_base_ms: u64,
    pub flush_stagger_ms: u64,
    pub max_stagger_ms: u64,
}

/// Staged reveal controller configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    pub page_size: usize,
    pub min_reading_ms: u64,
    pub per_char_ms: u64,
    pub lead_in_ms: u64,
    pub grace_ms: u64,
}

/// Graph sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    pub samples: u32,
    pub magnitude_bound: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            lookahead_ms: defaults::LOOKAHEAD_MS,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            early_phase_ms: defaults::EARLY_PHASE_MS,
            mid_phase_ms: defaults::MID_PHASE_MS,
            early_delay_ms: defaults::EARLY_DELAY_MS,
            mid_delay_ms: defaults::MID_DELAY_MS,
            default_delay_ms: defaults::DEFAULT_DELAY_MS,
            flush_base_ms: defaults::FLUSH_BASE_MS,
            flush_stagger_ms: defaults::FLUSH_STAGGER_MS,
            max_stagger_ms: defaults::MAX_STAGGER_MS,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            min_reading_ms: defaults::MIN_READING_MS,
            per_char_ms: defaults::PER_CHAR_MS,
            lead_in_ms: defaults::LEAD_IN_MS,
            grace_ms: defaults::GRACE_MS,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            samples: defaults::GRAPH_SAMPLES,
            magnitude_bound: defaults::GRAPH_MAGNITUDE_BOUND,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - CHALKBOARD_SAMPLE_RATE → audio.sample_rate
    /// - CHALKBOARD_PAGE_SIZE → reveal.page_size
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(rate) = std::env::var("CHALKBOARD_SAMPLE_RATE")
            && let Ok(rate) = rate.parse::<u32>()
        {
            self.audio.sample_rate = rate;
        }

        if let Ok(size) = std::env::var("CHALKBOARD_PAGE_SIZE")
            && let Ok(size) = size.parse::<usize>()
        {
            self.reveal.page_size = size;
        }

        self
    }

    /// Validate configuration values that the schedulers divide by or index with.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(ChalkboardError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.reveal.page_size == 0 {
            return Err(ChalkboardError::ConfigInvalidValue {
                key: "reveal.page_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.graph.samples < 2 {
            return Err(ChalkboardError::ConfigInvalidValue {
                key: "graph.samples".to_string(),
                message: "need at least 2 sample points".to_string(),
            });
        }
        if self.sync.early_phase_ms >= self.sync.mid_phase_ms {
            return Err(ChalkboardError::ConfigInvalidValue {
                key: "sync.early_phase_ms".to_string(),
                message: "must be below sync.mid_phase_ms".to_string(),
            });
        }
        Ok(())
    }
}
