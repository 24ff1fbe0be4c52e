//! Simulator configuration.
//!
//! Settings come from a JSON file with three optional sections, every key
//! defaulted, and are then overridden by CLI flags:
//!
//! ```json
//! {
//!   "simulator": { "default_rate": 10000, "max_workers": 50 },
//!   "message_generation": { "target_field_count": 100, "size_tolerance": 50 },
//!   "stock_symbols": { "default_symbols": ["AAPL", "MSFT"] }
//! }
//! ```

pub mod categories;
pub mod duration;

use anyhow::{bail, Context};
use loadtest_dispatch::{BatchConfig, DispatchConfig, RunSettings};
use loadtest_generator::GenerationSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub use categories::load_categories;
pub use duration::{parse_duration, parse_duration_to_secs};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Engine and batching knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    pub default_rate: u64,
    pub default_message_size: usize,
    pub max_workers: usize,
    pub min_batch_size: usize,
    pub max_batch_size: usize,
    /// Batch size for a worker with no rate share
    pub batch_size_per_1k_rate: usize,
    pub report_interval_secs: u64,
    pub error_backoff_ms: u64,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            default_rate: 10_000,
            default_message_size: 500,
            max_workers: 50,
            min_batch_size: 1,
            max_batch_size: 1000,
            batch_size_per_1k_rate: 100,
            report_interval_secs: 1,
            error_backoff_ms: 100,
        }
    }
}

/// Message shape knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageGenerationSection {
    pub target_field_count: usize,
    pub field_count_variance: usize,
    pub size_tolerance: usize,
    pub string_length_range: (usize, usize),
    pub number_range: (i64, i64),
    pub float_precision: u32,
}

impl Default for MessageGenerationSection {
    fn default() -> Self {
        let spec = GenerationSpec::default();
        Self {
            target_field_count: spec.target_field_count,
            field_count_variance: spec.field_count_variance,
            size_tolerance: spec.size_tolerance,
            string_length_range: spec.string_length_range,
            number_range: spec.number_range,
            float_precision: spec.float_precision,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockSymbolsSection {
    pub default_symbols: Vec<String>,
}

impl Default for StockSymbolsSection {
    fn default() -> Self {
        Self {
            default_symbols: GenerationSpec::default().categories,
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub simulator: SimulatorSection,
    pub message_generation: MessageGenerationSection,
    pub stock_symbols: StockSymbolsSection,
}

impl SimulatorConfig {
    /// Load the config file at `path`.
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// used. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            warn!(
                "Config file '{}' not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        info!("Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Batch, reporting and backoff settings for the engine.
    pub fn dispatch_config(&self) -> DispatchConfig {
        let sim = &self.simulator;
        DispatchConfig {
            batch: BatchConfig {
                min_batch: sim.min_batch_size,
                max_batch: sim.max_batch_size,
                fallback_batch_size: sim.batch_size_per_1k_rate,
            },
            report_interval: Duration::from_secs(sim.report_interval_secs),
            error_backoff: Duration::from_millis(sim.error_backoff_ms),
            ..Default::default()
        }
    }

    /// Resolve file values and CLI overrides into the settings of one run.
    pub fn resolve(&self, overrides: &RunOverrides) -> anyhow::Result<ResolvedRun> {
        let categories = match &overrides.categories {
            Some(input) => load_categories(input)?,
            None => self.stock_symbols.default_symbols.clone(),
        };

        let resolved = ResolvedRun {
            rate: overrides.rate.unwrap_or(self.simulator.default_rate),
            duration: overrides.duration,
            message_size: overrides
                .message_size
                .unwrap_or(self.simulator.default_message_size),
            max_workers: overrides.max_workers.unwrap_or(self.simulator.max_workers),
            categories,
        };
        self.validate(&resolved)?;
        Ok(resolved)
    }

    /// Reject settings the engine or generator cannot run with.
    pub fn validate(&self, run: &ResolvedRun) -> anyhow::Result<()> {
        let sim = &self.simulator;
        if run.rate == 0 {
            bail!("Target rate must be greater than zero");
        }
        if run.message_size == 0 {
            bail!("Message size must be greater than zero");
        }
        if run.max_workers == 0 {
            bail!("max_workers must be greater than zero");
        }
        if run.categories.is_empty() {
            bail!("No stock symbols configured");
        }
        if sim.min_batch_size == 0 {
            bail!("min_batch_size must be greater than zero");
        }
        if sim.min_batch_size > sim.max_batch_size {
            bail!(
                "min_batch_size ({}) is greater than max_batch_size ({})",
                sim.min_batch_size,
                sim.max_batch_size
            );
        }
        if sim.report_interval_secs == 0 {
            bail!("report_interval_secs must be greater than zero");
        }
        self.generation_spec(run)
            .validate()
            .context("Invalid message_generation settings")?;
        Ok(())
    }

    /// Generator settings for a resolved run.
    pub fn generation_spec(&self, run: &ResolvedRun) -> GenerationSpec {
        let shape = &self.message_generation;
        GenerationSpec {
            target_size: run.message_size,
            size_tolerance: shape.size_tolerance,
            target_field_count: shape.target_field_count,
            field_count_variance: shape.field_count_variance,
            string_length_range: shape.string_length_range,
            number_range: shape.number_range,
            float_precision: shape.float_precision,
            categories: run.categories.clone(),
            ..Default::default()
        }
    }
}

/// CLI values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub rate: Option<u64>,
    pub duration: Option<Duration>,
    pub message_size: Option<usize>,
    pub max_workers: Option<usize>,
    /// Comma list, file path or single symbol
    pub categories: Option<String>,
}

/// Final settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub rate: u64,
    pub duration: Option<Duration>,
    pub message_size: usize,
    pub max_workers: usize,
    pub categories: Vec<String>,
}

impl ResolvedRun {
    pub fn run_settings(&self) -> RunSettings {
        RunSettings::new(self.rate, self.duration).with_max_workers(self.max_workers)
    }
}
