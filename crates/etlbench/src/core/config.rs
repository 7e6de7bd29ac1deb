// Dweve ETLBench - Tabular Engine Benchmark Harness
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Run configuration.
//!
//! A [`RunConfiguration`] is built once before the first scenario starts and
//! handed to the scenario driver by value. Nothing mutates it during a run.

use crate::core::model::{Engine, Operation};
use crate::error::{ConfigError, SetupError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default number of trials per (engine, operation).
pub const DEFAULT_REPEAT_COUNT: u32 = 10;

/// Default number of reclamation passes before a baseline read.
pub const DEFAULT_COLLECTION_PASSES: u32 = 3;

/// Default pause after reclamation, in milliseconds.
pub const DEFAULT_SETTLE_PAUSE_MS: u64 = 100;

/// Default number of baseline readings.
pub const DEFAULT_BASELINE_SAMPLES: u32 = 3;

/// Default pause between baseline readings, in milliseconds.
pub const DEFAULT_BASELINE_INTERVAL_MS: u64 = 10;

/// Default number of post-operation readings.
pub const DEFAULT_PEAK_SAMPLES: u32 = 1;

/// Memory sampling protocol settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Reclamation requests issued before a baseline read.
    pub collection_passes: u32,
    /// Pause after reclamation, in milliseconds.
    pub settle_pause_ms: u64,
    /// Baseline readings; the minimum is kept.
    pub baseline_samples: u32,
    /// Pause between baseline readings, in milliseconds.
    pub baseline_interval_ms: u64,
    /// Post-operation readings; the maximum is kept.
    pub peak_samples: u32,
    /// Pause between post-operation readings, in milliseconds.
    pub peak_interval_ms: u64,
}

impl SamplerConfig {
    /// Settings with every pause removed. Used by tests and dry runs.
    pub fn without_pauses() -> Self {
        Self {
            settle_pause_ms: 0,
            baseline_interval_ms: 0,
            peak_interval_ms: 0,
            ..Self::default()
        }
    }

    /// Pause after reclamation.
    pub fn settle_pause(&self) -> Duration {
        Duration::from_millis(self.settle_pause_ms)
    }

    /// Pause between baseline readings.
    pub fn baseline_interval(&self) -> Duration {
        Duration::from_millis(self.baseline_interval_ms)
    }

    /// Pause between post-operation readings.
    pub fn peak_interval(&self) -> Duration {
        Duration::from_millis(self.peak_interval_ms)
    }

    /// Checks that at least one reading is taken on each side.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.baseline_samples == 0 {
            return Err(SetupError::invalid("baseline_samples", "must be at least 1"));
        }
        if self.peak_samples == 0 {
            return Err(SetupError::invalid("peak_samples", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            collection_passes: DEFAULT_COLLECTION_PASSES,
            settle_pause_ms: DEFAULT_SETTLE_PAUSE_MS,
            baseline_samples: DEFAULT_BASELINE_SAMPLES,
            baseline_interval_ms: DEFAULT_BASELINE_INTERVAL_MS,
            peak_samples: DEFAULT_PEAK_SAMPLES,
            peak_interval_ms: 0,
        }
    }
}

/// How a scenario's result file is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Replace the file with this run's rows.
    #[default]
    Overwrite,
    /// Keep the file's rows and add this run's rows after them.
    Append,
}

/// Settings for a whole benchmark run.
///
/// # Example
///
/// ```no_run
/// use etlbench::core::config::RunConfiguration;
/// use etlbench::{Engine, Operation};
///
/// let config = RunConfiguration::default()
///     .with_repeat(3)
///     .with_engines(&[Engine::Polars, Engine::Duckdb])
///     .with_operations(&[Operation::ReadCsv, Operation::Agg]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    /// Trials per (engine, operation).
    pub repeat_count: u32,
    /// Engines to benchmark, in iteration order.
    pub engines: Vec<Engine>,
    /// Operations to benchmark, in iteration order.
    pub operations: Vec<Operation>,
    /// Memory sampling settings.
    pub sampler: SamplerConfig,
    /// How result files are updated.
    pub persist_mode: PersistMode,
}

impl RunConfiguration {
    /// Loads a configuration from a JSON document.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config: RunConfiguration =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.engines = dedup(&config.engines);
        config.operations = dedup(&config.operations);
        config.validate()?;
        Ok(config)
    }

    /// Sets the number of trials per pair.
    pub fn with_repeat(mut self, repeat_count: u32) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Sets the engines, dropping duplicates but keeping first-seen order.
    pub fn with_engines(mut self, engines: &[Engine]) -> Self {
        self.engines = dedup(engines);
        self
    }

    /// Sets the operations, dropping duplicates but keeping first-seen order.
    pub fn with_operations(mut self, operations: &[Operation]) -> Self {
        self.operations = dedup(operations);
        self
    }

    /// Sets the memory sampling settings.
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets how result files are updated.
    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }

    /// Returns every requested (engine, operation) pair in iteration order.
    pub fn pairs(&self) -> impl Iterator<Item = (Engine, Operation)> + '_ {
        self.engines
            .iter()
            .flat_map(move |&engine| self.operations.iter().map(move |&op| (engine, op)))
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.repeat_count == 0 {
            return Err(SetupError::invalid("repeat_count", "must be at least 1"));
        }
        self.sampler.validate()
    }
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT_COUNT,
            engines: Engine::ALL.to_vec(),
            operations: Operation::ALL.to_vec(),
            sampler: SamplerConfig::default(),
            persist_mode: PersistMode::Overwrite,
        }
    }
}

fn dedup<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for &item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
