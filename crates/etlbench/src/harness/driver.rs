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

//! Scenario driver: runs every configured (engine, operation) pair for one
//! dataset tier and persists the resulting table.

use crate::core::config::{PersistMode, RunConfiguration};
use crate::core::measurement::{MemoryProbe, MemorySampler, ProcessMemory};
use crate::core::model::{Engine, Operation, ResultRecord, Scenario, ScenarioName};
use crate::core::registry::Registry;
use crate::error::{ScenarioError, SetupError};
use crate::harness::runner::TrialRunner;
use crate::store::ResultStore;
use std::path::PathBuf;
use tracing::{info, warn};

/// Trial counts for one pair of a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRun {
    /// Engine measured.
    pub engine: Engine,
    /// Operation measured.
    pub operation: Operation,
    /// Trials attempted.
    pub attempted: u32,
    /// Trials that succeeded.
    pub succeeded: u32,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    /// Scenario that ran.
    pub scenario: ScenarioName,
    /// One aggregate record per configured pair, in iteration order.
    pub records: Vec<ResultRecord>,
    /// Trial counts, parallel to `records`.
    pub pairs: Vec<PairRun>,
    /// Requested pairs without an adapter.
    pub skipped: Vec<(Engine, Operation)>,
    /// Result file written.
    pub output_path: PathBuf,
}

impl ScenarioRun {
    /// Number of records with an error.
    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| r.error.is_some()).count()
    }
}

/// Drives one scenario at a time, sequentially.
pub struct ScenarioDriver<'r, P = ProcessMemory> {
    config: RunConfiguration,
    registry: &'r Registry,
    runner: TrialRunner<P>,
    store: ResultStore,
}

impl<'r> ScenarioDriver<'r, ProcessMemory> {
    /// Creates a driver that samples the memory of the current process.
    pub fn new(config: RunConfiguration, registry: &'r Registry, store: ResultStore) -> Self {
        Self::with_probe(config, registry, store, ProcessMemory)
    }
}

impl<'r, P: MemoryProbe> ScenarioDriver<'r, P> {
    /// Creates a driver with a custom memory probe.
    pub fn with_probe(
        config: RunConfiguration,
        registry: &'r Registry,
        store: ResultStore,
        probe: P,
    ) -> Self {
        let runner = TrialRunner::new(MemorySampler::new(probe, config.sampler.clone()));
        Self {
            config,
            registry,
            runner,
            store,
        }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Returns the result store.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Runs every configured pair for `scenario` and writes its result file.
    ///
    /// Pairs without an adapter are logged and skipped. Operation failures
    /// end up in the records. Only setup problems (missing dataset, invalid
    /// settings), an unreadable file in append mode and a failure to write
    /// the result file are returned as errors. The append check happens
    /// before any trial runs.
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<ScenarioRun, ScenarioError> {
        self.check_setup(scenario)?;

        let name = scenario.name();
        if self.config.persist_mode == PersistMode::Append {
            self.store.check_append(name)?;
        }
        info!(
            scenario = %name,
            dataset = %scenario.csv_path().display(),
            encoding = %scenario.encoding(),
            repeat_count = scenario.repeat_count(),
            "starting scenario"
        );

        let mut records = Vec::new();
        let mut pairs = Vec::new();
        let mut skipped = Vec::new();

        for (engine, operation) in self.config.pairs() {
            let Some(adapter) = self.registry.lookup(engine, operation) else {
                warn!(%engine, %operation, "no adapter registered, skipping");
                skipped.push((engine, operation));
                continue;
            };

            info!(%engine, %operation, "benchmarking");
            let input = scenario.input_path(operation.input());
            let summary = self.runner.run_repeated(
                adapter,
                input,
                scenario.encoding(),
                scenario.repeat_count(),
            );

            let succeeded = summary.succeeded();
            if succeeded > 0 && succeeded < summary.attempted {
                warn!(
                    %engine,
                    %operation,
                    succeeded,
                    attempted = summary.attempted,
                    "some trials failed; averaging the successful ones"
                );
            }

            records.push(summary.to_record(engine, operation.as_str(), name));
            pairs.push(PairRun {
                engine,
                operation,
                attempted: summary.attempted,
                succeeded,
            });
        }

        let output_path = self
            .store
            .write_scenario(name, &records, self.config.persist_mode)?;
        info!(scenario = %name, rows = records.len(), path = %output_path.display(), "results saved");

        Ok(ScenarioRun {
            scenario: name,
            records,
            pairs,
            skipped,
            output_path,
        })
    }

    fn check_setup(&self, scenario: &Scenario) -> Result<(), SetupError> {
        self.config.validate()?;
        if scenario.repeat_count() == 0 {
            return Err(SetupError::invalid("repeat_count", "must be at least 1"));
        }
        if !scenario.csv_path().is_file() {
            return Err(SetupError::MissingDataset {
                scenario: scenario.name(),
                path: scenario.csv_path().to_path_buf(),
            });
        }
        Ok(())
    }
}
