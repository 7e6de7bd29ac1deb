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

//! Trial runner: times one operation repeatedly and samples its memory cost.

use crate::core::measurement::{memory_delta, MemoryProbe, MemorySampler, ProcessMemory};
use crate::core::model::{Encoding, Engine, ResultRecord, ScenarioName};
use crate::core::registry::OperationAdapter;
use crate::harness::aggregator::mean;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Measurements from one successful trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialSample {
    /// Wall time of the adapter call, in seconds.
    pub elapsed_seconds: f64,
    /// Peak minus baseline resident memory, in megabytes.
    pub memory_mb: f64,
}

/// Result of one trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    /// The adapter returned normally.
    Completed(TrialSample),
    /// The adapter returned an error or panicked. Carries the message.
    Failed(String),
}

/// All trials of one (engine, operation) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialSummary {
    /// Trials attempted.
    pub attempted: u32,
    /// Samples of the successful trials, in execution order.
    pub samples: Vec<TrialSample>,
    /// Messages of the failed trials, in execution order.
    pub errors: Vec<String>,
}

impl TrialSummary {
    /// Records one outcome.
    pub fn push(&mut self, outcome: TrialOutcome) {
        self.attempted += 1;
        match outcome {
            TrialOutcome::Completed(sample) => self.samples.push(sample),
            TrialOutcome::Failed(message) => self.errors.push(message),
        }
    }

    /// Number of successful trials.
    pub fn succeeded(&self) -> u32 {
        self.samples.len() as u32
    }

    /// Mean elapsed time of the successful trials.
    pub fn mean_time(&self) -> Option<f64> {
        let times: Vec<f64> = self.samples.iter().map(|s| s.elapsed_seconds).collect();
        mean(&times)
    }

    /// Mean memory delta of the successful trials.
    pub fn mean_memory(&self) -> Option<f64> {
        let memory: Vec<f64> = self.samples.iter().map(|s| s.memory_mb).collect();
        mean(&memory)
    }

    /// Builds the aggregate record for the pair.
    ///
    /// Without any successful trial the record carries the first error and
    /// no numbers.
    pub fn to_record(&self, engine: Engine, operation: &str, scenario: ScenarioName) -> ResultRecord {
        match (self.mean_time(), self.mean_memory()) {
            (Some(time), Some(memory)) => {
                ResultRecord::measured(engine, operation, scenario, time, memory)
            }
            _ => {
                let error = self
                    .errors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "no trials were run".to_string());
                ResultRecord::failed(engine, operation, scenario, error)
            }
        }
    }
}

/// Runs trials one at a time on the calling thread.
#[derive(Debug, Clone)]
pub struct TrialRunner<P = ProcessMemory> {
    sampler: MemorySampler<P>,
}

impl<P: MemoryProbe> TrialRunner<P> {
    /// Creates a runner around a memory sampler.
    pub fn new(sampler: MemorySampler<P>) -> Self {
        Self { sampler }
    }

    /// Returns the memory sampler.
    pub fn sampler(&self) -> &MemorySampler<P> {
        &self.sampler
    }

    /// Runs the adapter once.
    ///
    /// Takes the baseline, times the call with a monotonic clock, then
    /// samples the peak while the adapter's output is still alive. Errors and
    /// panics from the adapter become [`TrialOutcome::Failed`].
    pub fn run_trial(
        &self,
        adapter: &dyn OperationAdapter,
        input: &Path,
        encoding: Encoding,
    ) -> TrialOutcome {
        let baseline = self.sampler.baseline();

        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| adapter.run(input, encoding)));
        let elapsed_seconds = start.elapsed().as_secs_f64();

        match result {
            Ok(Ok(output)) => {
                let peak = self.sampler.peak();
                drop(output);
                TrialOutcome::Completed(TrialSample {
                    elapsed_seconds,
                    memory_mb: memory_delta(baseline, peak),
                })
            }
            Ok(Err(err)) => TrialOutcome::Failed(err.to_string()),
            Err(payload) => TrialOutcome::Failed(panic_message(payload.as_ref())),
        }
    }

    /// Runs the adapter `repeat_count` times.
    ///
    /// Failed trials are recorded and the remaining trials still run. Memory
    /// is reclaimed after every trial so the next baseline does not inherit
    /// this trial's allocations.
    pub fn run_repeated(
        &self,
        adapter: &dyn OperationAdapter,
        input: &Path,
        encoding: Encoding,
        repeat_count: u32,
    ) -> TrialSummary {
        let mut summary = TrialSummary::default();

        for trial in 1..=repeat_count {
            let outcome = self.run_trial(adapter, input, encoding);
            match &outcome {
                TrialOutcome::Completed(sample) => debug!(
                    trial,
                    elapsed_seconds = sample.elapsed_seconds,
                    memory_mb = sample.memory_mb,
                    "trial completed"
                ),
                TrialOutcome::Failed(message) => warn!(trial, error = %message, "trial failed"),
            }
            summary.push(outcome);
            self.sampler.reclaim();
        }

        summary
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("adapter panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("adapter panicked: {}", msg)
    } else {
        "adapter panicked".to_string()
    }
}
