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

//! ETLBench: tabular engine benchmark harness.
//!
//! Runs a fixed set of ETL operations against interchangeable engines on
//! three dataset tiers, measuring wall time and resident-memory growth per
//! operation, and consolidates the per-tier results into one table with
//! summary statistics.
//!
//! ## Features
//!
//! - **Trial runner**: repeated, isolated trials with failure capture
//! - **Resource sampler**: baseline/peak resident-memory protocol
//! - **Scenario driver**: one result file per dataset tier
//! - **Consolidator**: union, summary statistics and per-engine overview
//!
//! ## Usage
//!
//! ```no_run
//! use etlbench::{
//!     adapter, Encoding, Engine, Operation, Output, Registry, ResultStore, RunConfiguration,
//!     Scenario, ScenarioDriver, ScenarioName,
//! };
//! use std::path::Path;
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     Engine::Duckdb,
//!     Operation::ReadCsv,
//!     adapter(|path: &Path, _: Encoding| Ok(Box::new(std::fs::read(path)?) as Output)),
//! );
//!
//! let config = RunConfiguration::default()
//!     .with_repeat(3)
//!     .with_engines(&[Engine::Duckdb])
//!     .with_operations(&[Operation::ReadCsv]);
//! let driver = ScenarioDriver::new(config, &registry, ResultStore::new("results"));
//! let scenario = Scenario::from_data_dir(ScenarioName::Pequeno, Path::new("data"), 3);
//! let run = driver.run_scenario(&scenario)?;
//! println!("{} records", run.records.len());
//! # Ok::<(), etlbench::ScenarioError>(())
//! ```

pub mod consolidate;
pub mod core;
pub mod error;
pub mod harness;
pub mod reporters;
pub mod store;

pub use consolidate::{
    consolidate, overview, run_consolidation, summarize, ConsolidatedTable, Consolidation,
    ConsolidationReport, OverviewRow, Stat, SummaryRow,
};
pub use core::{
    adapter, memory_delta, AdapterError, AdapterResult, Availability, Encoding, Engine,
    InputKind, MemoryProbe, MemorySampler, Operation, OperationAdapter, Output, ParseTagError,
    PersistMode, ProcessMemory, Registry, ResultRecord, RunConfiguration, SamplerConfig, Scenario,
    ScenarioName, DEFAULT_REPEAT_COUNT,
};
pub use error::{ConfigError, ConsolidationError, ScenarioError, SetupError, StoreError};
pub use harness::{
    PairRun, ScenarioDriver, ScenarioRun, TrialOutcome, TrialRunner, TrialSample, TrialSummary,
};
pub use store::{read_records, ResultStore, NO_DATA};
