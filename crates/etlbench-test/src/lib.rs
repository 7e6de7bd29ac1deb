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

//! Shared test fixtures for ETLBench.
//!
//! # Features
//!
//! - **Probes**: scripted and constant memory probes
//! - **Adapters**: stub operations that succeed, fail, panic or alternate
//! - **Datasets**: small ENEM-shaped CSV files laid out like a real data directory
//!
//! # Quick Start
//!
//! ```rust
//! use etlbench::{Engine, Operation, Registry, ScenarioName};
//! use etlbench_test::{adapters, DatasetFixture, FlatProbe};
//!
//! let data = DatasetFixture::new();
//! let scenario = data.scenario(ScenarioName::Pequeno, 2);
//!
//! let mut registry = Registry::new();
//! registry.register(Engine::Pandas, Operation::ReadCsv, adapters::fixed());
//! registry.register(Engine::Polars, Operation::ReadCsv, adapters::failing("boom"));
//! let _probe = FlatProbe(64.0);
//! # let _ = scenario;
//! ```

pub mod adapters;
pub mod datasets;
pub mod probes;

pub use datasets::{
    encode, DatasetFixture, ITEMS_FILE, SAMPLE_JOIN_ROWS, SAMPLE_ROWS, SAMPLE_ROWS_ABOVE_600,
    SAMPLE_STATES,
};
pub use probes::{FlatProbe, ScriptedProbe};

use etlbench::{Engine, Operation, Registry, RunConfiguration, SamplerConfig};

/// Run configuration with no sampling pauses, for fast tests.
pub fn quick_config(repeat_count: u32) -> RunConfiguration {
    RunConfiguration::default()
        .with_repeat(repeat_count)
        .with_sampler(SamplerConfig::without_pauses())
}

/// Registers `make()` for every listed pair.
pub fn registry_with<A, F>(engines: &[Engine], operations: &[Operation], make: F) -> Registry
where
    A: etlbench::OperationAdapter + 'static,
    F: Fn() -> A,
{
    let mut registry = Registry::new();
    for &engine in engines {
        for &operation in operations {
            registry.register(engine, operation, make());
        }
    }
    registry
}
