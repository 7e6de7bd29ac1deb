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

//! Core benchmark infrastructure.
//!
//! # Modules
//!
//! - `model`: engines, operations, scenarios and result records
//! - `config`: the run configuration handed to the scenario driver
//! - `measurement`: process memory sampling
//! - `registry`: (engine, operation) adapter registry

pub mod config;
pub mod measurement;
pub mod model;
pub mod registry;

pub use config::{PersistMode, RunConfiguration, SamplerConfig, DEFAULT_REPEAT_COUNT};
pub use measurement::{memory_delta, MemoryProbe, MemorySampler, ProcessMemory};
pub use model::{
    Encoding, Engine, InputKind, Operation, ParseTagError, ResultRecord, Scenario, ScenarioName,
};
pub use registry::{
    adapter, AdapterError, AdapterResult, Availability, OperationAdapter, Output, Registry,
};
