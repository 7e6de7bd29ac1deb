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

//! Structured error types for the ETLBench CLI.

use etlbench::{ConfigError, ScenarioError, ScenarioName, StoreError};
use etlbench_engines::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a CLI command.
#[derive(Error, Debug)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A scenario could not start or its results could not be saved.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// A consolidated file could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An engine could not be initialized.
    #[error("engine setup failed: {0}")]
    Engine(#[from] EngineError),

    /// Writing a report failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Some scenarios of a full run did not complete.
    #[error("{} scenario(s) failed: {}", .0.len(), join(.0))]
    ScenariosFailed(Vec<ScenarioName>),
}

impl CliError {
    /// Creates an I/O error.
    pub fn io_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

fn join(scenarios: &[ScenarioName]) -> String {
    scenarios
        .iter()
        .map(ScenarioName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
