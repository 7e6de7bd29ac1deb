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

//! Error types for the benchmark harness.
//!
//! Failures are split by how far they propagate:
//!
//! - [`SetupError`]: the scenario cannot start (missing dataset, bad
//!   configuration). Aborts that scenario only.
//! - Operation failures never surface as errors. The trial runner turns them
//!   into data on the result record.
//! - [`ConsolidationError`]: one per-scenario file could not be used. The file
//!   is skipped and consolidation carries on with the rest.
//! - [`StoreError`]: a result file could not be written.
//! - [`ConfigError`]: a configuration file could not be loaded.

use crate::core::model::ScenarioName;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A scenario could not be started.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// The scenario's CSV dataset does not exist.
    #[error("dataset for scenario '{scenario}' not found at '{path}'")]
    MissingDataset {
        /// Scenario being started
        scenario: ScenarioName,
        /// Expected dataset location
        path: PathBuf,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl SetupError {
    pub(crate) fn invalid(parameter: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

/// A result file could not be written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Filesystem failure while writing.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// CSV encoding failure.
    #[error("CSV error for '{path}': {message}")]
    Csv {
        /// Target file
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// Append mode found an existing result file it cannot read. The file
    /// is left untouched.
    #[error("cannot append to '{path}': {source}")]
    AppendTarget {
        /// Existing result file
        path: PathBuf,
        /// Why it could not be read
        source: ConsolidationError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

/// A per-scenario result file was skipped during consolidation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsolidationError {
    /// No result file exists for the scenario.
    #[error("no result file at '{path}'")]
    Missing {
        /// Expected file location
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The file is not valid CSV or its header does not match the schema.
    #[error("malformed result file '{path}': {message}")]
    Malformed {
        /// File involved
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// A row parsed but holds values outside the record invariants.
    #[error("invalid row {line} in '{path}': {reason}")]
    InvalidRow {
        /// File involved
        path: PathBuf,
        /// 1-based line number, header included
        line: u64,
        /// Why the row was rejected
        reason: String,
    },

    /// A row claims a scenario other than the one the file is named after.
    #[error("row {line} in '{path}' belongs to scenario '{found}', expected '{expected}'")]
    ScenarioMismatch {
        /// File involved
        path: PathBuf,
        /// 1-based line number, header included
        line: u64,
        /// Scenario the file is named after
        expected: ScenarioName,
        /// Scenario found in the row
        found: ScenarioName,
    },
}

impl ConsolidationError {
    /// Returns the file this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            ConsolidationError::Missing { path }
            | ConsolidationError::Io { path, .. }
            | ConsolidationError::Malformed { path, .. }
            | ConsolidationError::InvalidRow { path, .. }
            | ConsolidationError::ScenarioMismatch { path, .. } => path,
        }
    }

    /// Returns whether the file was simply absent rather than unusable.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConsolidationError::Missing { .. })
    }
}

/// A configuration file could not be loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The file is not a valid configuration document.
    #[error("invalid configuration file '{path}': {message}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The document parsed but a value is out of range.
    #[error(transparent)]
    Invalid(#[from] SetupError),
}

/// A scenario run failed before producing its result file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// The scenario could not start.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Trials ran but the result file could not be written.
    #[error(transparent)]
    Persist(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::MissingDataset {
            scenario: ScenarioName::Grande,
            path: PathBuf::from("data/MICRODADOS_ENEM_2023.csv"),
        };
        let msg = err.to_string();
        assert!(msg.contains("grande"));
        assert!(msg.contains("MICRODADOS_ENEM_2023.csv"));

        let err = SetupError::invalid("repeat_count", "must be at least 1");
        let msg = err.to_string();
        assert!(msg.contains("repeat_count"));
        assert!(msg.contains("must be at least 1"));
    }

    #[test]
    fn test_consolidation_error_path() {
        let err = ConsolidationError::InvalidRow {
            path: PathBuf::from("benchmark_results_medio.csv"),
            line: 3,
            reason: "negative time".to_string(),
        };
        assert_eq!(err.path(), &PathBuf::from("benchmark_results_medio.csv"));
        assert!(!err.is_missing());
        assert!(err.to_string().contains("row 3"));

        let missing = ConsolidationError::Missing {
            path: PathBuf::from("x.csv"),
        };
        assert!(missing.is_missing());
    }

    #[test]
    fn test_scenario_error_from_setup() {
        let err: ScenarioError = SetupError::invalid("baseline_samples", "must be at least 1").into();
        assert!(matches!(err, ScenarioError::Setup(_)));
        assert!(err.to_string().contains("baseline_samples"));
    }
}
