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

//! Result files: naming convention and CSV codec.
//!
//! | File | Content |
//! |------|---------|
//! | `benchmark_results_<scenario>.csv` | aggregate records of one scenario |
//! | `benchmark_results_all.csv` | union of every scenario file |
//! | `benchmark_summary.csv` | statistics per (engine, operation, scenario) |
//!
//! Every file is written to a temporary file in the target directory and
//! renamed into place, so readers never see a half-written table.

use crate::consolidate::SummaryRow;
use crate::core::config::PersistMode;
use crate::core::model::{Engine, ResultRecord, ScenarioName};
use crate::error::{ConsolidationError, StoreError};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name prefix shared by every result file.
pub const RESULTS_PREFIX: &str = "benchmark_results";

/// Consolidated file name.
pub const CONSOLIDATED_FILE: &str = "benchmark_results_all.csv";

/// Summary file name.
pub const SUMMARY_FILE: &str = "benchmark_summary.csv";

/// Header of per-scenario and consolidated files.
pub const RECORD_HEADER: [&str; 6] = [
    "engine",
    "operation",
    "scenario",
    "time_seconds",
    "memory_mb",
    "error",
];

/// Header of the summary file.
pub const SUMMARY_HEADER: [&str; 8] = [
    "engine",
    "operation",
    "scenario",
    "count",
    "time_mean",
    "time_std",
    "memory_mean",
    "memory_std",
];

/// Rendering of a statistic that has no data.
pub const NO_DATA: &str = "no data";

/// Decimals used for record measurements.
pub const RECORD_PRECISION: usize = 6;

/// Decimals used for summary statistics.
pub const SUMMARY_PRECISION: usize = 4;

/// Directory holding the result files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the result file of a scenario.
    pub fn scenario_path(&self, scenario: ScenarioName) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", RESULTS_PREFIX, scenario.as_str()))
    }

    /// Returns the consolidated file.
    pub fn consolidated_path(&self) -> PathBuf {
        self.dir.join(CONSOLIDATED_FILE)
    }

    /// Returns the summary file.
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    /// Writes a scenario's records.
    ///
    /// In append mode the rows already in the file are kept ahead of the new
    /// ones, and an existing file that cannot be read is an error.
    pub fn write_scenario(
        &self,
        scenario: ScenarioName,
        records: &[ResultRecord],
        mode: PersistMode,
    ) -> Result<PathBuf, StoreError> {
        let path = self.scenario_path(scenario);

        let mut rows = match mode {
            PersistMode::Append => self.existing_rows(scenario)?,
            PersistMode::Overwrite => Vec::new(),
        };
        rows.extend_from_slice(records);

        write_records(&path, &rows)?;
        Ok(path)
    }

    /// Checks that a scenario's result file can be appended to: it is
    /// either absent or a valid result file for that scenario.
    pub fn check_append(&self, scenario: ScenarioName) -> Result<(), StoreError> {
        self.existing_rows(scenario).map(|_| ())
    }

    fn existing_rows(&self, scenario: ScenarioName) -> Result<Vec<ResultRecord>, StoreError> {
        let path = self.scenario_path(scenario);
        match read_records(&path, Some(scenario)) {
            Ok(rows) => Ok(rows),
            Err(ConsolidationError::Missing { .. }) => Ok(Vec::new()),
            Err(source) => Err(StoreError::AppendTarget { path, source }),
        }
    }

    /// Writes the consolidated table, replacing any previous file.
    pub fn write_consolidated(&self, records: &[ResultRecord]) -> Result<PathBuf, StoreError> {
        let path = self.consolidated_path();
        write_records(&path, records)?;
        Ok(path)
    }

    /// Writes the summary table, replacing any previous file.
    pub fn write_summary(&self, rows: &[SummaryRow]) -> Result<PathBuf, StoreError> {
        let path = self.summary_path();
        write_atomic(&path, |writer| {
            writer.write_record(SUMMARY_HEADER)?;
            for row in rows {
                writer.write_record([
                    row.engine.as_str().to_string(),
                    row.operation.clone(),
                    row.scenario.as_str().to_string(),
                    row.count.to_string(),
                    format_stat(row.time.mean, SUMMARY_PRECISION),
                    format_stat(row.time.std_dev, SUMMARY_PRECISION),
                    format_stat(row.memory.mean, SUMMARY_PRECISION),
                    format_stat(row.memory.std_dev, SUMMARY_PRECISION),
                ])?;
            }
            Ok(())
        })?;
        Ok(path)
    }
}

/// Renders a statistic with fixed precision, or [`NO_DATA`].
pub fn format_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => NO_DATA.to_string(),
    }
}

/// Writes records with the record header.
pub fn write_records(path: &Path, records: &[ResultRecord]) -> Result<(), StoreError> {
    write_atomic(path, |writer| {
        writer.write_record(RECORD_HEADER)?;
        for record in records {
            writer.write_record([
                record.engine.as_str().to_string(),
                record.operation.clone(),
                record.scenario.as_str().to_string(),
                format_measure(record.time_seconds),
                format_measure(record.memory_mb),
                record.error.clone().unwrap_or_default(),
            ])?;
        }
        Ok(())
    })
}

fn format_measure(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.*}", RECORD_PRECISION, v))
        .unwrap_or_default()
}

fn write_atomic<F>(path: &Path, fill: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut csv::Writer<&mut NamedTempFile>) -> csv::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    {
        let mut writer = csv::Writer::from_writer(&mut temp);
        fill(&mut writer).map_err(|e| StoreError::csv(path, e))?;
        writer.flush().map_err(|e| StoreError::io(path, e))?;
    }
    temp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RecordRow {
    engine: Engine,
    operation: String,
    scenario: ScenarioName,
    time_seconds: Option<f64>,
    memory_mb: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// Reads records from a result file.
///
/// When `expected` is given every row must belong to that scenario. Rows
/// with negative or non-finite numbers, or an error next to measurements
/// that are only half present, make the whole file invalid.
pub fn read_records(
    path: &Path,
    expected: Option<ScenarioName>,
) -> Result<Vec<ResultRecord>, ConsolidationError> {
    let file = fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConsolidationError::Missing {
            path: path.to_path_buf(),
        },
        _ => ConsolidationError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let malformed = |message: String| ConsolidationError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let headers = reader.headers().map_err(|e| malformed(e.to_string()))?;
    let required = &RECORD_HEADER[..5];
    if headers.len() < required.len() || headers.iter().zip(required).any(|(h, r)| h != *r) {
        return Err(malformed(format!(
            "expected header starting with '{}', found '{}'",
            required.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RecordRow>().enumerate() {
        let line = index as u64 + 2;
        let row = row.map_err(|e| malformed(e.to_string()))?;
        let invalid = |reason: &str| ConsolidationError::InvalidRow {
            path: path.to_path_buf(),
            line,
            reason: reason.to_string(),
        };

        for value in [row.time_seconds, row.memory_mb].into_iter().flatten() {
            if !value.is_finite() {
                return Err(invalid("measurement is not a finite number"));
            }
            if value < 0.0 {
                return Err(invalid("measurement is negative"));
            }
        }
        if row.time_seconds.is_some() != row.memory_mb.is_some() {
            return Err(invalid("time_seconds and memory_mb must both be present or both empty"));
        }
        if let Some(expected) = expected {
            if row.scenario != expected {
                return Err(ConsolidationError::ScenarioMismatch {
                    path: path.to_path_buf(),
                    line,
                    expected,
                    found: row.scenario,
                });
            }
        }

        records.push(ResultRecord {
            engine: row.engine,
            operation: row.operation,
            scenario: row.scenario,
            time_seconds: row.time_seconds,
            memory_mb: row.memory_mb,
            error: row.error.filter(|e| !e.is_empty()),
        });
    }

    Ok(records)
}
