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

//! Benchmark data model: engines, operations, scenarios and result records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Dataset file stem shared by every scenario.
pub const DATASET_STEM: &str = "MICRODADOS_ENEM_2023";

/// A tag string did not name a known engine, operation, scenario or encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseTagError {
    /// Kind of tag being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
    /// Accepted values, comma separated.
    pub expected: String,
}

impl ParseTagError {
    fn new<T: fmt::Display>(kind: &'static str, value: &str, all: &[T]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: all
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Data-processing engine under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// DuckDB, SQL over files.
    Duckdb,
    /// Polars, columnar dataframes.
    Polars,
    /// Pandas-style eager row tables.
    Pandas,
}

impl Engine {
    /// Every engine, in default iteration order.
    pub const ALL: [Engine; 3] = [Engine::Duckdb, Engine::Polars, Engine::Pandas];

    /// Returns the engine tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Duckdb => "duckdb",
            Engine::Polars => "polars",
            Engine::Pandas => "pandas",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Engine::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagError::new("engine", s, &Engine::ALL))
    }
}

/// Which scenario file an operation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// The semicolon-separated CSV dataset.
    Csv,
    /// The Parquet copy of the dataset.
    Parquet,
}

/// A data-manipulation action benchmarked on every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Load the CSV dataset.
    ReadCsv,
    /// Load the Parquet dataset.
    ReadParquet,
    /// Keep rows with a math score above 600.
    Filter,
    /// Join with the exam items table.
    Join,
    /// Mean math score per state.
    Agg,
    /// Load the CSV dataset and write it back as CSV.
    WriteCsv,
    /// Load the CSV dataset and write it as Snappy Parquet.
    WriteParquet,
}

impl Operation {
    /// Every operation, in default iteration order.
    pub const ALL: [Operation; 7] = [
        Operation::ReadCsv,
        Operation::ReadParquet,
        Operation::Filter,
        Operation::Join,
        Operation::Agg,
        Operation::WriteCsv,
        Operation::WriteParquet,
    ];

    /// Returns the operation tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ReadCsv => "read_csv",
            Operation::ReadParquet => "read_parquet",
            Operation::Filter => "filter",
            Operation::Join => "join",
            Operation::Agg => "agg",
            Operation::WriteCsv => "write_csv",
            Operation::WriteParquet => "write_parquet",
        }
    }

    /// Returns the scenario file this operation reads.
    pub fn input(&self) -> InputKind {
        match self {
            Operation::ReadParquet => InputKind::Parquet,
            _ => InputKind::Csv,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParseTagError::new("operation", s, &Operation::ALL))
    }
}

/// Text encoding of a scenario's CSV dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-8.
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1.
    #[serde(rename = "latin-1")]
    Latin1,
}

impl Encoding {
    /// Returns the encoding label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Dataset size tier. Ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    /// Small sample of the dataset.
    Pequeno,
    /// Medium sample of the dataset.
    Medio,
    /// The full dataset.
    Grande,
}

impl ScenarioName {
    /// Every scenario, smallest first.
    pub const ALL: [ScenarioName; 3] = [
        ScenarioName::Pequeno,
        ScenarioName::Medio,
        ScenarioName::Grande,
    ];

    /// Returns the scenario tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::Pequeno => "pequeno",
            ScenarioName::Medio => "medio",
            ScenarioName::Grande => "grande",
        }
    }

    /// Returns the encoding of this scenario's dataset.
    ///
    /// The samples were re-exported as UTF-8; the full dataset ships as
    /// Latin-1.
    pub fn encoding(&self) -> Encoding {
        match self {
            ScenarioName::Pequeno | ScenarioName::Medio => Encoding::Utf8,
            ScenarioName::Grande => Encoding::Latin1,
        }
    }

    /// Returns the dataset file stem for this scenario.
    pub fn dataset_stem(&self) -> String {
        match self {
            ScenarioName::Grande => DATASET_STEM.to_string(),
            _ => format!("{}_{}", DATASET_STEM, self.as_str()),
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ScenarioName {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioName::ALL
            .into_iter()
            .find(|sc| sc.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagError::new("scenario", s, &ScenarioName::ALL))
    }
}

/// One benchmark pass over a dataset tier.
///
/// The encoding is derived from the scenario name and cannot be set
/// independently, so every engine sees the same encoding within a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: ScenarioName,
    csv_path: PathBuf,
    parquet_path: PathBuf,
    repeat_count: u32,
}

impl Scenario {
    /// Creates a scenario from explicit dataset paths.
    pub fn new(
        name: ScenarioName,
        csv_path: impl Into<PathBuf>,
        parquet_path: impl Into<PathBuf>,
        repeat_count: u32,
    ) -> Self {
        Self {
            name,
            csv_path: csv_path.into(),
            parquet_path: parquet_path.into(),
            repeat_count,
        }
    }

    /// Creates a scenario using the dataset naming convention under `dir`.
    ///
    /// `pequeno` and `medio` read `MICRODADOS_ENEM_2023_<name>.csv`, `grande`
    /// reads `MICRODADOS_ENEM_2023.csv`; the Parquet copy sits next to it.
    pub fn from_data_dir(name: ScenarioName, dir: &Path, repeat_count: u32) -> Self {
        let stem = name.dataset_stem();
        Self::new(
            name,
            dir.join(format!("{}.csv", stem)),
            dir.join(format!("{}.parquet", stem)),
            repeat_count,
        )
    }

    /// Returns the scenario name.
    pub fn name(&self) -> ScenarioName {
        self.name
    }

    /// Returns the CSV dataset path.
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Returns the Parquet dataset path.
    pub fn parquet_path(&self) -> &Path {
        &self.parquet_path
    }

    /// Returns the dataset encoding.
    pub fn encoding(&self) -> Encoding {
        self.name.encoding()
    }

    /// Returns how many trials run per (engine, operation).
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Returns the file an input kind refers to.
    pub fn input_path(&self, kind: InputKind) -> &Path {
        match kind {
            InputKind::Csv => &self.csv_path,
            InputKind::Parquet => &self.parquet_path,
        }
    }
}

/// Aggregate measurement of one (engine, operation) pair in one scenario.
///
/// Either both numeric fields are present, or the record carries an error
/// and neither number. Numbers are never negative or NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Engine measured.
    pub engine: Engine,
    /// Operation tag.
    pub operation: String,
    /// Scenario the record belongs to.
    pub scenario: ScenarioName,
    /// Mean elapsed wall time in seconds.
    pub time_seconds: Option<f64>,
    /// Mean memory delta in megabytes.
    pub memory_mb: Option<f64>,
    /// Failure message when no trial succeeded.
    pub error: Option<String>,
}

impl ResultRecord {
    /// Creates a record for a measured pair.
    ///
    /// Negative or non-finite inputs are clamped to zero.
    pub fn measured(
        engine: Engine,
        operation: impl Into<String>,
        scenario: ScenarioName,
        time_seconds: f64,
        memory_mb: f64,
    ) -> Self {
        Self {
            engine,
            operation: operation.into(),
            scenario,
            time_seconds: Some(non_negative(time_seconds)),
            memory_mb: Some(non_negative(memory_mb)),
            error: None,
        }
    }

    /// Creates a record for a pair whose trials all failed.
    pub fn failed(
        engine: Engine,
        operation: impl Into<String>,
        scenario: ScenarioName,
        error: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            operation: operation.into(),
            scenario,
            time_seconds: None,
            memory_mb: None,
            error: Some(error.into()),
        }
    }

    /// Returns whether both measurements are present.
    pub fn is_measured(&self) -> bool {
        self.time_seconds.is_some() && self.memory_mb.is_some()
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
