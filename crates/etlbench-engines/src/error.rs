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

//! Error types for engine operations.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of an engine operation.
///
/// Adapters hand these to the harness boxed as
/// [`etlbench::AdapterError`], where only the message is kept.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reading or writing a file failed.
    #[error("I/O error for '{path}': {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent.
    ///
    /// A frequent cause is a wrong delimiter, which collapses every column
    /// into one.
    #[error("column '{column}' not found (available: {available})")]
    MissingColumn {
        /// Column looked up.
        column: String,
        /// Columns that exist.
        available: String,
    },

    /// A row has a different number of fields than the header.
    #[error("row {row} has {actual} fields, expected {expected}")]
    RowWidth {
        /// 1-based data row.
        row: usize,
        /// Header width.
        expected: usize,
        /// Fields in the row.
        actual: usize,
    },

    /// CSV library error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Arrow error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// DuckDB error.
    #[cfg(feature = "duckdb")]
    #[error("DuckDB error: {0}")]
    Duckdb(#[from] duckdb::Error),

    /// Polars error.
    #[cfg(feature = "polars")]
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_column<'a>(
        column: &str,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        EngineError::MissingColumn {
            column: column.to_string(),
            available: available.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
