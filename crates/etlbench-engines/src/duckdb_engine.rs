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

//! Embedded DuckDB engine.
//!
//! Each operation is one SQL statement over the files, run on a single
//! in-memory connection. Results are materialized as Arrow batches.

use crate::error::{EngineError, EngineResult};
use crate::{
    EngineContext, TabularEngine, EXAM_COLUMN, ITEM_AREA_COLUMN, ITEM_EXAM_COLUMN, SCORE_COLUMN,
    SCORE_THRESHOLD, STATE_COLUMN,
};
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::Connection;
use etlbench::{Encoding, Engine, Output};
use std::path::Path;
use tracing::debug;

/// DuckDB engine.
pub struct DuckdbEngine {
    context: EngineContext,
    conn: Connection,
}

impl DuckdbEngine {
    /// Opens an in-memory database.
    pub fn new(context: EngineContext) -> EngineResult<Self> {
        Ok(Self {
            context,
            conn: Connection::open_in_memory()?,
        })
    }

    fn query(&self, sql: &str) -> EngineResult<Vec<RecordBatch>> {
        debug!(sql, "duckdb query");
        let mut stmt = self.conn.prepare(sql)?;
        let batches = stmt.query_arrow([])?.collect();
        Ok(batches)
    }

    fn copy_to(
        &self,
        input: &Path,
        encoding: Encoding,
        extension: &str,
        options: &str,
    ) -> EngineResult<Output> {
        let path = self.context.prepare_output(self.engine(), extension)?;
        let sql = format!(
            "COPY (SELECT * FROM {}) TO {} ({})",
            csv_source(input, encoding),
            quote(&path),
            options
        );
        debug!(sql, "duckdb copy");
        self.conn.execute_batch(&sql)?;
        Ok(Box::new(path))
    }
}

impl std::fmt::Debug for DuckdbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckdbEngine")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Quotes a path as a SQL string literal.
fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "''"))
}

/// `read_csv_auto` call for a `;`-separated file.
fn csv_source(path: &Path, encoding: Encoding) -> String {
    let encoding = match encoding {
        Encoding::Latin1 => ", encoding='latin-1'",
        Encoding::Utf8 => "",
    };
    format!("read_csv_auto({}, sep=';'{})", quote(path), encoding)
}

impl TabularEngine for DuckdbEngine {
    fn engine(&self) -> Engine {
        Engine::Duckdb
    }

    fn read_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let sql = format!("SELECT * FROM {}", csv_source(input, encoding));
        Ok(Box::new(self.query(&sql)?))
    }

    fn read_parquet(&self, input: &Path) -> EngineResult<Output> {
        if !input.is_file() {
            return Err(EngineError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "parquet file not found"),
            ));
        }
        let sql = format!("SELECT * FROM read_parquet({})", quote(input));
        Ok(Box::new(self.query(&sql)?))
    }

    fn filter(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} > {}",
            csv_source(input, encoding),
            SCORE_COLUMN,
            SCORE_THRESHOLD
        );
        Ok(Box::new(self.query(&sql)?))
    }

    fn join(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let sql = format!(
            "SELECT * FROM (SELECT * FROM {data}) AS dados \
             INNER JOIN (SELECT DISTINCT {exam}, {area} FROM {items}) AS itens \
             ON dados.{key} = itens.{exam}",
            data = csv_source(input, encoding),
            items = csv_source(&self.context.items_path, Encoding::Latin1),
            exam = ITEM_EXAM_COLUMN,
            area = ITEM_AREA_COLUMN,
            key = EXAM_COLUMN,
        );
        Ok(Box::new(self.query(&sql)?))
    }

    fn agg(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let sql = format!(
            "SELECT {state}, AVG({score}) AS {score} FROM {data} GROUP BY {state}",
            state = STATE_COLUMN,
            score = SCORE_COLUMN,
            data = csv_source(input, encoding),
        );
        Ok(Box::new(self.query(&sql)?))
    }

    fn write_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        self.copy_to(input, encoding, "csv", "FORMAT CSV, HEADER")
    }

    fn write_parquet(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        self.copy_to(input, encoding, "parquet", "FORMAT PARQUET, COMPRESSION SNAPPY")
    }
}
