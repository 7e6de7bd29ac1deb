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

//! Polars engine.
//!
//! Files are parsed eagerly into a `DataFrame`; transformations go through
//! the lazy API. Polars reads UTF-8 only, so Latin-1 input is transcoded in
//! memory before parsing.

use crate::error::{EngineError, EngineResult};
use crate::text;
use crate::{
    EngineContext, TabularEngine, DELIMITER, EXAM_COLUMN, ITEM_AREA_COLUMN, ITEM_EXAM_COLUMN,
    SCORE_COLUMN, SCORE_THRESHOLD, STATE_COLUMN,
};
use etlbench::{Encoding, Engine, Output};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// Polars engine.
#[derive(Debug, Clone)]
pub struct PolarsEngine {
    context: EngineContext,
}

impl PolarsEngine {
    /// Creates the engine.
    pub fn new(context: EngineContext) -> Self {
        Self { context }
    }

    fn load(&self, input: &Path, encoding: Encoding) -> EngineResult<DataFrame> {
        let bytes = text::read_utf8(input, encoding)?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_separator(DELIMITER))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }
}

fn create(path: &Path) -> EngineResult<File> {
    File::create(path).map_err(|e| EngineError::io(path, e))
}

impl TabularEngine for PolarsEngine {
    fn engine(&self) -> Engine {
        Engine::Polars
    }

    fn read_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        Ok(Box::new(self.load(input, encoding)?))
    }

    fn read_parquet(&self, input: &Path) -> EngineResult<Output> {
        let file = File::open(input).map_err(|e| EngineError::io(input, e))?;
        Ok(Box::new(ParquetReader::new(file).finish()?))
    }

    fn filter(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let df = self
            .load(input, encoding)?
            .lazy()
            .filter(col(SCORE_COLUMN).gt(lit(SCORE_THRESHOLD)))
            .collect()?;
        Ok(Box::new(df))
    }

    fn join(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let items = self
            .load(&self.context.items_path, Encoding::Latin1)?
            .lazy()
            .select([col(ITEM_EXAM_COLUMN), col(ITEM_AREA_COLUMN)])
            .unique(None, UniqueKeepStrategy::Any);
        let df = self
            .load(input, encoding)?
            .lazy()
            .join(
                items,
                [col(EXAM_COLUMN)],
                [col(ITEM_EXAM_COLUMN)],
                JoinArgs::new(JoinType::Inner),
            )
            .collect()?;
        Ok(Box::new(df))
    }

    fn agg(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let df = self
            .load(input, encoding)?
            .lazy()
            .group_by([col(STATE_COLUMN)])
            .agg([col(SCORE_COLUMN).mean()])
            .collect()?;
        Ok(Box::new(df))
    }

    fn write_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let mut df = self.load(input, encoding)?;
        let path = self.context.prepare_output(self.engine(), "csv")?;
        let mut file = create(&path)?;
        CsvWriter::new(&mut file).finish(&mut df)?;
        Ok(Box::new(path))
    }

    fn write_parquet(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let mut df = self.load(input, encoding)?;
        let path = self.context.prepare_output(self.engine(), "parquet")?;
        ParquetWriter::new(create(&path)?)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)?;
        Ok(Box::new(path))
    }
}
