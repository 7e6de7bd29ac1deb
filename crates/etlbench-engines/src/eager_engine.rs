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

//! In-process eager engine, registered under the `pandas` tag.
//!
//! Every operation loads the whole CSV into a [`Frame`] first, the way a
//! dataframe library without lazy evaluation would.

use crate::error::EngineResult;
use crate::frame::Frame;
use crate::{
    EngineContext, TabularEngine, DELIMITER, EXAM_COLUMN, ITEM_AREA_COLUMN, ITEM_EXAM_COLUMN,
    SCORE_COLUMN, SCORE_THRESHOLD, STATE_COLUMN,
};
use etlbench::{Encoding, Engine, Output};
use parquet::basic::Compression;
use std::path::Path;

/// Eager columnar engine.
#[derive(Debug, Clone)]
pub struct EagerEngine {
    context: EngineContext,
}

impl EagerEngine {
    /// Creates the engine.
    pub fn new(context: EngineContext) -> Self {
        Self { context }
    }

    fn load(&self, input: &Path, encoding: Encoding) -> EngineResult<Frame> {
        Frame::read_csv(input, encoding, DELIMITER)
    }
}

impl TabularEngine for EagerEngine {
    fn engine(&self) -> Engine {
        Engine::Pandas
    }

    fn read_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        Ok(Box::new(self.load(input, encoding)?))
    }

    fn read_parquet(&self, input: &Path) -> EngineResult<Output> {
        Ok(Box::new(Frame::read_parquet(input)?))
    }

    fn filter(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let frame = self.load(input, encoding)?;
        Ok(Box::new(
            frame.filter_gt(SCORE_COLUMN, SCORE_THRESHOLD as f64)?,
        ))
    }

    fn join(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let data = self.load(input, encoding)?;
        let items = self
            .load(&self.context.items_path, Encoding::Latin1)?
            .select(&[ITEM_EXAM_COLUMN, ITEM_AREA_COLUMN])?
            .distinct();
        Ok(Box::new(data.inner_join(
            &items,
            EXAM_COLUMN,
            ITEM_EXAM_COLUMN,
        )?))
    }

    fn agg(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let frame = self.load(input, encoding)?;
        Ok(Box::new(frame.group_mean(STATE_COLUMN, SCORE_COLUMN)?))
    }

    fn write_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let frame = self.load(input, encoding)?;
        let path = self.context.prepare_output(self.engine(), "csv")?;
        frame.write_csv(&path)?;
        Ok(Box::new(path))
    }

    fn write_parquet(&self, input: &Path, encoding: Encoding) -> EngineResult<Output> {
        let frame = self.load(input, encoding)?;
        let path = self.context.prepare_output(self.engine(), "parquet")?;
        frame.write_parquet(&path, Compression::SNAPPY)?;
        Ok(Box::new(path))
    }
}
