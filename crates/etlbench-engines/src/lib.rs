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

//! Engine adapters for ETLBench.
//!
//! Every engine implements [`TabularEngine`], one method per benchmarked
//! operation, and [`register_engine`] turns it into registry entries.
//!
//! | Tag | Implementation | Feature |
//! |-----|----------------|---------|
//! | `pandas` | eager columnar [`Frame`] on the `csv`, `arrow` and `parquet` crates | always |
//! | `duckdb` | embedded DuckDB, SQL over the files | `duckdb` |
//! | `polars` | Polars eager and lazy frames | `polars` |
//!
//! Engines whose feature is off are simply not registered; the harness
//! reports their pairs as not configured.
//!
//! # Example
//!
//! ```no_run
//! use etlbench_engines::{default_registry, EngineContext};
//! use std::path::Path;
//!
//! let context = EngineContext::from_data_dir(Path::new("data"), Path::new("results/output"));
//! let registry = default_registry(&context)?;
//! println!("{} adapters", registry.len());
//! # Ok::<(), etlbench_engines::EngineError>(())
//! ```

pub mod eager_engine;
pub mod error;
pub mod frame;
pub mod text;

#[cfg(feature = "duckdb")]
pub mod duckdb_engine;
#[cfg(feature = "polars")]
pub mod polars_engine;

pub use eager_engine::EagerEngine;
pub use error::{EngineError, EngineResult};
pub use frame::{Column, ColumnData, Frame};

#[cfg(feature = "duckdb")]
pub use duckdb_engine::DuckdbEngine;
#[cfg(feature = "polars")]
pub use polars_engine::PolarsEngine;

use etlbench::{AdapterResult, Encoding, Engine, Operation, Output, Registry};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Field delimiter of the dataset files.
pub const DELIMITER: u8 = b';';

/// File name of the exam items table.
pub const ITEMS_FILE: &str = "ITENS_PROVA_2023.csv";

/// Math score column.
pub const SCORE_COLUMN: &str = "NU_NOTA_MT";

/// Threshold used by the filter operation.
pub const SCORE_THRESHOLD: i64 = 600;

/// Math exam booklet column of the dataset.
pub const EXAM_COLUMN: &str = "CO_PROVA_MT";

/// Booklet column of the items table.
pub const ITEM_EXAM_COLUMN: &str = "CO_PROVA";

/// Knowledge area column of the items table.
pub const ITEM_AREA_COLUMN: &str = "SG_AREA";

/// School state column used for grouping.
pub const STATE_COLUMN: &str = "CO_UF_ESC";

/// Paths shared by every engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContext {
    /// Items table joined by the join operation. Always Latin-1.
    pub items_path: PathBuf,
    /// Directory receiving the files of the write operations.
    pub output_dir: PathBuf,
}

impl EngineContext {
    /// Creates a context.
    pub fn new(items_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            items_path: items_path.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Uses the items table under `data_dir`.
    pub fn from_data_dir(data_dir: &Path, output_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.join(ITEMS_FILE), output_dir)
    }

    /// Returns the file a write operation of `engine` produces.
    pub fn output_path(&self, engine: Engine, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_output.{}", engine.as_str(), extension))
    }

    /// Returns [`Self::output_path`] after creating the output directory.
    pub(crate) fn prepare_output(&self, engine: Engine, extension: &str) -> EngineResult<PathBuf> {
        let path = self.output_path(engine, extension);
        frame::ensure_parent(&path)?;
        Ok(path)
    }
}

/// One benchmarkable engine.
///
/// CSV inputs are `;`-separated with a header row and arrive in the
/// scenario encoding. Each method returns the engine's native result,
/// which the harness keeps alive until the post-operation memory reading.
pub trait TabularEngine {
    /// Engine tag.
    fn engine(&self) -> Engine;

    /// Loads the CSV dataset.
    fn read_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output>;

    /// Loads the Parquet dataset.
    fn read_parquet(&self, input: &Path) -> EngineResult<Output>;

    /// Rows with a math score above [`SCORE_THRESHOLD`].
    fn filter(&self, input: &Path, encoding: Encoding) -> EngineResult<Output>;

    /// Inner join with the distinct (booklet, area) pairs of the items table.
    fn join(&self, input: &Path, encoding: Encoding) -> EngineResult<Output>;

    /// Mean math score per school state.
    fn agg(&self, input: &Path, encoding: Encoding) -> EngineResult<Output>;

    /// Writes the dataset as CSV into the output directory.
    fn write_csv(&self, input: &Path, encoding: Encoding) -> EngineResult<Output>;

    /// Writes the dataset as Snappy-compressed Parquet into the output
    /// directory.
    fn write_parquet(&self, input: &Path, encoding: Encoding) -> EngineResult<Output>;
}

/// Runs one operation on an engine.
pub fn run_operation(
    engine: &dyn TabularEngine,
    operation: Operation,
    input: &Path,
    encoding: Encoding,
) -> EngineResult<Output> {
    match operation {
        Operation::ReadCsv => engine.read_csv(input, encoding),
        Operation::ReadParquet => engine.read_parquet(input),
        Operation::Filter => engine.filter(input, encoding),
        Operation::Join => engine.join(input, encoding),
        Operation::Agg => engine.agg(input, encoding),
        Operation::WriteCsv => engine.write_csv(input, encoding),
        Operation::WriteParquet => engine.write_parquet(input, encoding),
    }
}

/// Registers every operation of `engine`.
pub fn register_engine<E>(registry: &mut Registry, engine: E)
where
    E: TabularEngine + 'static,
{
    let tag = engine.engine();
    let engine = Rc::new(engine);
    for operation in Operation::ALL {
        let engine = Rc::clone(&engine);
        registry.register(
            tag,
            operation,
            move |input: &Path, encoding: Encoding| -> AdapterResult {
                Ok(run_operation(engine.as_ref(), operation, input, encoding)?)
            },
        );
    }
    debug!(engine = %tag, "registered engine");
}

/// Engines compiled into this build, in [`Engine::ALL`] order.
pub fn compiled_engines() -> Vec<Engine> {
    Engine::ALL
        .into_iter()
        .filter(|engine| match engine {
            Engine::Pandas => true,
            Engine::Duckdb => cfg!(feature = "duckdb"),
            Engine::Polars => cfg!(feature = "polars"),
        })
        .collect()
}

/// Registers every compiled engine.
pub fn register_all(registry: &mut Registry, context: &EngineContext) -> EngineResult<()> {
    #[cfg(feature = "duckdb")]
    register_engine(registry, DuckdbEngine::new(context.clone())?);
    #[cfg(feature = "polars")]
    register_engine(registry, PolarsEngine::new(context.clone()));
    register_engine(registry, EagerEngine::new(context.clone()));
    Ok(())
}

/// Creates a registry holding every compiled engine.
pub fn default_registry(context: &EngineContext) -> EngineResult<Registry> {
    let mut registry = Registry::new();
    register_all(&mut registry, context)?;
    Ok(registry)
}
