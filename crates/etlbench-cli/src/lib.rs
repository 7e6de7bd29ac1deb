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

//! ETLBench CLI library.
//!
//! # Commands
//!
//! - **run**: benchmark one scenario and save `benchmark_results_<scenario>.csv`
//! - **run-all**: run `pequeno`, `medio` and `grande`, then consolidate
//! - **consolidate**: write `benchmark_results_all.csv` and `benchmark_summary.csv`
//! - **engines**: show the engine/operation availability matrix
//!
//! # Examples
//!
//! ```no_run
//! use etlbench_cli::commands::consolidate;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), etlbench_cli::error::CliError> {
//! let report = consolidate(Path::new("results"), Some(Path::new("report.md")))?;
//! println!("{} rows", report.consolidation.table.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
