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

//! ETLBench Command Line Interface

use clap::Parser;
use etlbench_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "etlbench=info,etlbench_engines=info,etlbench_cli=info";

/// ETLBench - tabular engine benchmark harness
///
/// Times ETL operations on DuckDB, Polars and an eager columnar engine over
/// three dataset sizes, and consolidates the results.
///
/// # Examples
///
/// ```bash
/// # Benchmark the small sample with 3 trials per operation
/// etlbench run pequeno --repeat 3
///
/// # Everything, then a Markdown report
/// etlbench run-all --results-dir results
/// etlbench consolidate --results-dir results --report results/report.md
/// ```
#[derive(Parser)]
#[command(name = "etlbench")]
#[command(author, version, about = "ETLBench - tabular engine benchmark harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
