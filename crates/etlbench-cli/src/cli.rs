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

//! Command-line argument definitions.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use etlbench::{Engine, Operation, PersistMode, RunConfiguration, ScenarioName};
use etlbench_engines::EngineContext;
use std::path::PathBuf;

/// Default directory of the dataset files.
pub const DEFAULT_DATA_DIR: &str = "microdados_enem_2023/DADOS";

/// Options shared by the commands that run benchmarks.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding the dataset files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory receiving the result files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub results_dir: PathBuf,

    /// Items table for the join operation [default: <DATA_DIR>/ITENS_PROVA_2023.csv]
    #[arg(long, value_name = "FILE")]
    pub items: Option<PathBuf>,

    /// Directory for files written by write operations [default: <RESULTS_DIR>/output]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Trials per engine and operation
    #[arg(long, value_name = "N")]
    pub repeat: Option<u32>,

    /// Engines to run, comma separated (duckdb, polars, pandas)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub engines: Vec<Engine>,

    /// Operations to run, comma separated
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub operations: Vec<Operation>,

    /// JSON run configuration; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep earlier rows of the scenario result file
    #[arg(long)]
    pub append: bool,
}

impl RunArgs {
    /// Builds the run configuration from the optional file and the flags.
    pub fn configuration(&self) -> Result<RunConfiguration, CliError> {
        let mut config = match &self.config {
            Some(path) => RunConfiguration::from_json_file(path)?,
            None => RunConfiguration::default(),
        };
        if let Some(repeat) = self.repeat {
            config = config.with_repeat(repeat);
        }
        if !self.engines.is_empty() {
            config = config.with_engines(&self.engines);
        }
        if !self.operations.is_empty() {
            config = config.with_operations(&self.operations);
        }
        if self.append {
            config = config.with_persist_mode(PersistMode::Append);
        }
        config.validate().map_err(etlbench::ConfigError::from)?;
        Ok(config)
    }

    /// Paths handed to the engines.
    pub fn engine_context(&self) -> EngineContext {
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| self.results_dir.join("output"));
        match &self.items {
            Some(items) => EngineContext::new(items, output_dir),
            None => EngineContext::from_data_dir(&self.data_dir, output_dir),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scenario and save its result file
    Run {
        /// Scenario to run (pequeno, medio, grande)
        #[arg(value_name = "SCENARIO")]
        scenario: ScenarioName,

        #[command(flatten)]
        args: RunArgs,
    },

    /// Run every scenario in order, then consolidate
    RunAll {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Merge the scenario result files and write summary statistics
    Consolidate {
        /// Directory holding the result files
        #[arg(long, value_name = "DIR", default_value = ".")]
        results_dir: PathBuf,

        /// Also write a Markdown report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Show which engine and operation pairs are available
    Engines,
}

impl Commands {
    /// Executes the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Run { scenario, args } => commands::run(scenario, &args).map(|_| ()),
            Commands::RunAll { args } => commands::run_all(&args),
            Commands::Consolidate {
                results_dir,
                report,
            } => commands::consolidate(&results_dir, report.as_deref()).map(|_| ()),
            Commands::Engines => commands::engines(),
        }
    }
}
