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

//! `run` and `run-all` commands.

use crate::cli::RunArgs;
use crate::commands::consolidate;
use crate::error::CliError;
use etlbench::reporters::print_scenario_run;
use etlbench::{
    Registry, ResultStore, RunConfiguration, Scenario, ScenarioDriver, ScenarioName, ScenarioRun,
};
use etlbench_engines::default_registry;
use tracing::{error, info, warn};

/// Runs one scenario with every compiled engine.
///
/// # Errors
///
/// Returns `Err` if the configuration is invalid, the dataset is missing or
/// the result file cannot be written. Failed operations are not errors;
/// they are recorded in the result file.
pub fn run(scenario: ScenarioName, args: &RunArgs) -> Result<ScenarioRun, CliError> {
    let config = args.configuration()?;
    let registry = build_registry(args, &config)?;
    let repeat_count = config.repeat_count;
    let driver = ScenarioDriver::new(config, &registry, ResultStore::new(&args.results_dir));

    let run = driver.run_scenario(&Scenario::from_data_dir(
        scenario,
        &args.data_dir,
        repeat_count,
    ))?;
    print_scenario_run(&run);
    Ok(run)
}

/// Runs every scenario, smallest first, then consolidates.
///
/// A scenario that cannot run is logged and the next one still runs.
///
/// # Errors
///
/// Returns [`CliError::ScenariosFailed`] after consolidating if any
/// scenario failed.
pub fn run_all(args: &RunArgs) -> Result<(), CliError> {
    let config = args.configuration()?;
    let registry = build_registry(args, &config)?;
    let repeat_count = config.repeat_count;
    let driver = ScenarioDriver::new(config, &registry, ResultStore::new(&args.results_dir));

    let mut failed = Vec::new();
    for name in ScenarioName::ALL {
        let scenario = Scenario::from_data_dir(name, &args.data_dir, repeat_count);
        match driver.run_scenario(&scenario) {
            Ok(run) => print_scenario_run(&run),
            Err(err) => {
                error!(scenario = %name, error = %err, "scenario failed");
                failed.push(name);
            }
        }
    }

    consolidate(&args.results_dir, None)?;

    if failed.is_empty() {
        info!("all scenarios completed");
        Ok(())
    } else {
        Err(CliError::ScenariosFailed(failed))
    }
}

/// Registers every compiled engine and logs the requested pairs it cannot serve.
fn build_registry(args: &RunArgs, config: &RunConfiguration) -> Result<Registry, CliError> {
    let registry = default_registry(&args.engine_context())?;
    for (engine, operation) in registry.missing(config) {
        warn!(%engine, %operation, "not configured in this build; will be skipped");
    }
    Ok(registry)
}
