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

//! Consolidation of scenario result files produced by the driver.

use etlbench::{
    run_consolidation, Engine, Operation, ResultStore, ScenarioDriver, ScenarioName, NO_DATA,
};
use etlbench_test::adapters;
use etlbench_test::{quick_config, registry_with, DatasetFixture, FlatProbe};
use std::fs;
use tempfile::TempDir;

fn run_scenarios(data: &DatasetFixture, store: &ResultStore, scenarios: &[ScenarioName]) {
    let mut registry = registry_with(
        &[Engine::Duckdb, Engine::Polars],
        &[Operation::ReadCsv, Operation::Agg],
        adapters::fixed,
    );
    registry.register(Engine::Polars, Operation::Agg, adapters::failing("out of memory"));
    let config = quick_config(2)
        .with_engines(&[Engine::Duckdb, Engine::Polars])
        .with_operations(&[Operation::ReadCsv, Operation::Agg]);
    let driver = ScenarioDriver::with_probe(config, &registry, store.clone(), FlatProbe(10.0));

    for &name in scenarios {
        driver.run_scenario(&data.scenario(name, 2)).unwrap();
    }
}

#[test]
fn test_consolidates_every_scenario() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let store = ResultStore::new(results.path());
    run_scenarios(&data, &store, &ScenarioName::ALL);

    let report = run_consolidation(&store, &ScenarioName::ALL).unwrap();
    assert_eq!(report.consolidation.table.len(), 12);
    assert_eq!(report.consolidation.sources.len(), 3);
    assert!(report.consolidation.skipped.is_empty());
    assert_eq!(report.summary.len(), 12);
    assert_eq!(report.overview.len(), 6);

    let all = fs::read_to_string(&report.consolidated_path).unwrap();
    assert_eq!(all.lines().count(), 13);
    assert!(all.starts_with("engine,operation,scenario,time_seconds,memory_mb,error\n"));
}

#[test]
fn test_failed_pair_summarizes_to_no_data() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let store = ResultStore::new(results.path());
    run_scenarios(&data, &store, &[ScenarioName::Pequeno]);

    let report = run_consolidation(&store, &ScenarioName::ALL).unwrap();
    let failed = report
        .summary
        .iter()
        .find(|row| row.engine == Engine::Polars && row.operation == "agg")
        .unwrap();
    assert_eq!(failed.count, 0);
    assert_eq!(failed.time.mean, None);

    let summary = fs::read_to_string(&report.summary_path).unwrap();
    let line = summary
        .lines()
        .find(|l| l.starts_with("polars,agg,pequeno"))
        .unwrap();
    assert_eq!(line.matches(NO_DATA).count(), 4);
    assert!(!summary.contains("NaN"));
}

#[test]
fn test_consolidation_is_idempotent() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let store = ResultStore::new(results.path());
    run_scenarios(&data, &store, &[ScenarioName::Pequeno, ScenarioName::Grande]);

    let first = run_consolidation(&store, &ScenarioName::ALL).unwrap();
    let all = fs::read(&first.consolidated_path).unwrap();
    let summary = fs::read(&first.summary_path).unwrap();

    run_consolidation(&store, &ScenarioName::ALL).unwrap();
    assert_eq!(fs::read(store.consolidated_path()).unwrap(), all);
    assert_eq!(fs::read(store.summary_path()).unwrap(), summary);
}

#[test]
fn test_rerun_replaces_scenario_contribution() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let store = ResultStore::new(results.path());
    run_scenarios(&data, &store, &[ScenarioName::Medio]);
    let first = run_consolidation(&store, &ScenarioName::ALL).unwrap();

    run_scenarios(&data, &store, &[ScenarioName::Medio]);
    let second = run_consolidation(&store, &ScenarioName::ALL).unwrap();

    assert_eq!(
        first.consolidation.table.len(),
        second.consolidation.table.len()
    );
}

#[test]
fn test_corrupt_file_is_skipped() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let store = ResultStore::new(results.path());
    run_scenarios(&data, &store, &[ScenarioName::Pequeno, ScenarioName::Medio]);
    fs::write(
        store.scenario_path(ScenarioName::Medio),
        "engine,operation,scenario,time_seconds,memory_mb,error\nduckdb,agg,medio,abc,1.0,\n",
    )
    .unwrap();

    let report = run_consolidation(&store, &ScenarioName::ALL).unwrap();
    assert_eq!(report.consolidation.table.scenarios(), vec![ScenarioName::Pequeno]);
    assert_eq!(report.consolidation.skipped.len(), 2);
    assert!(report
        .consolidation
        .skipped
        .iter()
        .any(|e| !e.is_missing() && e.path() == &store.scenario_path(ScenarioName::Medio)));
}
