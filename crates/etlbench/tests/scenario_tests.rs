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

//! End-to-end scenario runs against stub adapters.
//!
//! Covers:
//! - one aggregate record per registered pair, in configuration order
//! - failing and panicking adapters recorded as data
//! - missing adapters skipped without aborting
//! - setup failures leaving no result file behind
//! - append mode refusing to replace an unreadable result file

use etlbench::{
    read_records, Encoding, Engine, Operation, PersistMode, ResultStore, ScenarioDriver,
    ScenarioError, ScenarioName, SetupError, StoreError,
};
use etlbench_test::adapters::{self, CallLog};
use etlbench_test::{quick_config, registry_with, DatasetFixture, FlatProbe, ScriptedProbe};
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CATEGORY 1: Successful runs
// ============================================================================

#[test]
fn test_three_engines_one_operation() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&Engine::ALL, &[Operation::ReadCsv], adapters::fixed);
    let config = quick_config(3)
        .with_engines(&[Engine::Duckdb, Engine::Pandas, Engine::Polars])
        .with_operations(&[Operation::ReadCsv]);

    let driver = ScenarioDriver::with_probe(
        config,
        &registry,
        ResultStore::new(results.path()),
        FlatProbe(50.0),
    );
    let run = driver
        .run_scenario(&data.scenario(ScenarioName::Pequeno, 3))
        .unwrap();

    assert_eq!(run.records.len(), 3);
    let engines: Vec<Engine> = run.records.iter().map(|r| r.engine).collect();
    assert_eq!(engines, vec![Engine::Duckdb, Engine::Pandas, Engine::Polars]);
    for (record, pair) in run.records.iter().zip(&run.pairs) {
        assert_eq!(record.operation, "read_csv");
        assert_eq!(record.scenario, ScenarioName::Pequeno);
        assert!(record.error.is_none());
        assert!(record.time_seconds.unwrap() >= 0.0);
        assert_eq!(record.memory_mb, Some(0.0));
        assert_eq!((pair.attempted, pair.succeeded), (3, 3));
    }

    let persisted = read_records(&run.output_path, Some(ScenarioName::Pequeno)).unwrap();
    assert_eq!(persisted.len(), 3);
    assert!(run
        .output_path
        .ends_with("benchmark_results_pequeno.csv"));
}

#[test]
fn test_memory_delta_from_scripted_readings() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&[Engine::Polars], &[Operation::Agg], adapters::fixed);
    let config = quick_config(2)
        .with_engines(&[Engine::Polars])
        .with_operations(&[Operation::Agg]);

    // Per trial: three baseline readings (minimum wins) then one peak reading.
    let probe = ScriptedProbe::new(&[
        110.0, 100.0, 105.0, 140.0, // trial 1: 140 - 100 = 40
        100.0, 100.0, 100.0, 90.0, // trial 2: floored at 0
    ]);
    let driver =
        ScenarioDriver::with_probe(config, &registry, ResultStore::new(results.path()), probe);
    let run = driver
        .run_scenario(&data.scenario(ScenarioName::Medio, 2))
        .unwrap();

    assert_eq!(run.records[0].memory_mb, Some(20.0));
}

#[test]
fn test_operations_receive_scenario_inputs() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let log = CallLog::default();
    let registry = registry_with(
        &[Engine::Duckdb],
        &[Operation::ReadCsv, Operation::ReadParquet],
        || adapters::recording(&log),
    );
    let config = quick_config(1)
        .with_engines(&[Engine::Duckdb])
        .with_operations(&[Operation::ReadCsv, Operation::ReadParquet]);

    let scenario = data.scenario(ScenarioName::Grande, 1);
    let driver =
        ScenarioDriver::with_probe(config, &registry, ResultStore::new(results.path()), FlatProbe(1.0));
    driver.run_scenario(&scenario).unwrap();

    assert_eq!(
        log.calls(),
        vec![
            (scenario.csv_path().to_path_buf(), Encoding::Latin1),
            (scenario.parquet_path().to_path_buf(), Encoding::Latin1),
        ]
    );
}

// ============================================================================
// CATEGORY 2: Failures recorded as data
// ============================================================================

#[test]
fn test_always_failing_adapter_is_recorded() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let mut registry = registry_with(
        &[Engine::Duckdb, Engine::Pandas],
        &[Operation::Filter],
        adapters::fixed,
    );
    registry.register(
        Engine::Pandas,
        Operation::Filter,
        adapters::failing("column 'NU_NOTA_MT' not found"),
    );
    let config = quick_config(3)
        .with_engines(&[Engine::Duckdb, Engine::Pandas])
        .with_operations(&[Operation::Filter]);

    let driver =
        ScenarioDriver::with_probe(config, &registry, ResultStore::new(results.path()), FlatProbe(1.0));
    let run = driver
        .run_scenario(&data.scenario(ScenarioName::Pequeno, 3))
        .unwrap();

    assert_eq!(run.records.len(), 2);
    assert!(run.records[0].is_measured());

    let failed = &run.records[1];
    assert_eq!(failed.engine, Engine::Pandas);
    assert_eq!(failed.time_seconds, None);
    assert_eq!(failed.memory_mb, None);
    assert!(failed.error.as_deref().unwrap().contains("NU_NOTA_MT"));
    assert_eq!(run.failed_count(), 1);

    // The file keeps six decimals, so times are compared to that precision.
    let persisted = read_records(&run.output_path, None).unwrap();
    assert_eq!(persisted.len(), run.records.len());
    for (stored, record) in persisted.iter().zip(&run.records) {
        assert_eq!(stored.engine, record.engine);
        assert_eq!(stored.operation, record.operation);
        assert_eq!(stored.scenario, record.scenario);
        assert_eq!(stored.error, record.error);
        assert_eq!(stored.memory_mb, record.memory_mb);
        match (stored.time_seconds, record.time_seconds) {
            (Some(a), Some(b)) => assert!((a - b).abs() <= 1e-6, "{} vs {}", a, b),
            (a, b) => assert_eq!(a, b),
        }
    }
}

#[test]
fn test_panicking_adapter_is_recorded() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&[Engine::Polars], &[Operation::Join], || {
        adapters::panicking("index out of bounds")
    });
    let config = quick_config(2)
        .with_engines(&[Engine::Polars])
        .with_operations(&[Operation::Join]);

    let driver =
        ScenarioDriver::with_probe(config, &registry, ResultStore::new(results.path()), FlatProbe(1.0));
    let run = driver
        .run_scenario(&data.scenario(ScenarioName::Pequeno, 2))
        .unwrap();

    assert_eq!(run.pairs[0].succeeded, 0);
    assert!(run.records[0]
        .error
        .as_deref()
        .unwrap()
        .contains("index out of bounds"));
}

#[test]
fn test_partial_failures_average_successes() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&[Engine::Pandas], &[Operation::WriteCsv], || {
        adapters::flaky(2)
    });
    let config = quick_config(4)
        .with_engines(&[Engine::Pandas])
        .with_operations(&[Operation::WriteCsv]);

    let driver =
        ScenarioDriver::with_probe(config, &registry, ResultStore::new(results.path()), FlatProbe(1.0));
    let run = driver
        .run_scenario(&data.scenario(ScenarioName::Pequeno, 4))
        .unwrap();

    assert_eq!((run.pairs[0].attempted, run.pairs[0].succeeded), (4, 2));
    assert!(run.records[0].is_measured());
    assert!(run.records[0].error.is_none());
}

#[test]
fn test_missing_adapter_is_skipped() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&[Engine::Duckdb], &[Operation::Agg], adapters::fixed);
    let config = quick_config(1)
        .with_engines(&[Engine::Duckdb, Engine::Polars])
        .with_operations(&[Operation::Agg]);

    let driver =
        ScenarioDriver::with_probe(config, &registry, ResultStore::new(results.path()), FlatProbe(1.0));
    let run = driver
        .run_scenario(&data.scenario(ScenarioName::Pequeno, 1))
        .unwrap();

    assert_eq!(run.records.len(), 1);
    assert_eq!(run.skipped, vec![(Engine::Polars, Operation::Agg)]);
}

// ============================================================================
// CATEGORY 3: Setup errors and persistence
// ============================================================================

#[test]
fn test_missing_dataset_writes_nothing() {
    let data = DatasetFixture::with_scenarios(&[ScenarioName::Pequeno]);
    let results = TempDir::new().unwrap();
    let log = CallLog::default();
    let registry = registry_with(&Engine::ALL, &Operation::ALL, || adapters::recording(&log));
    let store = ResultStore::new(results.path());

    let driver = ScenarioDriver::with_probe(quick_config(1), &registry, store.clone(), FlatProbe(1.0));
    let err = driver
        .run_scenario(&data.scenario(ScenarioName::Medio, 1))
        .unwrap_err();

    assert!(matches!(
        err,
        ScenarioError::Setup(SetupError::MissingDataset {
            scenario: ScenarioName::Medio,
            ..
        })
    ));
    assert!(log.is_empty());
    assert!(!store.scenario_path(ScenarioName::Medio).exists());
}

#[test]
fn test_zero_repeat_is_setup_error() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&[Engine::Duckdb], &[Operation::ReadCsv], adapters::fixed);
    let driver = ScenarioDriver::with_probe(
        quick_config(1),
        &registry,
        ResultStore::new(results.path()),
        FlatProbe(1.0),
    );

    let err = driver
        .run_scenario(&data.scenario(ScenarioName::Pequeno, 0))
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Setup(SetupError::InvalidConfig { .. })));
}

#[test]
fn test_append_mode_keeps_earlier_rows() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let registry = registry_with(&[Engine::Duckdb], &[Operation::ReadCsv], adapters::fixed);
    let config = quick_config(1)
        .with_engines(&[Engine::Duckdb])
        .with_operations(&[Operation::ReadCsv]);
    let scenario = data.scenario(ScenarioName::Pequeno, 1);
    let store = ResultStore::new(results.path());

    let overwrite =
        ScenarioDriver::with_probe(config.clone(), &registry, store.clone(), FlatProbe(1.0));
    overwrite.run_scenario(&scenario).unwrap();
    overwrite.run_scenario(&scenario).unwrap();
    let path = store.scenario_path(ScenarioName::Pequeno);
    assert_eq!(read_records(&path, None).unwrap().len(), 1);

    let append = ScenarioDriver::with_probe(
        config.with_persist_mode(PersistMode::Append),
        &registry,
        store.clone(),
        FlatProbe(1.0),
    );
    append.run_scenario(&scenario).unwrap();
    assert_eq!(read_records(&path, None).unwrap().len(), 2);
}

#[test]
fn test_append_to_corrupt_file_fails_before_trials() {
    let data = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let log = CallLog::default();
    let registry = registry_with(&[Engine::Polars], &[Operation::ReadCsv], || {
        adapters::recording(&log)
    });
    let config = quick_config(2)
        .with_engines(&[Engine::Polars])
        .with_operations(&[Operation::ReadCsv])
        .with_persist_mode(PersistMode::Append);
    let store = ResultStore::new(results.path());
    let path = store.scenario_path(ScenarioName::Grande);
    fs::write(&path, "engine,operation\npolars\n").unwrap();

    let driver = ScenarioDriver::with_probe(config, &registry, store, FlatProbe(1.0));
    let err = driver
        .run_scenario(&data.scenario(ScenarioName::Grande, 2))
        .unwrap_err();

    assert!(matches!(
        err,
        ScenarioError::Persist(StoreError::AppendTarget { .. })
    ));
    assert!(log.is_empty());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "engine,operation\npolars\n"
    );
}
