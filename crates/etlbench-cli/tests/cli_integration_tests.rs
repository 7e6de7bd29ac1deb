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

//! End-to-end tests of the `etlbench` binary.

use assert_cmd::Command;
use etlbench::ScenarioName;
use etlbench_test::{DatasetFixture, SAMPLE_ROWS};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn etlbench() -> Command {
    Command::cargo_bin("etlbench").unwrap()
}

fn run_args(fixture: &DatasetFixture, results: &TempDir) -> Vec<String> {
    vec![
        "--data-dir".to_string(),
        fixture.path().display().to_string(),
        "--results-dir".to_string(),
        results.path().display().to_string(),
        "--repeat".to_string(),
        "1".to_string(),
        "--engines".to_string(),
        "pandas".to_string(),
    ]
}

// ===== Help and version =====

#[test]
fn test_help() {
    etlbench()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run-all"))
        .stdout(predicate::str::contains("consolidate"));
}

#[test]
fn test_version() {
    etlbench()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("etlbench"));
}

#[test]
fn test_run_help_lists_flags() {
    etlbench()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--repeat"))
        .stdout(predicate::str::contains("--data-dir"));
}

// ===== Engines =====

#[test]
fn test_engines_matrix() {
    etlbench()
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("read_csv"))
        .stdout(predicate::str::contains("configured"));
}

#[test]
#[cfg(feature = "all-engines")]
fn test_default_build_compiles_every_engine() {
    etlbench()
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled engines: duckdb, polars, pandas"))
        .stdout(predicate::str::contains("not configured").not());
}

// ===== Run =====

#[test]
fn test_run_writes_scenario_file() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();

    etlbench()
        .args(["run", "pequeno"])
        .args(run_args(&fixture, &results))
        .args(["--operations", "read_csv,filter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SCENARIO: pequeno"));

    let content = fs::read_to_string(results.path().join("benchmark_results_pequeno.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("pandas,read_csv,pequeno,"));
    assert!(lines[2].starts_with("pandas,filter,pequeno,"));
}

#[test]
fn test_run_records_failed_operation_without_failing() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();

    // The fixture has no parquet file, so read_parquet fails inside the trial.
    etlbench()
        .args(["run", "pequeno"])
        .args(run_args(&fixture, &results))
        .args(["--operations", "read_parquet"])
        .assert()
        .success();

    let content = fs::read_to_string(results.path().join("benchmark_results_pequeno.csv")).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert!(row.starts_with("pandas,read_parquet,pequeno,,,"));
}

#[test]
fn test_run_writes_engine_output() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();

    etlbench()
        .args(["run", "pequeno"])
        .args(run_args(&fixture, &results))
        .args(["--operations", "write_csv"])
        .assert()
        .success();

    let output = results.path().join("output").join("pandas_output.csv");
    let content = fs::read_to_string(output).unwrap();
    assert_eq!(content.lines().count(), SAMPLE_ROWS + 1);
}

#[test]
fn test_run_missing_dataset_fails() {
    let fixture = DatasetFixture::with_scenarios(&[]);
    let results = TempDir::new().unwrap();

    etlbench()
        .args(["run", "medio"])
        .args(run_args(&fixture, &results))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    assert!(!results.path().join("benchmark_results_medio.csv").exists());
}

#[test]
fn test_run_zero_repeat_fails() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();

    etlbench()
        .args(["run", "pequeno", "--data-dir"])
        .arg(fixture.path())
        .arg("--results-dir")
        .arg(results.path())
        .args(["--repeat", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_run_config_file() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();
    let config = results.path().join("bench.json");
    fs::write(
        &config,
        r#"{"repeat_count": 2, "engines": ["pandas"], "operations": ["agg"]}"#,
    )
    .unwrap();

    etlbench()
        .args(["run", "pequeno", "--data-dir"])
        .arg(fixture.path())
        .arg("--results-dir")
        .arg(results.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2"));

    let content = fs::read_to_string(results.path().join("benchmark_results_pequeno.csv")).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("pandas,agg,pequeno,"));
}

// ===== Invalid input =====

#[test]
fn test_unknown_scenario_rejected() {
    etlbench()
        .args(["run", "enorme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("enorme"));
}

#[test]
fn test_unknown_engine_rejected() {
    etlbench()
        .args(["run", "pequeno", "--engines", "spark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spark"));
}

#[test]
fn test_no_subcommand_fails() {
    etlbench().assert().failure();
}

// ===== Consolidate =====

#[test]
fn test_consolidate_empty_results_dir() {
    let results = TempDir::new().unwrap();

    etlbench()
        .arg("consolidate")
        .arg("--results-dir")
        .arg(results.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 0"));

    let all = fs::read_to_string(results.path().join("benchmark_results_all.csv")).unwrap();
    assert_eq!(all.lines().count(), 1);
}

#[test]
fn test_consolidate_writes_report() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();

    etlbench()
        .args(["run", "pequeno"])
        .args(run_args(&fixture, &results))
        .args(["--operations", "read_csv,agg"])
        .assert()
        .success();

    let report = results.path().join("report.md");
    etlbench()
        .arg("consolidate")
        .arg("--results-dir")
        .arg(results.path())
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 2"));

    let markdown = fs::read_to_string(report).unwrap();
    assert!(markdown.starts_with("# ETL Engine Benchmark"));
    assert!(markdown.contains("read_csv"));

    let summary = fs::read_to_string(results.path().join("benchmark_summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
}

// ===== Run all =====

#[test]
fn test_run_all_completes() {
    let fixture = DatasetFixture::new();
    let results = TempDir::new().unwrap();

    etlbench()
        .arg("run-all")
        .args(run_args(&fixture, &results))
        .args(["--operations", "read_csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONSOLIDATION"));

    let all = fs::read_to_string(results.path().join("benchmark_results_all.csv")).unwrap();
    assert_eq!(all.lines().count(), 4);
}

#[test]
fn test_run_all_continues_past_missing_scenario() {
    let fixture = DatasetFixture::with_scenarios(&[ScenarioName::Pequeno, ScenarioName::Grande]);
    let results = TempDir::new().unwrap();

    etlbench()
        .arg("run-all")
        .args(run_args(&fixture, &results))
        .args(["--operations", "read_csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("medio"));

    assert!(results.path().join("benchmark_results_pequeno.csv").exists());
    assert!(!results.path().join("benchmark_results_medio.csv").exists());
    assert!(results.path().join("benchmark_results_grande.csv").exists());

    let all = fs::read_to_string(results.path().join("benchmark_results_all.csv")).unwrap();
    assert_eq!(all.lines().count(), 3);
}
