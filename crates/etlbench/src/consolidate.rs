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

//! Consolidation of per-scenario result files.
//!
//! The consolidated table is keyed by scenario, so re-running a scenario and
//! consolidating again replaces that scenario's rows instead of duplicating
//! them. Output is ordered by scenario, engine and operation tag, which keeps
//! repeated consolidations byte-identical.

use crate::core::model::{Engine, ResultRecord, ScenarioName};
use crate::error::{ConsolidationError, StoreError};
use crate::harness::aggregator::{mean, sample_std_dev};
use crate::store::{read_records, ResultStore};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{info, warn};

/// Union of the per-scenario tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedTable {
    scenarios: BTreeMap<ScenarioName, Vec<ResultRecord>>,
}

impl ConsolidatedTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rows of a scenario, returning the rows it replaced.
    pub fn replace_scenario(
        &mut self,
        scenario: ScenarioName,
        records: Vec<ResultRecord>,
    ) -> Option<Vec<ResultRecord>> {
        self.scenarios.insert(scenario, records)
    }

    /// Returns every row, scenarios in order.
    pub fn records(&self) -> Vec<ResultRecord> {
        self.scenarios.values().flatten().cloned().collect()
    }

    /// Returns the rows of one scenario.
    pub fn scenario_records(&self, scenario: ScenarioName) -> &[ResultRecord] {
        self.scenarios
            .get(&scenario)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.scenarios.values().map(Vec::len).sum()
    }

    /// Returns whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the scenarios present.
    pub fn scenarios(&self) -> Vec<ScenarioName> {
        self.scenarios.keys().copied().collect()
    }

    /// Returns the distinct engines seen.
    pub fn engines(&self) -> BTreeSet<Engine> {
        self.scenarios
            .values()
            .flatten()
            .map(|r| r.engine)
            .collect()
    }

    /// Returns the distinct operation tags seen.
    pub fn operations(&self) -> BTreeSet<String> {
        self.scenarios
            .values()
            .flatten()
            .map(|r| r.operation.clone())
            .collect()
    }
}

/// Result of reading the per-scenario files.
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    /// Rows read.
    pub table: ConsolidatedTable,
    /// Files that contributed rows.
    pub sources: Vec<PathBuf>,
    /// Files that were missing or rejected.
    pub skipped: Vec<ConsolidationError>,
}

/// Reads the result file of every listed scenario.
///
/// Missing files are logged at info level, unreadable or corrupt ones at
/// warn level. Neither stops the consolidation.
pub fn consolidate(store: &ResultStore, scenarios: &[ScenarioName]) -> Consolidation {
    let mut consolidation = Consolidation::default();

    for &scenario in scenarios {
        let path = store.scenario_path(scenario);
        match read_records(&path, Some(scenario)) {
            Ok(records) => {
                info!(
                    scenario = %scenario,
                    rows = records.len(),
                    path = %path.display(),
                    "loaded scenario results"
                );
                consolidation.table.replace_scenario(scenario, records);
                consolidation.sources.push(path);
            }
            Err(err) if err.is_missing() => {
                info!(scenario = %scenario, path = %path.display(), "no results for scenario");
                consolidation.skipped.push(err);
            }
            Err(err) => {
                warn!(scenario = %scenario, error = %err, "skipping result file");
                consolidation.skipped.push(err);
            }
        }
    }

    consolidation
}

/// Mean and sample standard deviation of one measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stat {
    /// Mean; `None` without measured rows.
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two measured rows.
    pub std_dev: Option<f64>,
}

impl Stat {
    fn of(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            std_dev: sample_std_dev(values),
        }
    }
}

/// Statistics of one (scenario, engine, operation) group.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Engine.
    pub engine: Engine,
    /// Operation tag.
    pub operation: String,
    /// Scenario.
    pub scenario: ScenarioName,
    /// Rows with both measurements present.
    pub count: usize,
    /// Time statistics in seconds.
    pub time: Stat,
    /// Memory statistics in megabytes.
    pub memory: Stat,
}

/// Groups the table by (scenario, engine, operation) and computes statistics.
///
/// Groups made only of failed rows are kept with a count of zero so their
/// absence of data stays visible.
pub fn summarize(table: &ConsolidatedTable) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(ScenarioName, Engine, &str), (Vec<f64>, Vec<f64>)> =
        BTreeMap::new();

    for record in table.scenarios.values().flatten() {
        let group = groups
            .entry((record.scenario, record.engine, record.operation.as_str()))
            .or_default();
        if let (Some(time), Some(memory)) = (record.time_seconds, record.memory_mb) {
            group.0.push(time);
            group.1.push(memory);
        }
    }

    groups
        .into_iter()
        .map(|((scenario, engine, operation), (times, memories))| SummaryRow {
            engine,
            operation: operation.to_string(),
            scenario,
            count: times.len(),
            time: Stat::of(&times),
            memory: Stat::of(&memories),
        })
        .collect()
}

/// Per-(engine, scenario) mean of the per-operation means.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    /// Engine.
    pub engine: Engine,
    /// Scenario.
    pub scenario: ScenarioName,
    /// Operations with a time mean.
    pub operations: usize,
    /// Mean of the operation time means.
    pub time_mean: Option<f64>,
    /// Mean of the operation memory means.
    pub memory_mean: Option<f64>,
}

/// Collapses a summary into one row per (engine, scenario).
pub fn overview(summary: &[SummaryRow]) -> Vec<OverviewRow> {
    let mut groups: BTreeMap<(Engine, ScenarioName), (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for row in summary {
        let group = groups.entry((row.engine, row.scenario)).or_default();
        if let Some(time) = row.time.mean {
            group.0.push(time);
        }
        if let Some(memory) = row.memory.mean {
            group.1.push(memory);
        }
    }

    groups
        .into_iter()
        .map(|((engine, scenario), (times, memories))| OverviewRow {
            engine,
            scenario,
            operations: times.len(),
            time_mean: mean(&times),
            memory_mean: mean(&memories),
        })
        .collect()
}

/// Everything produced by a consolidation run.
#[derive(Debug, Clone)]
pub struct ConsolidationReport {
    /// Rows read and files skipped.
    pub consolidation: Consolidation,
    /// Summary statistics.
    pub summary: Vec<SummaryRow>,
    /// Per-engine overview.
    pub overview: Vec<OverviewRow>,
    /// Written consolidated file.
    pub consolidated_path: PathBuf,
    /// Written summary file.
    pub summary_path: PathBuf,
}

/// Consolidates, summarizes and writes both output files.
pub fn run_consolidation(
    store: &ResultStore,
    scenarios: &[ScenarioName],
) -> Result<ConsolidationReport, StoreError> {
    let consolidation = consolidate(store, scenarios);
    let summary = summarize(&consolidation.table);
    let overview = overview(&summary);

    let consolidated_path = store.write_consolidated(&consolidation.table.records())?;
    let summary_path = store.write_summary(&summary)?;

    info!(
        rows = consolidation.table.len(),
        groups = summary.len(),
        skipped = consolidation.skipped.len(),
        "consolidation complete"
    );

    Ok(ConsolidationReport {
        consolidation,
        summary,
        overview,
        consolidated_path,
        summary_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PersistMode;
    use std::fs;
    use tempfile::TempDir;

    fn measured(engine: Engine, op: &str, scenario: ScenarioName, t: f64, m: f64) -> ResultRecord {
        ResultRecord::measured(engine, op, scenario, t, m)
    }

    fn write(store: &ResultStore, scenario: ScenarioName, records: &[ResultRecord]) {
        store
            .write_scenario(scenario, records, PersistMode::Overwrite)
            .unwrap();
    }

    #[test]
    fn test_table_replaces_scenario() {
        let mut table = ConsolidatedTable::new();
        let first = vec![measured(Engine::Polars, "agg", ScenarioName::Medio, 1.0, 2.0)];
        assert!(table.replace_scenario(ScenarioName::Medio, first.clone()).is_none());
        assert_eq!(table.replace_scenario(ScenarioName::Medio, first.clone()), Some(first));
        assert_eq!(table.len(), 1);
        assert_eq!(table.scenarios(), vec![ScenarioName::Medio]);
        assert!(table.scenario_records(ScenarioName::Grande).is_empty());
    }

    #[test]
    fn test_summarize_groups_and_statistics() {
        let mut table = ConsolidatedTable::new();
        table.replace_scenario(
            ScenarioName::Pequeno,
            vec![
                measured(Engine::Duckdb, "filter", ScenarioName::Pequeno, 1.0, 10.0),
                measured(Engine::Duckdb, "filter", ScenarioName::Pequeno, 3.0, 30.0),
                ResultRecord::failed(Engine::Pandas, "join", ScenarioName::Pequeno, "boom"),
                measured(Engine::Duckdb, "agg", ScenarioName::Pequeno, 0.5, 5.0),
            ],
        );

        let summary = summarize(&table);
        assert_eq!(summary.len(), 3);

        assert_eq!(summary[0].engine, Engine::Duckdb);
        assert_eq!(summary[0].operation, "agg");
        assert_eq!(summary[0].count, 1);
        assert_eq!(summary[0].time.mean, Some(0.5));
        assert_eq!(summary[0].time.std_dev, None);

        assert_eq!(summary[1].operation, "filter");
        assert_eq!(summary[1].count, 2);
        assert_eq!(summary[1].time.mean, Some(2.0));
        assert!((summary[1].time.std_dev.unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary[1].memory.mean, Some(20.0));

        assert_eq!(summary[2].engine, Engine::Pandas);
        assert_eq!(summary[2].count, 0);
        assert_eq!(summary[2].time, Stat::default());
    }

    #[test]
    fn test_overview_averages_operation_means() {
        let mut table = ConsolidatedTable::new();
        table.replace_scenario(
            ScenarioName::Grande,
            vec![
                measured(Engine::Polars, "read_csv", ScenarioName::Grande, 2.0, 100.0),
                measured(Engine::Polars, "agg", ScenarioName::Grande, 4.0, 50.0),
                ResultRecord::failed(Engine::Polars, "join", ScenarioName::Grande, "oom"),
            ],
        );

        let rows = overview(&summarize(&table));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].operations, 2);
        assert_eq!(rows[0].time_mean, Some(3.0));
        assert_eq!(rows[0].memory_mean, Some(75.0));
    }

    #[test]
    fn test_consolidate_skips_missing_and_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        write(
            &store,
            ScenarioName::Pequeno,
            &[measured(Engine::Duckdb, "read_csv", ScenarioName::Pequeno, 0.1, 1.0)],
        );
        fs::write(store.scenario_path(ScenarioName::Medio), "not,a,result\n").unwrap();

        let consolidation = consolidate(&store, &ScenarioName::ALL);
        assert_eq!(consolidation.table.len(), 1);
        assert_eq!(consolidation.sources, vec![store.scenario_path(ScenarioName::Pequeno)]);
        assert_eq!(consolidation.skipped.len(), 2);
        assert!(!consolidation.skipped[0].is_missing());
        assert!(consolidation.skipped[1].is_missing());
    }

    #[test]
    fn test_run_consolidation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        write(
            &store,
            ScenarioName::Pequeno,
            &[
                measured(Engine::Pandas, "write_csv", ScenarioName::Pequeno, 0.25, 3.0),
                ResultRecord::failed(Engine::Duckdb, "join", ScenarioName::Pequeno, "boom"),
            ],
        );
        write(
            &store,
            ScenarioName::Grande,
            &[measured(Engine::Polars, "agg", ScenarioName::Grande, 1.5, 40.0)],
        );

        let first = run_consolidation(&store, &ScenarioName::ALL).unwrap();
        let all_first = fs::read(&first.consolidated_path).unwrap();
        let summary_first = fs::read(&first.summary_path).unwrap();

        let second = run_consolidation(&store, &ScenarioName::ALL).unwrap();
        assert_eq!(fs::read(&second.consolidated_path).unwrap(), all_first);
        assert_eq!(fs::read(&second.summary_path).unwrap(), summary_first);

        let summary = String::from_utf8(summary_first).unwrap();
        assert!(summary.starts_with(
            "engine,operation,scenario,count,time_mean,time_std,memory_mean,memory_std\n"
        ));
        assert!(summary.contains("duckdb,join,pequeno,0,no data,no data,no data,no data"));
        assert!(summary.contains("pandas,write_csv,pequeno,1,0.2500,no data,3.0000,no data"));
    }
}
