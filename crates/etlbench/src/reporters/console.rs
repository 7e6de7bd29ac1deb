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

//! Console reporter.

use crate::consolidate::ConsolidationReport;
use crate::core::model::{Engine, Operation};
use crate::core::registry::Registry;
use crate::harness::driver::ScenarioRun;
use crate::store::{format_stat, SUMMARY_PRECISION};

/// Prints the table of one scenario run.
pub fn print_scenario_run(run: &ScenarioRun) {
    println!("\n{}", "=".repeat(80));
    println!("SCENARIO: {}", run.scenario);
    println!("{}", "=".repeat(80));
    println!(
        "{:<8} {:<14} {:>12} {:>12} {:>7}  {}",
        "engine", "operation", "time (s)", "memory (MB)", "trials", "error"
    );
    println!("{}", "-".repeat(80));

    for (record, pair) in run.records.iter().zip(&run.pairs) {
        println!(
            "{:<8} {:<14} {:>12} {:>12} {:>7}  {}",
            record.engine,
            record.operation,
            format_stat(record.time_seconds, 6),
            format_stat(record.memory_mb, 3),
            format!("{}/{}", pair.succeeded, pair.attempted),
            record.error.as_deref().unwrap_or("")
        );
    }

    if !run.skipped.is_empty() {
        println!("\nSkipped (no adapter):");
        for (engine, operation) in &run.skipped {
            println!("  - {} {}", engine, operation);
        }
    }

    println!("\nResults: {}", run.output_path.display());
    println!("{}\n", "=".repeat(80));
}

/// Prints what a consolidation found and wrote.
pub fn print_consolidation(report: &ConsolidationReport) {
    let table = &report.consolidation.table;

    println!("\n{}", "=".repeat(60));
    println!("CONSOLIDATION");
    println!("{}", "=".repeat(60));
    println!("Rows: {}", table.len());
    println!("Scenarios: {}", join(table.scenarios()));
    println!("Engines: {}", join(table.engines()));
    println!("Operations: {}", join(table.operations()));

    if !report.consolidation.skipped.is_empty() {
        println!("\nSkipped files:");
        for err in &report.consolidation.skipped {
            println!("  - {}", err);
        }
    }

    if !report.overview.is_empty() {
        println!("\n{}", "-".repeat(60));
        println!("{:<8} {:<8} {:>12} {:>14}", "engine", "scenario", "time (s)", "memory (MB)");
        println!("{}", "-".repeat(60));
        for row in &report.overview {
            println!(
                "{:<8} {:<8} {:>12} {:>14}",
                row.engine,
                row.scenario,
                format_stat(row.time_mean, SUMMARY_PRECISION),
                format_stat(row.memory_mean, SUMMARY_PRECISION)
            );
        }
    }

    println!("\nConsolidated: {}", report.consolidated_path.display());
    println!("Summary: {}", report.summary_path.display());
    println!("{}\n", "=".repeat(60));
}

/// Prints the configured / not configured matrix of a registry.
pub fn print_registry(registry: &Registry) {
    print!("{:<14}", "operation");
    for engine in Engine::ALL {
        print!(" {:<15}", engine);
    }
    println!();
    println!("{}", "-".repeat(14 + 16 * Engine::ALL.len()));

    for operation in Operation::ALL {
        print!("{:<14}", operation);
        for engine in Engine::ALL {
            print!(" {:<15}", registry.availability(engine, operation).as_str());
        }
        println!();
    }
}

fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let parts: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
