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

//! `consolidate` command.

use crate::error::CliError;
use etlbench::reporters::{export_markdown, print_consolidation};
use etlbench::{run_consolidation, ConsolidationReport, ResultStore, ScenarioName};
use std::path::Path;
use tracing::info;

/// Consolidates every scenario file under `results_dir`, writes the
/// consolidated and summary files, and optionally a Markdown report.
pub fn consolidate(
    results_dir: &Path,
    report: Option<&Path>,
) -> Result<ConsolidationReport, CliError> {
    let store = ResultStore::new(results_dir);
    let consolidation = run_consolidation(&store, &ScenarioName::ALL)?;
    print_consolidation(&consolidation);

    if let Some(path) = report {
        export_markdown(&consolidation.summary, &consolidation.overview, path)
            .map_err(|e| CliError::io_error(path, e))?;
        info!(path = %path.display(), "markdown report written");
    }

    Ok(consolidation)
}
