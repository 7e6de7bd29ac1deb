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

//! Markdown export of consolidated statistics.

use crate::consolidate::{OverviewRow, SummaryRow};
use crate::store::{format_stat, SUMMARY_PRECISION};
use std::fs;
use std::io;
use std::path::Path;

/// Renders the summary and overview tables as Markdown.
pub fn render_markdown(summary: &[SummaryRow], overview: &[OverviewRow]) -> String {
    let stat = |value: Option<f64>| format_stat(value, SUMMARY_PRECISION);
    let mut md = String::new();

    md.push_str("# ETL Engine Benchmark\n\n");
    md.push_str(&format!("**Timestamp:** {}\n\n", chrono::Utc::now().to_rfc3339()));

    md.push_str("## Overview\n\n");
    if overview.is_empty() {
        md.push_str("No results.\n");
    } else {
        md.push_str("| Engine | Scenario | Operations | Mean time (s) | Mean memory (MB) |\n");
        md.push_str("|--------|----------|------------|---------------|------------------|\n");
        for row in overview {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                row.engine,
                row.scenario,
                row.operations,
                stat(row.time_mean),
                stat(row.memory_mean)
            ));
        }
    }

    md.push_str("\n## Summary\n\n");
    if summary.is_empty() {
        md.push_str("No results.\n");
    } else {
        md.push_str(
            "| Scenario | Engine | Operation | Count | Time mean | Time std | Memory mean | Memory std |\n",
        );
        md.push_str(
            "|----------|--------|-----------|-------|-----------|----------|-------------|------------|\n",
        );
        for row in summary {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                row.scenario,
                row.engine,
                row.operation,
                row.count,
                stat(row.time.mean),
                stat(row.time.std_dev),
                stat(row.memory.mean),
                stat(row.memory.std_dev)
            ));
        }
    }

    md
}

/// Writes the Markdown report to `path`.
pub fn export_markdown(
    summary: &[SummaryRow],
    overview: &[OverviewRow],
    path: &Path,
) -> io::Result<()> {
    fs::write(path, render_markdown(summary, overview))
}
