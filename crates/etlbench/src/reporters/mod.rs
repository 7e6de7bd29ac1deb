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

//! Reporters for scenario runs and consolidations.
//!
//! # Modules
//!
//! - `console`: tables printed to stdout
//! - `markdown`: Markdown export of the summary and overview

pub mod console;
pub mod markdown;

pub use console::{print_consolidation, print_registry, print_scenario_run};
pub use markdown::{export_markdown, render_markdown};
