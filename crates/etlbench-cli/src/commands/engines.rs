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

//! `engines` command.

use crate::cli::DEFAULT_DATA_DIR;
use crate::error::CliError;
use etlbench::reporters::print_registry;
use etlbench_engines::{compiled_engines, default_registry, EngineContext};
use std::path::Path;

/// Prints the availability of every (engine, operation) pair in this build.
pub fn engines() -> Result<(), CliError> {
    let context = EngineContext::from_data_dir(Path::new(DEFAULT_DATA_DIR), "output");
    let registry = default_registry(&context)?;

    let compiled: Vec<&str> = compiled_engines().into_iter().map(|e| e.as_str()).collect();
    println!("Compiled engines: {}\n", compiled.join(", "));
    print_registry(&registry);
    Ok(())
}
