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

//! Memory probes with predictable readings.

use etlbench::MemoryProbe;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Probe that always reports the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatProbe(pub f64);

impl MemoryProbe for FlatProbe {
    fn resident_mb(&self) -> f64 {
        self.0
    }
}

/// Probe that replays a list of readings.
///
/// Once the script is exhausted the last reading repeats. Reclamation
/// requests are counted.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    readings: RefCell<VecDeque<f64>>,
    last: Cell<f64>,
    reads: Cell<usize>,
    reclaims: Cell<usize>,
}

impl ScriptedProbe {
    /// Creates a probe replaying `readings` in order.
    pub fn new(readings: &[f64]) -> Self {
        Self {
            readings: RefCell::new(readings.iter().copied().collect()),
            ..Self::default()
        }
    }

    /// Number of readings taken so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of reclamation requests received so far.
    pub fn reclaims(&self) -> usize {
        self.reclaims.get()
    }
}

impl MemoryProbe for ScriptedProbe {
    fn resident_mb(&self) -> f64 {
        self.reads.set(self.reads.get() + 1);
        if let Some(next) = self.readings.borrow_mut().pop_front() {
            self.last.set(next);
        }
        self.last.get()
    }

    fn reclaim(&self) {
        self.reclaims.set(self.reclaims.get() + 1);
    }
}
