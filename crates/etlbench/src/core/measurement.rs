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

//! Process memory sampling.
//!
//! Readings go through the [`MemoryProbe`] trait so the protocol in
//! [`MemorySampler`] can be driven by scripted readings in tests.
//!
//! The protocol is asymmetric: the baseline is the **minimum**
//! of several readings taken after reclamation and a settle pause, while the
//! post-operation value is the **maximum** of its readings. Reported deltas
//! are floored at zero.

use crate::core::config::SamplerConfig;
use std::thread;
use std::time::Duration;

/// Bytes per reported megabyte.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Source of resident-memory readings.
pub trait MemoryProbe {
    /// Returns the current resident memory of the process in megabytes.
    fn resident_mb(&self) -> f64;

    /// Requests reclamation of unreachable memory before a reading.
    ///
    /// Without a garbage-collected runtime there is nothing to reclaim, so
    /// the default does nothing.
    fn reclaim(&self) {}
}

/// Reads the resident set size of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemoryProbe for ProcessMemory {
    fn resident_mb(&self) -> f64 {
        read_vm_rss() as f64 / BYTES_PER_MB
    }
}

/// Returns `VmRSS` from `/proc/self/status` in bytes.
#[cfg(target_os = "linux")]
fn read_vm_rss() -> u64 {
    if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("VmRSS:") {
                let trimmed = rest.trim().trim_end_matches("kB").trim();
                if let Ok(kb) = trimmed.parse::<u64>() {
                    return kb * 1024;
                }
            }
        }
    }
    0
}

#[cfg(not(target_os = "linux"))]
fn read_vm_rss() -> u64 {
    0
}

/// Applies the baseline/peak protocol on top of a [`MemoryProbe`].
#[derive(Debug, Clone)]
pub struct MemorySampler<P = ProcessMemory> {
    probe: P,
    config: SamplerConfig,
}

impl<P: MemoryProbe> MemorySampler<P> {
    /// Creates a sampler.
    pub fn new(probe: P, config: SamplerConfig) -> Self {
        Self { probe, config }
    }

    /// Returns the underlying probe.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Returns the sampling settings.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Takes one reading. Non-finite or negative readings count as zero.
    pub fn sample_memory(&self) -> f64 {
        let mb = self.probe.resident_mb();
        if mb.is_finite() && mb > 0.0 {
            mb
        } else {
            0.0
        }
    }

    /// Issues the configured number of reclamation requests.
    pub fn reclaim(&self) {
        for _ in 0..self.config.collection_passes {
            self.probe.reclaim();
        }
    }

    /// Reclaims, waits for the settle pause and returns the minimum of the
    /// baseline readings.
    pub fn baseline(&self) -> f64 {
        self.reclaim();
        pause(self.config.settle_pause());
        self.readings(self.config.baseline_samples, self.config.baseline_interval())
            .into_iter()
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns the maximum of the post-operation readings.
    pub fn peak(&self) -> f64 {
        self.readings(self.config.peak_samples, self.config.peak_interval())
            .into_iter()
            .fold(0.0, f64::max)
    }

    fn readings(&self, count: u32, interval: Duration) -> Vec<f64> {
        let count = count.max(1);
        let mut values = Vec::with_capacity(count as usize);
        for i in 0..count {
            if i > 0 {
                pause(interval);
            }
            values.push(self.sample_memory());
        }
        values
    }
}

/// Memory cost of an operation: `peak - baseline`, never negative.
pub fn memory_delta(baseline: f64, peak: f64) -> f64 {
    let delta = peak - baseline;
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
