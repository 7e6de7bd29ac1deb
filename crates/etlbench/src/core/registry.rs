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

//! Operation adapter registry.
//!
//! Maps each (engine, operation) pair to the callable that performs it. A
//! pair without an entry is in the [`Availability::NotConfigured`] state,
//! which the scenario driver treats as "skip", not as a failure.

use crate::core::config::RunConfiguration;
use crate::core::model::{Encoding, Engine, Operation};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Engine-native result of an operation. The harness never looks inside.
pub type Output = Box<dyn Any>;

/// Failure raised by an adapter.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of every adapter.
pub type AdapterResult = Result<Output, AdapterError>;

/// A benchmarkable operation for one engine.
///
/// Receives the dataset path chosen by the operation's input kind and the
/// scenario encoding. Only success versus failure matters to the harness;
/// the returned value is kept alive until the post-operation memory reading
/// and then dropped.
pub trait OperationAdapter {
    /// Runs the operation once.
    fn run(&self, input: &Path, encoding: Encoding) -> AdapterResult;
}

impl<F> OperationAdapter for F
where
    F: Fn(&Path, Encoding) -> AdapterResult,
{
    fn run(&self, input: &Path, encoding: Encoding) -> AdapterResult {
        self(input, encoding)
    }
}

/// Pins a closure to the adapter signature so its argument types are
/// inferred.
///
/// ```no_run
/// use etlbench::core::registry::{adapter, Output, Registry};
/// use etlbench::{Engine, Operation};
///
/// let mut registry = Registry::new();
/// registry.register(
///     Engine::Polars,
///     Operation::ReadCsv,
///     adapter(|path, _encoding| Ok(Box::new(std::fs::read(path)?) as Output)),
/// );
/// ```
pub fn adapter<F>(f: F) -> F
where
    F: Fn(&Path, Encoding) -> AdapterResult,
{
    f
}

/// Whether a pair has an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// An adapter is registered.
    Configured,
    /// No adapter is registered; the pair is skipped.
    NotConfigured,
}

impl Availability {
    /// Returns the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Configured => "configured",
            Availability::NotConfigured => "not configured",
        }
    }
}

/// Adapters keyed by (engine, operation).
#[derive(Default)]
pub struct Registry {
    adapters: BTreeMap<(Engine, Operation), Box<dyn OperationAdapter>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter, replacing any earlier entry for the pair.
    pub fn register<A>(&mut self, engine: Engine, operation: Operation, adapter: A)
    where
        A: OperationAdapter + 'static,
    {
        self.adapters.insert((engine, operation), Box::new(adapter));
    }

    /// Looks up the adapter for a pair.
    pub fn lookup(&self, engine: Engine, operation: Operation) -> Option<&dyn OperationAdapter> {
        self.adapters.get(&(engine, operation)).map(|a| a.as_ref())
    }

    /// Returns whether a pair is configured.
    pub fn availability(&self, engine: Engine, operation: Operation) -> Availability {
        if self.adapters.contains_key(&(engine, operation)) {
            Availability::Configured
        } else {
            Availability::NotConfigured
        }
    }

    /// Returns every pair requested by `config` that has no adapter, in the
    /// configuration's iteration order.
    pub fn missing(&self, config: &RunConfiguration) -> Vec<(Engine, Operation)> {
        config
            .pairs()
            .filter(|&(engine, op)| self.availability(engine, op) == Availability::NotConfigured)
            .collect()
    }

    /// Returns the configured pairs in (engine, operation) order.
    pub fn pairs(&self) -> impl Iterator<Item = (Engine, Operation)> + '_ {
        self.adapters.keys().copied()
    }

    /// Returns the number of configured pairs.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns whether no pair is configured.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("pairs", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
