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

//! Stub operation adapters.

use etlbench::{AdapterResult, Encoding, OperationAdapter, Output};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Adapter that always succeeds with a unit output.
pub fn fixed() -> impl OperationAdapter {
    |_: &Path, _: Encoding| -> AdapterResult { Ok(Box::new(()) as Output) }
}

/// Adapter that always succeeds with a buffer of `bytes` bytes, kept alive
/// until the harness drops the output.
pub fn allocating(bytes: usize) -> impl OperationAdapter {
    move |_: &Path, _: Encoding| -> AdapterResult { Ok(Box::new(vec![0u8; bytes]) as Output) }
}

/// Adapter that always fails with `message`.
pub fn failing(message: &str) -> impl OperationAdapter {
    let message = message.to_string();
    move |_: &Path, _: Encoding| -> AdapterResult { Err(message.clone().into()) }
}

/// Adapter that always panics with `message`.
pub fn panicking(message: &'static str) -> impl OperationAdapter {
    move |_: &Path, _: Encoding| -> AdapterResult { panic!("{}", message) }
}

/// Adapter that fails on every call whose 1-based index is a multiple of
/// `fail_every`, and succeeds otherwise.
pub fn flaky(fail_every: u32) -> impl OperationAdapter {
    let calls = Cell::new(0u32);
    move |_: &Path, _: Encoding| -> AdapterResult {
        calls.set(calls.get() + 1);
        if fail_every > 0 && calls.get() % fail_every == 0 {
            Err(format!("call {} failed", calls.get()).into())
        } else {
            Ok(Box::new(()) as Output)
        }
    }
}

/// Calls seen by a [`recording`] adapter.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<std::cell::RefCell<Vec<(PathBuf, Encoding)>>>);

impl CallLog {
    /// Returns the recorded (input, encoding) pairs.
    pub fn calls(&self) -> Vec<(PathBuf, Encoding)> {
        self.0.borrow().clone()
    }

    /// Returns the number of calls.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns whether no call was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Adapter that succeeds and records its arguments into `log`.
pub fn recording(log: &CallLog) -> impl OperationAdapter {
    let log = log.clone();
    move |input: &Path, encoding: Encoding| -> AdapterResult {
        log.0.borrow_mut().push((input.to_path_buf(), encoding));
        Ok(Box::new(()) as Output)
    }
}
