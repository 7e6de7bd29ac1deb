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

//! Text decoding for dataset files.

use crate::error::{EngineError, EngineResult};
use etlbench::Encoding;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Decodes bytes in the given encoding into UTF-8 text.
///
/// Latin-1 maps every byte to the code point of the same value. Invalid
/// UTF-8 sequences are replaced with U+FFFD.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Cow<'_, str> {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes),
        Encoding::Latin1 => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Reads a file and returns its contents as UTF-8 bytes.
pub fn read_utf8(path: &Path, encoding: Encoding) -> EngineResult<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| EngineError::io(path, e))?;
    if encoding == Encoding::Utf8 && std::str::from_utf8(&bytes).is_ok() {
        return Ok(bytes);
    }
    Ok(decode(&bytes, encoding).into_owned().into_bytes())
}
