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

//! Small ENEM-shaped datasets laid out like a real data directory.
//!
//! Every scenario gets the same rows. `pequeno` and `medio` are written as
//! UTF-8, `grande` and the items file as Latin-1, matching the encodings
//! the harness assigns to them.

use etlbench::{Encoding, Scenario, ScenarioName};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the exam items table.
pub const ITEMS_FILE: &str = "ITENS_PROVA_2023.csv";

/// Rows in every sample dataset.
pub const SAMPLE_ROWS: usize = 8;

/// Rows with `NU_NOTA_MT > 600`.
pub const SAMPLE_ROWS_ABOVE_600: usize = 4;

/// Rows whose `CO_PROVA_MT` matches an item's `CO_PROVA`.
pub const SAMPLE_JOIN_ROWS: usize = 7;

/// Distinct non-empty `CO_UF_ESC` values.
pub const SAMPLE_STATES: usize = 3;

const SAMPLE_CSV: &str = "\
NU_INSCRICAO;NU_ANO;TP_FAIXA_ETARIA;CO_UF_ESC;SG_UF_ESC;NO_MUNICIPIO_ESC;CO_PROVA_MT;NU_NOTA_MT
210001;2023;3;35;SP;São Paulo;1211;712.4
210002;2023;4;35;SP;São Paulo;1212;580.0
210003;2023;2;33;RJ;Niterói;1211;655.1
210004;2023;5;33;RJ;Niterói;1213;
210005;2023;3;31;MG;Uberlândia;1212;498.7
210006;2023;3;31;MG;Uberlândia;1211;603.9
210007;2023;6;;;;1214;421.0
210008;2023;3;35;SP;Campinas;1213;690.0
";

const ITEMS_CSV: &str = "\
CO_POSICAO;SG_AREA;CO_ITEM;TX_GABARITO;CO_HABILIDADE;NO_AREA;CO_PROVA
136;MT;90301;A;1;Matemática e suas Tecnologias;1211
137;MT;90302;C;2;Matemática e suas Tecnologias;1211
136;MT;90303;B;1;Matemática e suas Tecnologias;1212
136;MT;90304;E;4;Matemática e suas Tecnologias;1213
91;CN;80101;D;7;Ciências da Natureza;1215
";

/// Temporary data directory with one dataset per scenario and the items file.
#[derive(Debug)]
pub struct DatasetFixture {
    dir: TempDir,
}

impl DatasetFixture {
    /// Writes every scenario's CSV and the items file.
    pub fn new() -> Self {
        Self::with_scenarios(&ScenarioName::ALL)
    }

    /// Writes the CSV of the listed scenarios and the items file.
    pub fn with_scenarios(scenarios: &[ScenarioName]) -> Self {
        let dir = TempDir::new().expect("create temp data dir");
        let fixture = Self { dir };
        for &scenario in scenarios {
            fixture.write_csv(scenario, SAMPLE_CSV);
        }
        fs::write(fixture.items_path(), encode(ITEMS_CSV, Encoding::Latin1))
            .expect("write items file");
        fixture
    }

    /// Returns the data directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the items file.
    pub fn items_path(&self) -> PathBuf {
        self.dir.path().join(ITEMS_FILE)
    }

    /// Returns the scenario descriptor for this directory.
    pub fn scenario(&self, name: ScenarioName, repeat_count: u32) -> Scenario {
        Scenario::from_data_dir(name, self.dir.path(), repeat_count)
    }

    /// Returns the CSV path of a scenario.
    pub fn csv_path(&self, name: ScenarioName) -> PathBuf {
        self.scenario(name, 1).csv_path().to_path_buf()
    }

    /// Replaces a scenario's CSV with `content`, encoded for the scenario.
    pub fn write_csv(&self, name: ScenarioName, content: &str) {
        fs::write(self.csv_path(name), encode(content, name.encoding())).expect("write dataset");
    }

    /// Deletes a scenario's CSV.
    pub fn remove_csv(&self, name: ScenarioName) {
        fs::remove_file(self.csv_path(name)).expect("remove dataset");
    }
}

impl Default for DatasetFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes text as UTF-8 or Latin-1 bytes.
///
/// Characters outside Latin-1 become `?`.
pub fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect(),
    }
}
