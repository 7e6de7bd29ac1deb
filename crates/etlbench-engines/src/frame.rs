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

//! Eager columnar table used by the in-process engine.
//!
//! Columns are typed on load: a column whose non-empty values all parse as
//! integers is `Int`, else one whose values all parse as floats is `Float`,
//! else `Text`. Empty fields are nulls.

use crate::error::{EngineError, EngineResult};
use crate::text;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use etlbench::Encoding;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

/// Values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// 64-bit integers.
    Int(Vec<Option<i64>>),
    /// 64-bit floats.
    Float(Vec<Option<f64>>),
    /// Strings.
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Infers the narrowest type that holds every value.
    pub fn infer(values: Vec<Option<String>>) -> Self {
        let present = || values.iter().flatten();
        if present().all(|v| v.parse::<i64>().is_ok()) {
            return ColumnData::Int(
                values
                    .iter()
                    .map(|v| v.as_deref().and_then(|s| s.parse().ok()))
                    .collect(),
            );
        }
        if present().all(|v| v.parse::<f64>().is_ok()) {
            return ColumnData::Float(
                values
                    .iter()
                    .map(|v| v.as_deref().and_then(|s| s.parse().ok()))
                    .collect(),
            );
        }
        ColumnData::Text(values)
    }

    /// Number of values, nulls included.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    /// Returns whether the column has no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Int(_) => "int",
            ColumnData::Float(_) => "float",
            ColumnData::Text(_) => "text",
        }
    }

    /// Returns a value as a number, if it is one.
    pub fn number(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Int(v) => v[row].map(|i| i as f64),
            ColumnData::Float(v) => v[row],
            ColumnData::Text(v) => v[row].as_deref().and_then(|s| s.parse().ok()),
        }
    }

    /// Returns a value as a comparable key, or `None` for nulls.
    ///
    /// Integral floats become integer keys so that `1211` and `1211.0`
    /// match.
    pub fn key(&self, row: usize) -> Option<Key> {
        match self {
            ColumnData::Int(v) => v[row].map(Key::Int),
            ColumnData::Float(v) => v[row].map(|f| {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Key::Int(f as i64)
                } else {
                    Key::Float(FloatKey(f))
                }
            }),
            ColumnData::Text(v) => v[row].clone().map(Key::Text),
        }
    }

    /// Renders a value for CSV output. Nulls are empty.
    pub fn render(&self, row: usize) -> String {
        match self {
            ColumnData::Int(v) => v[row].map(|i| i.to_string()).unwrap_or_default(),
            ColumnData::Float(v) => v[row].map(|f| f.to_string()).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }

    /// Gathers the values at `rows`.
    pub fn take(&self, rows: &[usize]) -> Self {
        match self {
            ColumnData::Int(v) => ColumnData::Int(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Float(v) => ColumnData::Float(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Text(v) => ColumnData::Text(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }

    fn append(&mut self, other: ColumnData) -> EngineResult<()> {
        match (self, other) {
            (ColumnData::Int(a), ColumnData::Int(b)) => a.extend(b),
            (ColumnData::Float(a), ColumnData::Float(b)) => a.extend(b),
            (ColumnData::Text(a), ColumnData::Text(b)) => a.extend(b),
            (a, b) => {
                return Err(ArrowError::SchemaError(format!(
                    "cannot append {} values to a {} column",
                    b.type_name(),
                    a.type_name()
                ))
                .into())
            }
        }
        Ok(())
    }

    fn data_type(&self) -> DataType {
        match self {
            ColumnData::Int(_) => DataType::Int64,
            ColumnData::Float(_) => DataType::Float64,
            ColumnData::Text(_) => DataType::Utf8,
        }
    }

    fn to_arrow(&self) -> ArrayRef {
        match self {
            ColumnData::Int(v) => Arc::new(Int64Array::from(v.clone())),
            ColumnData::Float(v) => Arc::new(Float64Array::from(v.clone())),
            ColumnData::Text(v) => Arc::new(StringArray::from(v.clone())),
        }
    }

    fn from_arrow(array: &ArrayRef) -> EngineResult<Self> {
        let data = match array.data_type() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => {
                let cast = cast(array, &DataType::Int64)?;
                ColumnData::Int(downcast::<Int64Array>(&cast)?.iter().collect())
            }
            DataType::Float16 | DataType::Float32 | DataType::Float64 | DataType::UInt64 => {
                let cast = cast(array, &DataType::Float64)?;
                ColumnData::Float(downcast::<Float64Array>(&cast)?.iter().collect())
            }
            _ => {
                let cast = cast(array, &DataType::Utf8)?;
                ColumnData::Text(
                    downcast::<StringArray>(&cast)?
                        .iter()
                        .map(|v| v.map(str::to_string))
                        .collect(),
                )
            }
        };
        Ok(data)
    }
}

fn downcast<T: Array + 'static>(array: &ArrayRef) -> EngineResult<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ArrowError::CastError(format!("unexpected array type {}", array.data_type())).into()
    })
}

/// Float wrapper with a total order.
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(pub f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for FloatKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Join and grouping key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Integer value.
    Int(i64),
    /// Non-integral float value.
    Float(FloatKey),
    /// String value.
    Text(String),
}

/// Named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Values.
    pub data: ColumnData,
}

impl Column {
    /// Creates a column.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// In-memory table held column by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Creates a frame. Every column must have the same length.
    pub fn new(columns: Vec<Column>) -> EngineResult<Self> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != rows) {
            return Err(ArrowError::InvalidArgumentError(format!(
                "column '{}' has {} values, expected {}",
                bad.name,
                bad.data.len(),
                rows
            ))
            .into());
        }
        Ok(Self { columns, rows })
    }

    /// Loads a delimited text file.
    pub fn read_csv(path: &Path, encoding: Encoding, delimiter: u8) -> EngineResult<Self> {
        let bytes = text::read_utf8(path, encoding)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != names.len() {
                return Err(EngineError::RowWidth {
                    row: index + 1,
                    expected: names.len(),
                    actual: record.len(),
                });
            }
            for (column, field) in values.iter_mut().zip(record.iter()) {
                column.push(if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                });
            }
        }

        Frame::new(
            names
                .into_iter()
                .zip(values)
                .map(|(name, values)| Column::new(name, ColumnData::infer(values)))
                .collect(),
        )
    }

    /// Loads a Parquet file.
    pub fn read_parquet(path: &Path) -> EngineResult<Self> {
        let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut columns: Option<Vec<Column>> = None;
        for batch in reader {
            let batch = batch?;
            let schema = batch.schema();
            let loaded = schema
                .fields()
                .iter()
                .zip(batch.columns())
                .map(|(field, array)| Ok(Column::new(field.name(), ColumnData::from_arrow(array)?)))
                .collect::<EngineResult<Vec<_>>>()?;

            match columns.as_mut() {
                None => columns = Some(loaded),
                Some(existing) => {
                    for (column, more) in existing.iter_mut().zip(loaded) {
                        column.data.append(more.data)?;
                    }
                }
            }
        }

        Frame::new(columns.unwrap_or_default())
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> EngineResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| EngineError::missing_column(name, self.column_names()))
    }

    /// Keeps the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> EngineResult<Self> {
        let columns = names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self {
            columns,
            rows: self.rows,
        })
    }

    /// Gathers the rows at `rows`.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
                .collect(),
            rows: rows.len(),
        }
    }

    /// Keeps rows whose `column` is a number greater than `threshold`.
    /// Nulls never match.
    pub fn filter_gt(&self, column: &str, threshold: f64) -> EngineResult<Self> {
        let data = &self.column(column)?.data;
        let rows: Vec<usize> = (0..self.rows)
            .filter(|&r| data.number(r).is_some_and(|v| v > threshold))
            .collect();
        Ok(self.take(&rows))
    }

    /// Drops repeated rows, keeping first occurrences.
    pub fn distinct(&self) -> Self {
        let mut seen = HashSet::new();
        let rows: Vec<usize> = (0..self.rows)
            .filter(|&r| {
                let key: Vec<Option<Key>> = self.columns.iter().map(|c| c.data.key(r)).collect();
                seen.insert(key)
            })
            .collect();
        self.take(&rows)
    }

    /// Inner join on `left_on = right_on`.
    ///
    /// Output rows follow the left frame's order; each left row is repeated
    /// once per matching right row. Right columns whose name already exists
    /// on the left get a `_right` suffix. Null keys never match.
    pub fn inner_join(&self, right: &Frame, left_on: &str, right_on: &str) -> EngineResult<Self> {
        let left_key = &self.column(left_on)?.data;
        let right_key = &right.column(right_on)?.data;

        let mut index: HashMap<Key, Vec<usize>> = HashMap::new();
        for r in 0..right.rows {
            if let Some(key) = right_key.key(r) {
                index.entry(key).or_default().push(r);
            }
        }

        let mut left_rows = Vec::new();
        let mut right_rows = Vec::new();
        for l in 0..self.rows {
            if let Some(matches) = left_key.key(l).and_then(|k| index.get(&k)) {
                for &r in matches {
                    left_rows.push(l);
                    right_rows.push(r);
                }
            }
        }

        let mut joined = self.take(&left_rows);
        let left_names: HashSet<&str> = self.column_names().into_iter().collect();
        for column in &right.columns {
            let name = if left_names.contains(column.name.as_str()) {
                format!("{}_right", column.name)
            } else {
                column.name.clone()
            };
            joined
                .columns
                .push(Column::new(name, column.data.take(&right_rows)));
        }
        Ok(joined)
    }

    /// Mean of `value` per distinct `by`, sorted by key.
    ///
    /// Rows with a null key are dropped; null values are skipped. A group
    /// with no numeric value has a null mean.
    pub fn group_mean(&self, by: &str, value: &str) -> EngineResult<Self> {
        let keys = &self.column(by)?.data;
        let values = &self.column(value)?.data;

        let mut groups: BTreeMap<Key, (usize, f64, usize)> = BTreeMap::new();
        for r in 0..self.rows {
            let Some(key) = keys.key(r) else { continue };
            let entry = groups.entry(key).or_insert((r, 0.0, 0));
            if let Some(v) = values.number(r) {
                entry.1 += v;
                entry.2 += 1;
            }
        }

        let first_rows: Vec<usize> = groups.values().map(|g| g.0).collect();
        let means: Vec<Option<f64>> = groups
            .values()
            .map(|&(_, sum, n)| (n > 0).then(|| sum / n as f64))
            .collect();

        Frame::new(vec![
            Column::new(by, keys.take(&first_rows)),
            Column::new(value, ColumnData::Float(means)),
        ])
    }

    /// Converts to an Arrow record batch.
    pub fn to_record_batch(&self) -> EngineResult<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(c.name.as_str(), c.data.data_type(), true))
            .collect();
        let arrays: Vec<ArrayRef> = self.columns.iter().map(|c| c.data.to_arrow()).collect();
        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }

    /// Writes comma-separated text with a header row.
    pub fn write_csv(&self, path: &Path) -> EngineResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(self.column_names())?;
        for r in 0..self.rows {
            writer.write_record(self.columns.iter().map(|c| c.data.render(r)))?;
        }
        writer.flush().map_err(|e| EngineError::io(path, e))?;
        Ok(())
    }

    /// Writes a Parquet file with the given compression.
    pub fn write_parquet(&self, path: &Path, compression: Compression) -> EngineResult<()> {
        let batch = self.to_record_batch()?;
        let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
        let props = WriterProperties::builder()
            .set_compression(compression)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }
}

/// Creates the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &Path) -> EngineResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Frame {
        Frame::new(vec![
            Column::new("id", ColumnData::Int(vec![Some(1), Some(2), Some(3), Some(4)])),
            Column::new(
                "uf",
                ColumnData::Int(vec![Some(35), Some(33), Some(35), None]),
            ),
            Column::new(
                "score",
                ColumnData::Float(vec![Some(700.0), Some(500.0), None, Some(650.0)]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_type_inference() {
        let s = |v: &str| Some(v.to_string());
        assert_eq!(
            ColumnData::infer(vec![s("1"), None, s("3")]),
            ColumnData::Int(vec![Some(1), None, Some(3)])
        );
        assert_eq!(
            ColumnData::infer(vec![s("1"), s("2.5")]),
            ColumnData::Float(vec![Some(1.0), Some(2.5)])
        );
        assert!(matches!(
            ColumnData::infer(vec![s("SP"), s("2")]),
            ColumnData::Text(_)
        ));
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = Frame::new(vec![
            Column::new("a", ColumnData::Int(vec![Some(1)])),
            Column::new("b", ColumnData::Int(vec![])),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_gt_skips_nulls() {
        let filtered = sample().filter_gt("score", 600.0).unwrap();
        assert_eq!(filtered.num_rows(), 2);
        assert_eq!(
            filtered.column("id").unwrap().data,
            ColumnData::Int(vec![Some(1), Some(4)])
        );
    }

    #[test]
    fn test_missing_column() {
        let err = sample().filter_gt("NU_NOTA_MT", 600.0).unwrap_err();
        assert!(err.to_string().contains("available: id, uf, score"));
    }

    #[test]
    fn test_group_mean_sorted_and_null_keys_dropped() {
        let grouped = sample().group_mean("uf", "score").unwrap();
        assert_eq!(grouped.column_names(), vec!["uf", "score"]);
        assert_eq!(
            grouped.column("uf").unwrap().data,
            ColumnData::Int(vec![Some(33), Some(35)])
        );
        assert_eq!(
            grouped.column("score").unwrap().data,
            ColumnData::Float(vec![Some(500.0), Some(700.0)])
        );
    }

    #[test]
    fn test_inner_join_and_distinct() {
        let items = Frame::new(vec![
            Column::new(
                "uf",
                ColumnData::Float(vec![Some(35.0), Some(35.0), Some(31.0)]),
            ),
            Column::new(
                "name",
                ColumnData::Text(vec![Some("SP".into()), Some("SP".into()), Some("MG".into())]),
            ),
        ])
        .unwrap();
        let items = items.distinct();
        assert_eq!(items.num_rows(), 2);

        let joined = sample().inner_join(&items, "uf", "uf").unwrap();
        assert_eq!(joined.num_rows(), 2);
        assert_eq!(joined.column_names(), vec!["id", "uf", "score", "uf_right", "name"]);
        assert_eq!(
            joined.column("id").unwrap().data,
            ColumnData::Int(vec![Some(1), Some(3)])
        );
    }

    #[test]
    fn test_csv_and_parquet_files() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("out/frame.csv");
        ensure_parent(&csv_path).unwrap();
        sample().write_csv(&csv_path).unwrap();
        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().next(), Some("id,uf,score"));
        assert_eq!(content.lines().nth(4), Some("4,,650"));

        let reread = Frame::read_csv(&csv_path, Encoding::Utf8, b',').unwrap();
        assert_eq!(reread.num_rows(), 4);

        let parquet_path = dir.path().join("frame.parquet");
        sample()
            .write_parquet(&parquet_path, Compression::SNAPPY)
            .unwrap();
        assert_eq!(Frame::read_parquet(&parquet_path).unwrap(), sample());
    }

    #[test]
    fn test_read_csv_row_width() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "a;b\n1;2\n3\n").unwrap();
        let err = Frame::read_csv(&path, Encoding::Utf8, b';').unwrap_err();
        assert!(matches!(err, EngineError::RowWidth { row: 2, .. }));
    }
}
