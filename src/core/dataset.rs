//! In-memory tabular dataset: single-pass functional operations over a
//! list of records, grouping, numeric aggregations and JSON/CSV export.

use crate::domain::model::Record;
use crate::utils::error::{Result, RowkitError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    rows: Vec<Record>,
}

impl DataSet {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Keeps the records matching the predicate, in arrival order.
    pub fn filter(&self, predicate: impl Fn(&Record) -> bool) -> DataSet {
        DataSet::new(self.rows.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Applies the transform to every record, producing a new dataset.
    pub fn map(&self, transform: impl Fn(&Record) -> Record) -> DataSet {
        DataSet::new(self.rows.iter().map(transform).collect())
    }

    /// Folds the records left to right starting from `initial`.
    pub fn reduce<T>(&self, initial: T, f: impl Fn(T, &Record) -> T) -> T {
        self.rows.iter().fold(initial, f)
    }

    /// Groups records by an arbitrary key function. Group membership
    /// preserves arrival order; the group map is ordered by key.
    pub fn group_by<K: Ord>(&self, key: impl Fn(&Record) -> K) -> BTreeMap<K, DataSet> {
        let mut groups: BTreeMap<K, Vec<Record>> = BTreeMap::new();
        for r in &self.rows {
            groups.entry(key(r)).or_default().push(r.clone());
        }
        groups.into_iter().map(|(k, v)| (k, DataSet::new(v))).collect()
    }

    /// Groups by the value of a field, rendered as a string key. Errors if
    /// any record lacks the field.
    pub fn group_by_field(&self, field: &str) -> Result<BTreeMap<String, DataSet>> {
        let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
        for r in &self.rows {
            let value = r
                .get(field)
                .ok_or_else(|| RowkitError::missing_field(field))?;
            let key = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            groups.entry(key).or_default().push(r.clone());
        }
        Ok(groups
            .into_iter()
            .map(|(k, v)| (k, DataSet::new(v)))
            .collect())
    }

    fn numeric_series(&self, field: &str) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(self.rows.len());
        for r in &self.rows {
            let value = r
                .get(field)
                .ok_or_else(|| RowkitError::missing_field(field))?;
            let n = value
                .as_f64()
                .ok_or_else(|| RowkitError::NonNumericValue {
                    field: field.to_string(),
                    value: value.to_string(),
                })?;
            values.push(n);
        }
        Ok(values)
    }

    /// Sum over a numeric field; 0.0 for an empty dataset.
    pub fn sum(&self, field: &str) -> Result<f64> {
        Ok(self.numeric_series(field)?.iter().sum())
    }

    pub fn mean(&self, field: &str) -> Result<f64> {
        let values = self.numeric_series(field)?;
        if values.is_empty() {
            return Err(RowkitError::EmptyDataset);
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn min(&self, field: &str) -> Result<f64> {
        let values = self.numeric_series(field)?;
        values
            .into_iter()
            .reduce(f64::min)
            .ok_or(RowkitError::EmptyDataset)
    }

    pub fn max(&self, field: &str) -> Result<f64> {
        let values = self.numeric_series(field)?;
        values
            .into_iter()
            .reduce(f64::max)
            .ok_or(RowkitError::EmptyDataset)
    }

    pub fn from_json_str(s: &str) -> Result<DataSet> {
        let rows: Vec<Record> = serde_json::from_str(s)?;
        Ok(DataSet::new(rows))
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<DataSet> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Row access seam shared by the export traits.
pub trait Rows {
    fn rows(&self) -> &[Record];
}

impl Rows for DataSet {
    fn rows(&self) -> &[Record] {
        &self.rows
    }
}

/// JSON export, available to anything exposing its rows.
pub trait JsonExport: Rows {
    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.rows())?)
    }

    fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// CSV export: columns are the sorted union of all field names, with a
/// blank cell where a record lacks a field.
pub trait CsvExport: Rows {
    fn to_csv_string(&self) -> Result<String> {
        let columns: Vec<&str> = {
            let mut set = std::collections::BTreeSet::new();
            for r in self.rows() {
                set.extend(r.fields());
            }
            set.into_iter().collect()
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&columns)?;
        for r in self.rows() {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| match r.get(c) {
                    None | Some(serde_json::Value::Null) => String::new(),
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect();
            writer.write_record(&cells)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| RowkitError::validation(format!("CSV writer flush failed: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| RowkitError::validation(format!("CSV output is not UTF-8: {}", e)))
    }

    fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_csv_string()?)?;
        Ok(())
    }
}

impl JsonExport for DataSet {}
impl CsvExport for DataSet {}
