use crate::error::{Result, WqmError};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::ser::{Serialize, SerializeMap, Serializer};
use wqm_utils::{dates::parse_timestamp, keys::same_key};

/// A raw spreadsheet cell.
///
/// CSV sources only ever produce `Null` and `Text`; JSON sources may also
/// produce `Number`. Numeric coercion happens on access, see [`Value::as_f64`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a value from a CSV cell. Blank cells are null.
    pub fn from_cell(cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            Value::Null
        } else {
            Value::Text(trimmed.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell: numbers as-is, text parsed as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Text view of the cell. Numbers render without a trailing `.0`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(n.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Timestamp view of the cell. Only text cells can carry a date.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Value::from_cell(&s),
            other => Value::Text(other.to_string()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One untyped row: column name to value, in source column order.
///
/// Column lookup is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Set a column, replacing any existing column with the same key.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| same_key(k, &name)) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Record {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| same_key(k, name))
            .map(|(_, v)| v)
    }

    /// Text of a column, `None` when missing or null.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Value::to_text)
    }

    /// Numeric value of a column, `None` when missing, null or not numeric.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record without the named columns.
    pub fn without(&self, names: &[&str]) -> Record {
        let fields = self
            .fields
            .iter()
            .filter(|(k, _)| !names.iter().any(|n| same_key(k, n)))
            .cloned()
            .collect();
        Record { fields }
    }

    /// Parse a CSV body with a header row into Records.
    ///
    /// Rows may be shorter than the header; the missing trailing columns are
    /// simply absent from that record.
    pub fn parse_csv(csv_object: &str) -> Result<Vec<Record>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let mut record = Record::new();
            for (name, cell) in headers.iter().zip(row.iter()) {
                if name.is_empty() {
                    continue;
                }
                record.insert(name.as_str(), Value::from_cell(cell));
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Parse a JSON array of objects into Records, keeping key order.
    pub fn parse_json(json_object: &str) -> Result<Vec<Record>> {
        let parsed: serde_json::Value = serde_json::from_str(json_object)?;
        let serde_json::Value::Array(rows) = parsed else {
            return Err(WqmError::JsonShape("expected an array of objects".into()));
        };
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| match row {
                serde_json::Value::Object(map) => Ok(map
                    .into_iter()
                    .fold(Record::new(), |record, (k, v)| record.with(k, v.into()))),
                _ => Err(WqmError::JsonShape(format!("row {i} is not an object"))),
            })
            .collect()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
