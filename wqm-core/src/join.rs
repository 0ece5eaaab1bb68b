//! Site-data join: the sample rows belonging to one site, projected onto
//! the desired columns.

use crate::record::{Record, Value};
use serde::Serialize;
use wqm_utils::keys::same_key;

/// Column of the sample stream holding the site identifier.
pub const SAMPLE_SITE_FIELD: &str = "sitio";

/// The sample rows of one site, in source order, restricted to a fixed
/// list of columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinedDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// One joined row paired with the dataset's column names.
#[derive(Debug, Clone, Copy)]
pub struct KeyedRow<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> KeyedRow<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| same_key(c, column))
            .and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl JoinedDataset {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Positional rows; cell `i` belongs to `columns()[i]`.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| same_key(c, column))
    }

    pub fn keyed_rows(&self) -> impl Iterator<Item = KeyedRow<'_>> {
        self.rows.iter().map(|values| KeyedRow {
            columns: &self.columns,
            values,
        })
    }
}

/// Join on the default sample site column, [`SAMPLE_SITE_FIELD`].
pub fn join(sample_rows: &[Record], site_id: &str, desired_columns: &[String]) -> JoinedDataset {
    join_on(sample_rows, SAMPLE_SITE_FIELD, site_id, desired_columns)
}

/// Keep every row whose `site_field` equals `site_id`, projecting each onto
/// `desired_columns`. Missing columns become null.
pub fn join_on(
    sample_rows: &[Record],
    site_field: &str,
    site_id: &str,
    desired_columns: &[String],
) -> JoinedDataset {
    let rows = sample_rows
        .iter()
        .filter(|row| {
            row.get_text(site_field)
                .is_some_and(|id| same_key(&id, site_id))
        })
        .map(|row| {
            desired_columns
                .iter()
                .map(|column| row.get(column).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();
    JoinedDataset {
        columns: desired_columns.to_vec(),
        rows,
    }
}
