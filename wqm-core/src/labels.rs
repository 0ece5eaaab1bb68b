use crate::{
    error::Result,
    record::{Record, Value},
};
use csv::ReaderBuilder;
use serde::Serialize;

/// The desired sample columns and the label each is shown under.
///
/// Read from a two-row table: the header names the columns, the first row
/// gives their display labels.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Labels {
    columns: Vec<String>,
    display: Vec<String>,
}

impl Labels {
    /// Labels that show each column under its own name.
    pub fn from_columns(columns: Vec<String>) -> Labels {
        let display = columns.clone();
        Labels { columns, display }
    }

    fn from_pairs(pairs: impl Iterator<Item = (String, Option<String>)>) -> Labels {
        let (columns, display): (Vec<String>, Vec<String>) = pairs
            .filter(|(column, _)| !column.is_empty())
            .map(|(column, label)| {
                let label = label.unwrap_or_else(|| column.clone());
                (column, label)
            })
            .unzip();
        Labels { columns, display }
    }

    pub fn parse_csv(csv_object: &str) -> Result<Labels> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let headers = rdr.headers()?.clone();
        let first = rdr.records().next().transpose()?;
        Ok(Labels::from_pairs(headers.iter().enumerate().map(|(i, h)| {
            let label = first
                .as_ref()
                .and_then(|row| row.get(i))
                .and_then(|cell| Value::from_cell(cell).to_text());
            (h.trim().to_string(), label)
        })))
    }

    /// Labels from the first record of a parsed table, in column order.
    pub fn from_records(records: &[Record]) -> Labels {
        match records.first() {
            Some(record) => Labels::from_pairs(
                record
                    .iter()
                    .map(|(column, value)| (column.trim().to_string(), value.to_text())),
            ),
            None => Labels::default(),
        }
    }

    pub fn parse_json(json_object: &str) -> Result<Labels> {
        Ok(Labels::from_records(&Record::parse_json(json_object)?))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn display_labels(&self) -> &[String] {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::Labels;

    #[test]
    fn test_parse_labels_csv() {
        let csv_data = "\
fecha,enterococos,temperatura,comentario
Fecha de muestreo,Enterococos (NMP/100 ml),,
";
        let labels = Labels::parse_csv(csv_data).unwrap();
        assert_eq!(
            labels.columns(),
            &["fecha", "enterococos", "temperatura", "comentario"]
        );
        assert_eq!(
            labels.display_labels(),
            &[
                "Fecha de muestreo",
                "Enterococos (NMP/100 ml)",
                "temperatura",
                "comentario"
            ]
        );
    }

    #[test]
    fn test_header_only_labels() {
        let labels = Labels::parse_csv("fecha,enterococos\n").unwrap();
        assert_eq!(labels.display_labels(), labels.columns());
    }

    #[test]
    fn test_parse_labels_json() {
        let json = r#"[{"fecha": "Fecha", "enterococos": "Enterococos", "ph": null}]"#;
        let labels = Labels::parse_json(json).unwrap();
        assert_eq!(labels.columns(), &["fecha", "enterococos", "ph"]);
        assert_eq!(labels.display_labels(), &["Fecha", "Enterococos", "ph"]);
        assert_eq!(Labels::parse_json("[]").unwrap(), Labels::default());
    }
}
