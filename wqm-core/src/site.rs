use crate::{
    error::{Result, WqmError},
    record::Record,
};
use log::warn;
use serde::Serialize;

/// Column of the site stream holding the site identifier.
pub const SITE_FIELD: &str = "site";
pub const LATITUDE_FIELD: &str = "latitude";
pub const LONGITUDE_FIELD: &str = "longitude";

/// A position in decimal degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A sampling location.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Site {
    /// Identifier matched against the sample stream's site column
    pub site_id: String,
    /// Latitude in decimal degrees, `None` when unknown
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, `None` when unknown
    pub longitude: Option<f64>,
    /// Every other column of the site record, untouched
    pub fields: Record,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl Site {
    /// Build a Site from one record of the site stream.
    ///
    /// Latitude and longitude that are null or not numeric become `None`.
    pub fn from_record(record: &Record, id_field: &str) -> Result<Site> {
        let site_id = record
            .get_text(id_field)
            .ok_or_else(|| WqmError::MissingField(id_field.to_string()))?;
        Ok(Site {
            site_id,
            latitude: finite(record.get_f64(LATITUDE_FIELD)),
            longitude: finite(record.get_f64(LONGITUDE_FIELD)),
            fields: record.without(&[id_field, LATITUDE_FIELD, LONGITUDE_FIELD]),
        })
    }

    /// Build Sites from the whole site stream, in order. Records without an
    /// identifier are skipped.
    pub fn from_records(records: &[Record], id_field: &str) -> Vec<Site> {
        records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| match Site::from_record(record, id_field) {
                Ok(site) => Some(site),
                Err(e) => {
                    warn!("Skipping site record {}: {}", i + 1, e);
                    None
                }
            })
            .collect()
    }

    /// Both coordinates, or `None` when the location is unknown.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinates, Site, SITE_FIELD};
    use crate::record::{Record, Value};

    #[test]
    fn test_parse_site_csv() {
        let csv_data = "\
site,Latitude,Longitude,description
Malecon,26.012,-111.343,Town beach
Puerto Escondido,,,Not yet surveyed
Ligui,25.74,n/a,
";
        let records = Record::parse_csv(csv_data).unwrap();
        let sites = Site::from_records(&records, SITE_FIELD);
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0].site_id, "Malecon");
        assert_eq!(
            sites[0].coordinates(),
            Some(Coordinates {
                latitude: 26.012,
                longitude: -111.343
            })
        );
        assert_eq!(
            sites[0].fields.get_text("description").as_deref(),
            Some("Town beach")
        );
        assert!(sites[0].fields.get("latitude").is_none());
        assert_eq!(sites[1].coordinates(), None);
        assert_eq!(sites[2].latitude, Some(25.74));
        assert_eq!(sites[2].longitude, None);
        assert_eq!(sites[2].coordinates(), None);
    }

    #[test]
    fn test_site_without_id_is_skipped() {
        let records = vec![
            Record::new().with("latitude", Value::Number(26.0)),
            Record::new().with("site", Value::Text("Nopolo".into())),
        ];
        let sites = Site::from_records(&records, SITE_FIELD);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].site_id, "Nopolo");
    }
}
