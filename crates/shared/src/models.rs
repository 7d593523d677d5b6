use serde::Serialize;

use crate::error::{Error, Result};
use crate::table::is_na;

// Column names of the sample spreadsheet.
pub const LON: &str = "Lon";
pub const LAT: &str = "Lat";
pub const CLUSTER: &str = "Cluster";
pub const GROUP: &str = "Group";
pub const YEAR: &str = "Year";
pub const TYPE: &str = "Type";
pub const ICON: &str = "icon";
pub const TEXT_COLOR: &str = "text_color";
pub const BACKGROUND_COLOR: &str = "background_color";

/// One named cell of a row. `None` means the cell was empty or an NA token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: Option<String>,
}

/// One sample record, fields kept in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    pub fn new(fields: Vec<Field>) -> Self {
        Row { fields }
    }

    /// Build a row from raw cell text, treating NA tokens as missing.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, raw)| {
                let raw = raw.as_ref();
                Field {
                    name: name.into(),
                    value: (!is_na(raw)).then(|| raw.to_string()),
                }
            })
            .collect();
        Row { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Cell value, or `MissingColumn` if the row has no such column.
    pub fn value(&self, name: &str) -> Result<Option<&str>> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_deref())
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Cell value with missing cells read as the empty string.
    pub fn text(&self, name: &str) -> Result<&str> {
        Ok(self.value(name)?.unwrap_or(""))
    }

    /// Cell value that must be present.
    pub fn required(&self, name: &str) -> Result<&str> {
        self.value(name)?
            .ok_or_else(|| Error::EmptyField(name.to_string()))
    }
}

/// The whole sheet: header order plus rows in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Table { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A map position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Leaflet's `[lat, lon]` ordering.
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row::from_pairs([
            ("Lon", "-45.39"),
            ("Lat", "61.17"),
            ("Cluster", "Narsaq"),
            ("Notes", ""),
        ])
    }

    #[test]
    fn test_from_pairs_marks_empty_cells_missing() {
        let row = sample_row();
        assert_eq!(row.value("Notes").unwrap(), None);
        assert_eq!(row.value("Cluster").unwrap(), Some("Narsaq"));
    }

    #[test]
    fn test_from_pairs_marks_na_tokens_missing() {
        let row = Row::from_pairs([("a", "NaN"), ("b", "N/A"), ("c", "n.a.")]);
        assert_eq!(row.value("a").unwrap(), None);
        assert_eq!(row.value("b").unwrap(), None);
        assert_eq!(row.value("c").unwrap(), Some("n.a."));
    }

    #[test]
    fn test_value_missing_column_is_error() {
        let row = sample_row();
        match row.value("Depth") {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "Depth"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_text_reads_missing_as_empty() {
        assert_eq!(sample_row().text("Notes").unwrap(), "");
    }

    #[test]
    fn test_required_rejects_missing_value() {
        assert!(matches!(
            sample_row().required("Notes"),
            Err(Error::EmptyField(_))
        ));
    }

    #[test]
    fn test_fields_keep_column_order() {
        let names: Vec<_> = sample_row()
            .fields()
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, ["Lon", "Lat", "Cluster", "Notes"]);
    }

    #[test]
    fn test_latlon_array_is_lat_first() {
        let p = LatLon { lat: 61.0, lon: -46.0 };
        assert_eq!(p.to_array(), [61.0, -46.0]);
    }
}
