use std::io::Read;

use crate::error::{Error, Result};
use crate::models::{Field, Row, Table, YEAR};

/// Cell texts read as "no value", matching the default NA set of common
/// dataframe CSV readers.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// A missing year is kept as an empty string so it still shows in popups.
pub fn normalize_year(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Parse CSV text into a [`Table`] with every field read as text.
///
/// The first record is the header. The `Year` column must exist; its missing
/// cells become `""`. Short records are padded with missing cells; records
/// longer than the header are rejected.
pub fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    if !columns.iter().any(|c| c == YEAR) {
        return Err(Error::MissingColumn(YEAR.to_string()));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(Error::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                found: record.len(),
                expected: columns.len(),
            });
        }
        let fields = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = record
                    .get(i)
                    .filter(|raw| !is_na(raw))
                    .map(str::to_string);
                let value = if name == YEAR {
                    Some(normalize_year(value))
                } else {
                    value
                };
                Field {
                    name: name.clone(),
                    value,
                }
            })
            .collect();
        rows.push(Row::new(fields));
    }

    tracing::debug!(rows = rows.len(), columns = columns.len(), "Parsed sample table");
    Ok(Table::new(columns, rows))
}
