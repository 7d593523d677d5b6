/// Errors raised while reading the sample table or turning rows into markers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The table has no column with this name.
    #[error("missing column `{0}`")]
    MissingColumn(String),

    /// The column exists but the cell is empty or an NA token.
    #[error("row has no value for `{0}`")]
    EmptyField(String),

    /// A coordinate cell could not be read as a number.
    #[error("invalid coordinate in `{column}`: {value:?}")]
    BadCoordinate { column: String, value: String },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A record carries more cells than the header names.
    #[error("record on line {line} has {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        found: usize,
        expected: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
