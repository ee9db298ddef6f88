use thiserror::Error;

use crate::contract::CallRequest;

#[derive(Debug, Error)]
pub enum CsvRowError {
    #[error("object body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("CSV data row {row} is malformed: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

pub fn decode_object_text(body: &[u8]) -> Result<&str, CsvRowError> {
    Ok(std::str::from_utf8(body)?)
}

/// Lazily parses data rows into call requests.
///
/// The first line is the header and columns are matched by name, so extra
/// columns and column order do not matter. Rows are yielded in file order;
/// `row` in errors counts data rows from 1.
pub fn call_request_rows(
    text: &str,
) -> impl Iterator<Item = Result<CallRequest, CsvRowError>> + '_ {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes())
        .into_deserialize::<CallRequest>()
        .enumerate()
        .map(|(index, row)| row.map_err(|source| CsvRowError::Row { row: index + 1, source }))
}
