use std::path::Path;

use crate::{CorpusError, LoadOptions, Record};

/// Reads a headered CSV corpus, mapping the configured id and text columns.
pub fn read_csv(path: &Path, options: &LoadOptions) -> Result<Vec<Record>, CorpusError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| CorpusError::MissingField {
                field: name.to_string(),
                record: 0,
            })
    };
    let id_column = column(&options.id_field)?;
    let text_column = column(&options.text_field)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let cell = |position: usize, name: &str| {
            row.get(position)
                .map(str::to_string)
                .ok_or_else(|| CorpusError::MissingField {
                    field: name.to_string(),
                    record: index + 1,
                })
        };
        records.push(Record {
            id: cell(id_column, &options.id_field)?,
            text: cell(text_column, &options.text_field)?,
        });
    }
    Ok(records)
}
