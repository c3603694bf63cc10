use std::{
    fs::File,
    path::{Path, PathBuf},
};

use memmap2::Mmap;

use crate::{CorpusError, LoadOptions, Record, field_to_string};

/// Memory-mapped JSON-lines corpus.
pub struct MmapCorpus {
    path: PathBuf,
    mmap: Mmap,
}

impl MmapCorpus {
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as `self`.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// Iterates records in file order, skipping blank lines.
    pub fn records<'a>(
        &'a self,
        options: &'a LoadOptions,
    ) -> Result<impl Iterator<Item = Result<Record, CorpusError>> + 'a, CorpusError> {
        let body = std::str::from_utf8(&self.mmap).map_err(|_| CorpusError::InvalidUtf8 {
            path: self.path.clone(),
        })?;

        Ok(body
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(move |(index, line)| parse_line(index + 1, line, options)))
    }
}

fn parse_line(line_number: usize, line: &str, options: &LoadOptions) -> Result<Record, CorpusError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|source| CorpusError::Json {
            line: line_number,
            source,
        })?;
    let field = |name: &str| {
        value
            .get(name)
            .and_then(field_to_string)
            .ok_or_else(|| CorpusError::MissingField {
                field: name.to_string(),
                record: line_number,
            })
    };
    Ok(Record {
        id: field(&options.id_field)?,
        text: field(&options.text_field)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mmap_corpus_reads_json_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::json!({"id": 7, "text": "buy now"})).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", serde_json::json!({"id": "b", "text": "help me"})).unwrap();

        let corpus = MmapCorpus::open(file.path()).unwrap();
        let options = LoadOptions::default();
        let records: Vec<_> = corpus
            .records(&options)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            records,
            vec![Record::new("7", "buy now"), Record::new("b", "help me")]
        );
    }

    #[test]
    fn missing_text_field_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::json!({"id": 1, "text": "ok"})).unwrap();
        writeln!(file, "{}", serde_json::json!({"id": 2, "body": "nope"})).unwrap();

        let corpus = MmapCorpus::open(file.path()).unwrap();
        let options = LoadOptions::default();
        let result: Result<Vec<_>, _> = corpus.records(&options).unwrap().collect();
        match result {
            Err(CorpusError::MissingField { field, record }) => {
                assert_eq!(field, "text");
                assert_eq!(record, 2);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
