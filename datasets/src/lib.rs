//! Corpus loaders producing the conversation records consumed by the pipeline.

mod jsonl;
mod tabular;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use jsonl::MmapCorpus;
pub use tabular::read_csv;

/// Single conversation record. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier carried through to visualization responses.
    pub id: String,
    /// Free-form conversation text.
    pub text: String,
}

impl Record {
    /// Creates a record from any string-like id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// On-disk layout of a corpus file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// One JSON object per line.
    Jsonl,
    /// Comma separated values with a header row.
    Csv,
}

impl CorpusFormat {
    /// Infers the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Field mapping used when reading records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Explicit format; inferred from the extension when absent.
    #[serde(default)]
    pub format: Option<CorpusFormat>,
    /// Name of the identifier field or column.
    #[serde(default = "LoadOptions::default_id_field")]
    pub id_field: String,
    /// Name of the text field or column.
    #[serde(default = "LoadOptions::default_text_field")]
    pub text_field: String,
}

impl LoadOptions {
    fn default_id_field() -> String {
        "id".to_string()
    }

    fn default_text_field() -> String {
        "text".to_string()
    }

    /// Overrides the text field name.
    pub fn with_text_field(mut self, name: impl Into<String>) -> Self {
        self.text_field = name.into();
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            id_field: Self::default_id_field(),
            text_field: Self::default_text_field(),
        }
    }
}

/// Errors raised while reading a corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Wrapper around IO failures when accessing the corpus file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The memory-mapped file is not valid UTF-8.
    #[error("corpus {path} is not valid utf-8")]
    InvalidUtf8 { path: PathBuf },
    /// A JSON line could not be parsed.
    #[error("invalid json on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// CSV reader failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A record or header lacks the configured field.
    #[error("missing field `{field}` (record {record})")]
    MissingField { field: String, record: usize },
    /// The extension does not map to a known format.
    #[error("cannot infer corpus format for {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Reads every record of the corpus at `path`, preserving file order.
pub fn load_corpus(path: &Path, options: &LoadOptions) -> Result<Vec<Record>, CorpusError> {
    let format = match options.format.or_else(|| CorpusFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(CorpusError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    let records = match format {
        CorpusFormat::Jsonl => MmapCorpus::open(path)?
            .records(options)?
            .collect::<Result<Vec<_>, _>>()?,
        CorpusFormat::Csv => read_csv(path, options)?,
    };
    info!(path = %path.display(), ?format, records = records.len(), "corpus loaded");
    Ok(records)
}

/// Renders scalar JSON values as record fields; ids are frequently numeric.
pub(crate) fn field_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        serde_json::Value::Null => Some(String::new()),
        _ => None,
    }
}
