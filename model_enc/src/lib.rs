//! Text encoding stages: tokenization, vocabulary assignment and fixed-length sequences.

pub mod encoder;
pub mod error;
pub mod sequence;
pub mod stopwords;
pub mod tokenizer;
pub mod vocabulary;

pub use encoder::{CorpusEncoder, EncodedCorpus};
pub use error::DataError;
pub use sequence::{NormalizedCorpus, normalize_corpus, pad_or_truncate};
pub use stopwords::{Language, StopwordConfig, StopwordSet};
pub use tokenizer::Tokenizer;
pub use vocabulary::{PAD_ID, Vocabulary, VocabularyBuilder, build_vocabulary};
