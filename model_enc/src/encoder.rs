//! Corpus-level encoding: tokenize, assign ids, pad and normalize in one pass.

use tracing::{debug, info};

use crate::error::DataError;
use crate::sequence::{NormalizedCorpus, normalize_corpus, pad_or_truncate};
use crate::tokenizer::Tokenizer;
use crate::vocabulary::{Vocabulary, build_vocabulary};

/// Output of [`CorpusEncoder::fit`]. Frozen after construction.
#[derive(Clone, Debug)]
pub struct EncodedCorpus {
    vocabulary: Vocabulary,
    padded: Vec<Vec<u32>>,
    normalized: NormalizedCorpus,
}

impl EncodedCorpus {
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Fixed-length id sequences aligned with the input texts.
    pub fn padded(&self) -> &[Vec<u32>] {
        &self.padded
    }

    pub fn normalized(&self) -> &NormalizedCorpus {
        &self.normalized
    }
}

/// Turns raw texts into normalized fixed-length sequences.
#[derive(Clone, Debug)]
pub struct CorpusEncoder {
    tokenizer: Tokenizer,
    sequence_length: usize,
}

impl CorpusEncoder {
    pub fn new(tokenizer: Tokenizer, sequence_length: usize) -> Self {
        Self {
            tokenizer,
            sequence_length,
        }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Builds the vocabulary over `texts` in order and encodes every text.
    pub fn fit<'a, I>(&self, texts: I) -> Result<EncodedCorpus, DataError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.sequence_length == 0 {
            return Err(DataError::InvalidSequenceLength);
        }
        let tokenized = self.tokenizer.tokenize_all(texts);
        if tokenized.is_empty() {
            return Err(DataError::EmptyCorpus);
        }

        let (vocabulary, sequences) = build_vocabulary(&tokenized);
        let truncated = sequences
            .iter()
            .filter(|sequence| sequence.len() > self.sequence_length)
            .count();
        debug!(
            records = sequences.len(),
            truncated,
            sequence_length = self.sequence_length,
            "sequences fitted to fixed length"
        );

        let padded: Vec<Vec<u32>> = sequences
            .iter()
            .map(|sequence| pad_or_truncate(sequence, self.sequence_length))
            .collect();
        let normalized = normalize_corpus(&padded, self.sequence_length)?;
        info!(
            records = padded.len(),
            vocabulary = vocabulary.len(),
            max_id = normalized.max_id(),
            "corpus encoded"
        );

        Ok(EncodedCorpus {
            vocabulary,
            padded,
            normalized,
        })
    }

    /// Encodes unseen text against a fitted corpus without growing its vocabulary.
    pub fn transform(&self, fitted: &EncodedCorpus, text: &str) -> Vec<f32> {
        let ids = fitted.vocabulary.encode(&self.tokenizer.tokenize(text));
        fitted.normalized.normalize_sequence(&ids)
    }
}
