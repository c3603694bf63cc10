//! Fixed-length sequences and global normalization.

use crate::error::DataError;
use crate::vocabulary::PAD_ID;

/// Fits `sequence` to exactly `length` entries.
///
/// Longer sequences keep their first `length` ids; shorter ones are left-padded
/// with [`PAD_ID`] so real tokens end up right-aligned.
pub fn pad_or_truncate(sequence: &[u32], length: usize) -> Vec<u32> {
    if sequence.len() >= length {
        return sequence[..length].to_vec();
    }
    let mut padded = vec![PAD_ID; length - sequence.len()];
    padded.extend_from_slice(sequence);
    padded
}

/// Scales a padded corpus by its global maximum id.
pub fn normalize_corpus(
    padded: &[Vec<u32>],
    sequence_length: usize,
) -> Result<NormalizedCorpus, DataError> {
    NormalizedCorpus::from_padded(padded, sequence_length)
}

/// Padded corpus scaled by its single global maximum id.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedCorpus {
    rows: Vec<Vec<f32>>,
    sequence_length: usize,
    max_id: u32,
}

impl NormalizedCorpus {
    /// Divides every value of the padded corpus by the maximum id across all rows.
    pub fn from_padded(padded: &[Vec<u32>], sequence_length: usize) -> Result<Self, DataError> {
        if sequence_length == 0 {
            return Err(DataError::InvalidSequenceLength);
        }
        if padded.is_empty() {
            return Err(DataError::EmptyCorpus);
        }
        let max_id = padded
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(PAD_ID);
        if max_id == PAD_ID {
            return Err(DataError::UndefinedNormalization);
        }

        let scale = max_id as f32;
        let rows = padded
            .iter()
            .map(|row| {
                debug_assert_eq!(row.len(), sequence_length);
                row.iter().map(|&id| id as f32 / scale).collect()
            })
            .collect();
        Ok(Self {
            rows,
            sequence_length,
            max_id,
        })
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// The global scalar used for normalization.
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Row-major copy of the whole corpus, `len() * sequence_length()` values.
    pub fn flatten(&self) -> Vec<f32> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Scales a new sequence with the stored maximum. Ids above it saturate at 1.
    pub fn normalize_sequence(&self, sequence: &[u32]) -> Vec<f32> {
        let scale = self.max_id as f32;
        pad_or_truncate(sequence, self.sequence_length)
            .into_iter()
            .map(|id| (id as f32 / scale).clamp(0.0, 1.0))
            .collect()
    }
}
