//! First-seen-order token ids.

use std::collections::HashMap;

/// Padding sentinel. Never assigned to a token.
pub const PAD_ID: u32 = 0;

/// Frozen token to id mapping. Ids are dense, start at 1 and follow first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    // tokens[id - 1] is the token assigned `id`.
    tokens: Vec<String>,
}

impl Vocabulary {
    pub fn id(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    /// Reverse lookup; `PAD_ID` and unknown ids yield `None`.
    pub fn token(&self, id: u32) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.tokens.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Largest assigned id, or `PAD_ID` for an empty vocabulary.
    pub fn max_id(&self) -> u32 {
        self.tokens.len() as u32
    }

    /// Tokens paired with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, token)| (token.as_str(), index as u32 + 1))
    }

    /// Encodes tokens against the frozen mapping. Unknown tokens are skipped.
    pub fn encode(&self, tokens: &[String]) -> Vec<u32> {
        tokens.iter().filter_map(|token| self.id(token)).collect()
    }
}

/// Append-only builder; consumed by [`VocabularyBuilder::finish`] to freeze the mapping.
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    vocabulary: Vocabulary,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes one record, assigning the next id to each unseen token.
    pub fn encode(&mut self, tokens: &[String]) -> Vec<u32> {
        tokens
            .iter()
            .map(|token| {
                if let Some(id) = self.vocabulary.id(token) {
                    return id;
                }
                self.vocabulary.tokens.push(token.clone());
                let id = self.vocabulary.tokens.len() as u32;
                self.vocabulary.ids.insert(token.clone(), id);
                id
            })
            .collect()
    }

    pub fn finish(self) -> Vocabulary {
        self.vocabulary
    }
}

/// Builds the vocabulary over the tokenized corpus in order and returns the unpadded id
/// sequence of every record alongside it.
pub fn build_vocabulary(tokenized: &[Vec<String>]) -> (Vocabulary, Vec<Vec<u32>>) {
    let mut builder = VocabularyBuilder::new();
    let sequences = tokenized.iter().map(|tokens| builder.encode(tokens)).collect();
    (builder.finish(), sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn ids_follow_first_seen_order() {
        let corpus = vec![
            tokens(&["buy", "now"]),
            tokens(&["help"]),
            tokens(&["buy", "buy", "buy"]),
        ];
        let (vocabulary, sequences) = build_vocabulary(&corpus);

        assert_eq!(vocabulary.id("buy"), Some(1));
        assert_eq!(vocabulary.id("now"), Some(2));
        assert_eq!(vocabulary.id("help"), Some(3));
        assert_eq!(vocabulary.max_id(), 3);
        assert_eq!(sequences, vec![vec![1, 2], vec![3], vec![1, 1, 1]]);
    }

    #[test]
    fn reverse_lookup_skips_padding() {
        let (vocabulary, _) = build_vocabulary(&[tokens(&["hola", "mundo"])]);
        assert_eq!(vocabulary.token(PAD_ID), None);
        assert_eq!(vocabulary.token(2), Some("mundo"));
        assert_eq!(vocabulary.token(3), None);
        assert_eq!(
            vocabulary.iter().collect::<Vec<_>>(),
            vec![("hola", 1), ("mundo", 2)]
        );
    }

    #[test]
    fn frozen_vocabulary_skips_unknown_tokens() {
        let (vocabulary, _) = build_vocabulary(&[tokens(&["buy", "now"])]);
        assert_eq!(vocabulary.encode(&tokens(&["now", "later", "buy"])), vec![2, 1]);
        assert_eq!(vocabulary.len(), 2);
    }

    proptest! {
        #[test]
        fn rebuilding_is_deterministic_and_dense(
            corpus in prop::collection::vec(
                prop::collection::vec("[a-e]{1,2}", 0..6),
                0..8,
            )
        ) {
            let (first, first_sequences) = build_vocabulary(&corpus);
            let (second, second_sequences) = build_vocabulary(&corpus);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first_sequences, second_sequences);

            let mut ids: Vec<u32> = first.iter().map(|(_, id)| id).collect();
            ids.sort_unstable();
            let expected: Vec<u32> = (1..=first.len() as u32).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
