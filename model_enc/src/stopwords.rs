//! Fixed stopword lists and the set type consulted by the tokenizer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

const ENGLISH: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "another", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "between", "both", "but", "by", "came", "can",
    "come", "could", "did", "do", "each", "for", "from", "get", "got", "has", "had", "he", "have",
    "her", "here", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "like",
    "make", "many", "me", "might", "more", "most", "much", "must", "my", "never", "now", "of",
    "on", "only", "or", "other", "our", "out", "over", "said", "same", "see", "should", "since",
    "some", "still", "such", "take", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "up", "very", "was", "way",
    "we", "well", "were", "what", "where", "which", "while", "who", "with", "would", "you",
    "your",
];

const SPANISH: &[&str] = &[
    "a", "al", "algo", "algunas", "algunos", "ante", "antes", "como", "con", "contra", "cual",
    "cuando", "de", "del", "desde", "donde", "durante", "e", "el", "ella", "ellas", "ellos", "en",
    "entre", "era", "es", "esa", "esas", "ese", "eso", "esos", "esta", "estaba", "estas", "este",
    "esto", "estos", "fue", "ha", "hay", "la", "las", "le", "les", "lo", "los", "me", "mi", "mis",
    "mucho", "muy", "más", "nada", "ni", "no", "nos", "nosotros", "o", "os", "otra", "otro",
    "para", "pero", "poco", "por", "porque", "que", "quien", "se", "sea", "ser", "si", "sin",
    "sobre", "su", "sus", "también", "te", "tiene", "todo", "tu", "tus", "un", "una", "uno",
    "unos", "y", "ya", "yo", "él",
];

/// Built-in stopword lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    /// Keep every token.
    None,
}

/// Stopword selection as written in configuration files: a language name or an explicit list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopwordConfig {
    Language(Language),
    Custom(Vec<String>),
}

impl Default for StopwordConfig {
    fn default() -> Self {
        Self::Language(Language::English)
    }
}

impl StopwordConfig {
    /// Materialises the configured set.
    pub fn build(&self) -> StopwordSet {
        match self {
            Self::Language(language) => StopwordSet::for_language(*language),
            Self::Custom(words) => StopwordSet::from_words(words),
        }
    }
}

/// Lowercased words removed after tokenization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn english() -> Self {
        Self::from_words(ENGLISH)
    }

    pub fn spanish() -> Self {
        Self::from_words(SPANISH)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::english(),
            Language::Spanish => Self::spanish(),
            Language::None => Self::empty(),
        }
    }

    /// Builds a set from arbitrary words; entries are lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_words_are_lowercased() {
        let set = StopwordSet::from_words(["Please", "ME"]);
        assert!(set.contains("please"));
        assert!(set.contains("me"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn config_accepts_language_or_list() {
        let language: StopwordConfig = serde_json::from_str(r#""spanish""#).unwrap();
        assert_eq!(language, StopwordConfig::Language(Language::Spanish));
        assert!(language.build().contains("para"));

        let custom: StopwordConfig = serde_json::from_str(r#"["please", "me"]"#).unwrap();
        let set = custom.build();
        assert!(set.contains("please"));
        assert!(!set.contains("the"));

        let none: StopwordConfig = serde_json::from_str(r#""none""#).unwrap();
        assert!(none.build().is_empty());
    }

    #[test]
    fn default_is_english() {
        let set = StopwordConfig::default().build();
        assert!(set.contains("the"));
        assert!(!set.contains("buy"));
    }
}
