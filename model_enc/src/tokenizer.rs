use crate::stopwords::StopwordSet;

/// Lowercasing word tokenizer with stopword removal.
///
/// Any character that is not alphanumeric separates words, so punctuation never
/// reaches the vocabulary. No stemming is applied.
#[derive(Clone, Debug, Default)]
pub struct Tokenizer {
    stopwords: StopwordSet,
}

impl Tokenizer {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Splits `text` into lowercase tokens, dropping stopwords.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty() && !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// Tokenizes every text, preserving input order.
    pub fn tokenize_all<'a, I>(&self, texts: I) -> Vec<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|text| self.tokenize(text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(StopwordSet::from_words(["please", "me"]))
    }

    #[rstest]
    #[case("buy now please", &["buy", "now"])]
    #[case("please help me", &["help"])]
    #[case("Buy, BUY; buy!", &["buy", "buy", "buy"])]
    #[case("order #42 isn't here", &["order", "42", "isn", "t", "here"])]
    #[case("", &[])]
    #[case("  ...  ", &[])]
    fn tokenize_lowercases_splits_and_filters(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(tokenizer().tokenize(text), expected);
    }

    #[test]
    fn non_ascii_letters_stay_inside_words() {
        let tokenizer = Tokenizer::new(StopwordSet::spanish());
        assert_eq!(
            tokenizer.tokenize("¿Dónde está mi pedido?"),
            vec!["dónde", "está", "pedido"]
        );
    }

    #[test]
    fn tokenize_all_keeps_order() {
        let tokens = tokenizer().tokenize_all(["help me", "now"]);
        assert_eq!(tokens, vec![vec!["help".to_string()], vec!["now".to_string()]]);
    }
}
