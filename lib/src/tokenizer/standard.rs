use std::{collections::HashSet, sync::OnceLock};

use crate::{
    token::{Token, Tokens},
    tokenizer::TextTokenizer,
};

fn delimiters() -> &'static HashSet<char> {
    static SET: OnceLock<HashSet<char>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            ' ', ',', ';', ':', '!', '?', '@', '#', '$', '%', '^', '&', '*', '.', '-', '/', '\\',
            '(', ')', '{', '}', '[', ']', '"', '<', '>', '|', '=', '+', '~', '`', '\t', '\r', '\n',
        ]
        .into_iter()
        .collect::<HashSet<char>>()
    })
}

/// Splits text on whitespace and common punctuation delimiters.
#[derive(Clone, Debug, Default)]
pub struct Standard;

impl Standard {
    pub fn new() -> Self {
        Self
    }
}

impl TextTokenizer for Standard {
    fn tokenize<T: AsRef<str>>(&self, text: T) -> Tokens {
        text.as_ref()
            .split(|ch: char| delimiters().contains(&ch) || ch.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(Token::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tokenizer::{Standard, TextTokenizer},
        tokens,
    };

    #[test]
    fn test_standard_basic() {
        let text = "The quick brown fox jumps over the lazy dog";
        let tokens = Standard::new().tokenize(text);

        assert_eq!(
            tokens,
            tokens!["The", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog"]
        );
    }

    #[test]
    fn test_standard_with_punctuation() {
        let tokens = Standard::new().tokenize("Hello, world! Is this a test?");
        assert_eq!(tokens, tokens!["Hello", "world", "Is", "this", "a", "test"]);
    }

    #[test]
    fn test_standard_empty_string() {
        let tokens = Standard::new().tokenize("");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_standard_mixed_whitespace() {
        let text = "The quick\tbrown\nfox  jumps\r\nover";
        let tokens = Standard::new().tokenize(text);

        assert_eq!(tokens, tokens!["The", "quick", "brown", "fox", "jumps", "over"]);
    }

    #[test]
    fn test_standard_unicode() {
        let tokens = Standard::new().tokenize("एकाधिक - ಭಾಷೆಗಳು - work");
        assert_eq!(tokens, tokens!["एकाधिक", "ಭಾಷೆಗಳು", "work"]);
    }

    #[test]
    fn test_standard_keeps_apostrophes() {
        let tokens = Standard::new().tokenize("it can't be");
        assert_eq!(tokens, tokens!["it", "can't", "be"]);
    }
}
