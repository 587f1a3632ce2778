use crate::{normalizer::TextNormalizer, token::Tokens};

/// Drops tokens shorter than `min` characters.
#[derive(Clone, Debug)]
pub struct MinLength {
    min: usize,
}

impl MinLength {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl TextNormalizer for MinLength {
    fn normalize(&self, tokens: &mut Tokens) {
        tokens.retain_mut(|token| token.chars().count() >= self.min);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        normalizer::{length::MinLength, TextNormalizer},
        tokens,
    };

    #[test]
    fn test_normalizer_min_length() {
        let mut tokens = tokens!["i", "am", "a", "cat", "é"];
        MinLength::new(2).normalize(&mut tokens);
        assert_eq!(tokens, tokens!["am", "cat"]);
    }
}
