use crate::{normalizer::TextNormalizer, token::Tokens};

/// Strips ASCII punctuation and drops tokens left empty.
#[derive(Clone, Debug, Default)]
pub struct Punctuation;

impl Punctuation {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for Punctuation {
    fn normalize(&self, tokens: &mut Tokens) {
        tokens.retain_mut(|token| {
            token.inner_mut().retain(|ch| !ch.is_ascii_punctuation());
            !token.is_empty()
        });
    }
}
