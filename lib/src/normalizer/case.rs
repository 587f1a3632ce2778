use crate::{normalizer::TextNormalizer, token::Tokens};

#[derive(Clone, Debug, Default)]
pub struct Lowercase;

impl Lowercase {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for Lowercase {
    fn normalize(&self, tokens: &mut Tokens) {
        tokens.iter_mut().for_each(|token| {
            let inner = token.inner_mut();
            if inner.is_ascii() {
                inner.make_ascii_lowercase();
            } else {
                *inner = inner.to_lowercase();
            }
        })
    }
}
