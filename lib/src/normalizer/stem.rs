extern crate rust_stemmers;

use std::fmt::{Debug, Formatter};

use rust_stemmers::{Algorithm, Stemmer};

use crate::{
    normalizer::TextNormalizer,
    token::{Token, Tokens},
};

pub struct Stem(Stemmer);

impl Stem {
    pub fn english() -> Self {
        Self(Stemmer::create(Algorithm::English))
    }
}

impl Debug for Stem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Stem").field(&"<Stemmer>").finish()
    }
}

impl TextNormalizer for Stem {
    fn normalize(&self, tokens: &mut Tokens) {
        tokens.iter_mut().for_each(|token| {
            let stemmed = self.0.stem(token.as_str()).into_owned();
            *token = Token::from(stemmed);
        })
    }
}
