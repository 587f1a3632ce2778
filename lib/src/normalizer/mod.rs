//! Text normalization collaborator.
//!
//! The index core only depends on [`Normalize`]: a deterministic mapping from
//! raw text to an ordered term sequence. [`Analyzer`] is the default
//! implementation, a tokenizer followed by a [`NormalizerPipeline`].

pub mod case;
pub mod length;
pub mod punctuation;
pub mod stem;
pub mod stopwords;

pub use stopwords::Stopwords;

use std::fmt::Debug;

use crate::{
    config::AnalyzerConfig,
    token::Tokens,
    tokenizer::{Standard, TextTokenizer},
};

use self::{case::Lowercase, length::MinLength, punctuation::Punctuation, stem::Stem};

/// `normalize(text) -> ordered sequence of terms`.
pub trait Normalize: Debug + Send + Sync {
    fn normalize(&self, text: &str) -> Tokens;
}

pub trait TextNormalizer: Debug + Send + Sync {
    fn normalize(&self, tokens: &mut Tokens);
}

#[derive(Debug, Default)]
pub struct NormalizerPipeline(Vec<Box<dyn TextNormalizer>>);

impl NormalizerPipeline {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, normalizer: Box<dyn TextNormalizer>) -> &mut Self {
        self.0.push(normalizer);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn run(&self, tokens: &mut Tokens) {
        self.0.iter().for_each(|normalizer| {
            normalizer.normalize(tokens);
        })
    }
}

#[derive(Debug, Default)]
pub struct Analyzer {
    tokenizer: Standard,
    pipeline: NormalizerPipeline,
}

impl Analyzer {
    pub fn new(tokenizer: Standard, pipeline: NormalizerPipeline) -> Self {
        Self {
            tokenizer,
            pipeline,
        }
    }

    /// Builds the stage order lowercase, punctuation, length, stopwords, stem.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let mut pipeline = NormalizerPipeline::new();

        if config.lowercase {
            pipeline.insert(Box::new(Lowercase::new()));
        }
        if config.strip_punctuation {
            pipeline.insert(Box::new(Punctuation::new()));
        }
        if config.min_token_length > 1 {
            pipeline.insert(Box::new(MinLength::new(config.min_token_length)));
        }
        if config.remove_stopwords {
            pipeline.insert(Box::new(Stopwords::english()));
        }
        if config.stem {
            pipeline.insert(Box::new(Stem::english()));
        }

        Self::new(Standard::new(), pipeline)
    }
}

impl Normalize for Analyzer {
    fn normalize(&self, text: &str) -> Tokens {
        let mut tokens = self.tokenizer.tokenize(text);

        if !self.pipeline.is_empty() {
            self.pipeline.run(&mut tokens);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::AnalyzerConfig,
        normalizer::{
            case::Lowercase, punctuation::Punctuation, Analyzer, Normalize, NormalizerPipeline,
            Stopwords,
        },
        tokens,
    };

    #[test]
    fn test_normalizer_pipeline() {
        let mut tokens = tokens!["The", "cat", "in", "the", "hat", "and", "bat"];

        let mut pipeline = NormalizerPipeline::new();
        pipeline.insert(Box::new(Lowercase::new()));
        pipeline.insert(Box::new(Stopwords::new(["the", "and", "in"])));
        pipeline.run(&mut tokens);

        assert_eq!(tokens, tokens!["cat", "hat", "bat"]);
    }

    #[test]
    fn test_normalizer_with_punctuation() {
        let mut tokens = tokens!["the", "cat's", "in", "the", "hat", "'", "bat"];

        let mut pipeline = NormalizerPipeline::new();
        pipeline.insert(Box::new(Punctuation::new()));
        pipeline.insert(Box::new(Stopwords::new(["the", "and", "in"])));
        pipeline.run(&mut tokens);

        assert_eq!(tokens, tokens!["cats", "hat", "bat"]);
    }

    #[test]
    fn test_analyzer_default() {
        let analyzer = Analyzer::from_config(&AnalyzerConfig::default());
        let tokens = analyzer.normalize("Was it raining? The Cats were PLAYING!");

        assert_eq!(tokens, tokens!["rain", "cat", "play"]);
    }

    #[test]
    fn test_analyzer_drops_contractions() {
        let analyzer = Analyzer::from_config(&AnalyzerConfig::default());
        let tokens = analyzer.normalize("I don't know, you're right. She's here!");

        assert_eq!(tokens, tokens!["know", "right"]);
    }

    #[test]
    fn test_analyzer_is_deterministic() {
        let analyzer = Analyzer::from_config(&AnalyzerConfig::default());
        let text = "Harry Potter books, best movies";

        assert_eq!(analyzer.normalize(text), analyzer.normalize(text));
    }

    #[test]
    fn test_analyzer_plain() {
        let analyzer = Analyzer::from_config(&AnalyzerConfig::plain());
        let tokens = analyzer.normalize("Cat dog, a bird");

        assert_eq!(tokens, tokens!["cat", "dog", "a", "bird"]);
    }
}
