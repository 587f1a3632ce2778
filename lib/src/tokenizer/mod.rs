mod standard;

pub use standard::Standard;

use crate::token::Tokens;

pub trait TextTokenizer {
    fn tokenize<T: AsRef<str>>(&self, text: T) -> Tokens;
}
