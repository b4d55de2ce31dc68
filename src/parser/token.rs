use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Keyword, identifier or dotted reference, lower-cased.
    Word,
    Number,
    /// Quoted string literal, quotes removed.
    Literal,
    Symbol,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn word(text: &str) -> Self {
        Self { kind: TokenKind::Word, text: text.to_lowercase() }
    }

    pub fn number(text: &str) -> Self {
        Self { kind: TokenKind::Number, text: text.to_string() }
    }

    pub fn literal(text: &str) -> Self {
        Self { kind: TokenKind::Literal, text: text.to_string() }
    }

    pub fn symbol(text: &str) -> Self {
        Self { kind: TokenKind::Symbol, text: text.to_string() }
    }

    /// True for a non-literal token spelled `text`.
    pub fn is(&self, text: &str) -> bool {
        self.kind != TokenKind::Literal && self.text == text
    }

    pub fn is_any(&self, texts: &[&str]) -> bool {
        self.kind != TokenKind::Literal && texts.contains(&self.text.as_str())
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Literal => write!(f, "\"{}\"", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self)
    }
}
