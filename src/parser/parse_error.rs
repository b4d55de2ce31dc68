use crate::parser::{QueryParser, Token, TokenizeError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ParseError: {reason}\n  at token {position} -> '{}'", .token.as_deref().unwrap_or("<eof>"))]
pub struct ParseError {
    pub position: usize,
    pub token: Option<String>,
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: &str, parser: &QueryParser) -> Self {
        Self::at(reason, parser.absolute_position(), parser.current())
    }

    pub fn at(reason: &str, position: usize, token: Option<&Token>) -> Self {
        Self {
            position,
            token: token.map(|t| t.to_string()),
            reason: reason.to_string(),
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}

/// Any failure turning SQL text into a query tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
