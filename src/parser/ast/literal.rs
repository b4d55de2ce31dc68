use ordered_float::NotNan;
use std::fmt::{self, Display};

use crate::parser::{QueryParser, TokenKind};

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(String),
    Number(NotNan<f64>),
    Null,
    List(Vec<Literal>),
}

impl Literal {
    /// Parse a single literal at the cursor, including a negated number.
    pub fn parse(parser: &mut QueryParser) -> Option<Self> {
        let token = parser.current()?;
        let literal = match token.kind {
            TokenKind::Literal => Literal::String(token.text.clone()),
            TokenKind::Number => Literal::number(&token.text, false)?,
            TokenKind::Word if token.is("null") => Literal::Null,
            TokenKind::Symbol if token.is("-") => {
                let number = parser.peek(1).filter(|t| t.kind == TokenKind::Number)?;
                let literal = Literal::number(&number.text, true)?;
                parser.next();
                literal
            }
            _ => return None,
        };
        parser.next();
        Some(literal)
    }

    fn number(text: &str, negative: bool) -> Option<Self> {
        let value = text.parse::<f64>().ok()?;
        let value = if negative { -value } else { value };
        NotNan::new(value).ok().map(Literal::Number)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "s: \"{}\"", s),
            Literal::Number(n) => write!(f, "n: {}", n.into_inner()),
            Literal::Null => write!(f, "NULL"),
            Literal::List(items) => {
                let items = items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "[{}]", items)
            }
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Literal({})", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{AliasMap, QueryParser, ast::Literal, tokenize},
        schema::Schema,
    };

    #[test]
    pub fn test_literals() {
        let schema = Schema::default();
        let aliases = AliasMap::default();
        let tokens = tokenize("'F' 42 - 3.5 null gender").expect("Failed to tokenize");
        let mut parser = QueryParser::new(tokens, &schema, &aliases);

        assert_eq!(Literal::parse(&mut parser), Some(Literal::String("F".into())));
        assert_eq!(Literal::parse(&mut parser).map(|l| l.to_string()), Some("n: 42".to_string()));
        assert_eq!(Literal::parse(&mut parser).map(|l| l.to_string()), Some("n: -3.5".to_string()));
        assert_eq!(Literal::parse(&mut parser), Some(Literal::Null));
        assert_eq!(Literal::parse(&mut parser), None);
        assert!(parser.current_is("gender"));
    }
}
