use crate::{
    parser::{AliasMap, ParseError, Token, is_clause_keyword},
    schema::Schema,
};

/// Cursor over a token stream, carrying the schema and alias table every
/// clause parser resolves columns against.
#[derive(Debug, Clone)]
pub struct QueryParser<'a> {
    pub position: usize,
    pub length: usize,
    pub tokens: Vec<Token>,
    pub schema: &'a Schema,
    pub aliases: &'a AliasMap,
    offset: usize,
}

impl<'a> QueryParser<'a> {
    pub fn new(tokens: Vec<Token>, schema: &'a Schema, aliases: &'a AliasMap) -> Self {
        Self {
            position: 0,
            length: tokens.len(),
            tokens,
            schema,
            aliases,
            offset: 0,
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn current_is(&self, text: &str) -> bool {
        self.current().is_some_and(|t| t.is(text))
    }

    pub fn current_is_any(&self, texts: &[&str]) -> bool {
        self.current().is_some_and(|t| t.is_any(texts))
    }

    pub fn peek(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.position + ahead)
    }

    pub fn peek_is(&self, ahead: usize, text: &str) -> bool {
        self.peek(ahead).is_some_and(|t| t.is(text))
    }

    pub fn next(&mut self) {
        self.position += 1;
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    pub fn expect(&mut self, text: &str, reason: &str) -> Result<(), ParseError> {
        if !self.current_is(text) {
            return ParseError::new(reason, self).err();
        }
        self.next();
        Ok(())
    }

    /// Position in the statement the cursor was carved from.
    pub fn absolute_position(&self) -> usize {
        self.offset + self.position
    }

    pub fn at_clause_keyword(&self) -> bool {
        self.current().is_some_and(|t| t.is_word() && is_clause_keyword(&t.text))
    }

    /// End of the current clause: end of input, a clause keyword, a closing
    /// parenthesis or a statement terminator.
    pub fn at_clause_end(&self) -> bool {
        self.eof() || self.at_clause_keyword() || self.current_is_any(&[")", ";"])
    }

    /// Index of the parenthesis closing the one at `open`.
    pub fn matching_paren(&self, open: usize) -> Option<usize> {
        if !self.tokens.get(open)?.is("(") {
            return None;
        }
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// First `text` token from the cursor on at the cursor's nesting level,
    /// stopping at the end of the enclosing parenthesis.
    pub fn find_at_depth(&self, text: &str) -> Option<usize> {
        let mut depth = 0isize;
        for (i, token) in self.tokens.iter().enumerate().skip(self.position) {
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            } else if depth == 0 && token.is(text) {
                return Some(i);
            }
        }
        None
    }

    /// A cursor over `tokens[start..end]` sharing schema and aliases.
    pub fn span(&self, start: usize, end: usize) -> QueryParser<'a> {
        let end = end.min(self.length);
        let start = start.min(end);
        let tokens = self.tokens[start..end].to_vec();
        QueryParser {
            position: 0,
            length: tokens.len(),
            tokens,
            schema: self.schema,
            aliases: self.aliases,
            offset: self.offset + start,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{AliasMap, QueryParser, tokenize},
        schema::Schema,
    };

    #[test]
    pub fn test_find_at_depth_skips_nested_blocks() {
        let schema = Schema::default();
        let aliases = AliasMap::default();
        let tokens = tokenize("select (select a from t) from u").expect("Failed to tokenize");
        let parser = QueryParser::new(tokens, &schema, &aliases);

        assert_eq!(parser.find_at_depth("from"), Some(7));
        assert_eq!(parser.matching_paren(1), Some(6));
    }

    #[test]
    pub fn test_span_keeps_absolute_positions() {
        let schema = Schema::default();
        let aliases = AliasMap::default();
        let tokens = tokenize("lower ( name ) , x").expect("Failed to tokenize");
        let parser = QueryParser::new(tokens, &schema, &aliases);

        let mut inner = parser.span(2, 3);
        assert_eq!(inner.length, 1);
        assert!(inner.current_is("name"));
        assert_eq!(inner.absolute_position(), 2);
        inner.next();
        assert!(inner.eof());
        assert!(inner.at_clause_end());
    }
}
