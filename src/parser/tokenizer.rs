use std::{iter::Peekable, str::CharIndices};

use crate::parser::{IS_NOT_NULL, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    #[error("unbalanced quote {quote} starting at byte {position}")]
    UnbalancedQuote { quote: char, position: usize },
}

/// Split SQL text into lower-cased tokens with dialect constructs folded:
/// `! =`/`> =`/`< =` and `<>` merge into one operator, `is not null` becomes a
/// single token, `fetch first N rows only` becomes `limit N`, `offset N rows`
/// is dropped and `minus` reads as `except`.
pub fn tokenize(text: &str) -> Result<Vec<Token>, TokenizeError> {
    let text = strip_terminators(text);
    let tokens = Lexer::new(text).lex()?;
    Ok(rewrite_dialect(merge_operators(tokens)))
}

fn strip_terminators(text: &str) -> &str {
    let mut text = text.trim();
    while let Some(stripped) = text.strip_suffix(';') {
        text = stripped.trim_end();
    }
    text
}

struct Lexer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, chars: text.char_indices().peekable() }
    }

    fn lex(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = vec![];

        while let Some(&(start, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else if c == '-' && self.text[start..].starts_with("--") {
                self.skip_line();
            } else if c == '\'' || c == '"' {
                tokens.push(self.quoted(start, c)?);
            } else if c.is_ascii_digit() || (c == '.' && self.next_is_digit(start)) {
                tokens.push(self.number(start));
            } else if c.is_alphabetic() || c == '_' {
                tokens.push(self.word(start));
            } else {
                self.chars.next();
                tokens.push(Token::symbol(&c.to_string()));
            }
        }

        Ok(tokens)
    }

    fn skip_line(&mut self) {
        for (_, c) in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
    }

    fn next_is_digit(&self, start: usize) -> bool {
        self.text[start + 1..].chars().next().is_some_and(|c| c.is_ascii_digit())
    }

    fn quoted(&mut self, start: usize, quote: char) -> Result<Token, TokenizeError> {
        self.chars.next();
        let mut value = String::new();

        loop {
            match self.chars.next() {
                None => return Err(TokenizeError::UnbalancedQuote { quote, position: start }),
                Some((_, c)) if c == quote => {
                    // a doubled quote is an escaped quote
                    if self.chars.peek().is_some_and(|&(_, next)| next == quote) {
                        self.chars.next();
                        value.push(quote);
                    } else {
                        return Ok(Token::literal(&value));
                    }
                }
                Some((_, c)) => value.push(c),
            }
        }
    }

    fn number(&mut self, start: usize) -> Token {
        let mut end = start;
        let mut seen_dot = false;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                seen_dot |= c == '.';
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        Token::number(&self.text[start..end])
    }

    fn word(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            let continues_reference = c == '.'
                && self.text[i + 1..]
                    .chars()
                    .next()
                    .is_some_and(|n| n.is_alphanumeric() || n == '_' || n == '*');
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '#' || continues_reference {
                end = i + c.len_utf8();
                self.chars.next();
            } else if c == '*' && self.text[start..end].ends_with('.') {
                end = i + 1;
                self.chars.next();
                break;
            } else {
                break;
            }
        }
        Token::word(&self.text[start..end])
    }
}

fn merge_operators(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        if let Some(last) = merged.last_mut() {
            if last.kind == TokenKind::Symbol && token.kind == TokenKind::Symbol {
                let joined = match (last.text.as_str(), token.text.as_str()) {
                    ("!", "=") | ("<", ">") => Some("!="),
                    (">", "=") => Some(">="),
                    ("<", "=") => Some("<="),
                    _ => None,
                };
                if let Some(joined) = joined {
                    *last = Token::symbol(joined);
                    continue;
                }
            }
        }
        merged.push(token);
    }

    merged
}

fn token_is(tokens: &[Token], at: usize, texts: &[&str]) -> bool {
    tokens.get(at).is_some_and(|t| t.is_any(texts))
}

fn token_is_number(tokens: &[Token], at: usize) -> bool {
    tokens.get(at).is_some_and(|t| t.kind == TokenKind::Number)
}

fn rewrite_dialect(tokens: Vec<Token>) -> Vec<Token> {
    let mut rewritten = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if token_is(&tokens, i, &["is"]) && token_is(&tokens, i + 1, &["not"]) && token_is(&tokens, i + 2, &["null"]) {
            rewritten.push(Token::word(IS_NOT_NULL));
            i += 3;
        } else if token_is(&tokens, i, &["fetch"])
            && token_is(&tokens, i + 1, &["first", "next"])
            && token_is_number(&tokens, i + 2)
            && token_is(&tokens, i + 3, &["rows", "row"])
            && token_is(&tokens, i + 4, &["only"])
        {
            rewritten.push(Token::word("limit"));
            rewritten.push(tokens[i + 2].clone());
            i += 5;
        } else if token_is(&tokens, i, &["offset"])
            && token_is_number(&tokens, i + 1)
            && token_is(&tokens, i + 2, &["rows", "row"])
        {
            i += 3;
        } else if token_is(&tokens, i, &["minus"]) {
            rewritten.push(Token::word("except"));
            i += 1;
        } else {
            rewritten.push(tokens[i].clone());
            i += 1;
        }
    }

    rewritten
}

#[cfg(test)]
mod tests {
    use crate::parser::{Token, TokenizeError, tokenize};

    fn texts(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    pub fn test_tokenize_lowercases_words() {
        let tokens = tokenize("SELECT P.Gender FROM Patients p").expect("Failed to tokenize");
        assert_eq!(texts(&tokens), vec!["select", "p.gender", "from", "patients", "p"]);
    }

    #[test]
    pub fn test_tokenize_strips_terminators() {
        let tokens = tokenize("select * from t ;;  ; ").expect("Failed to tokenize");
        assert_eq!(texts(&tokens), vec!["select", "*", "from", "t"]);
    }

    #[test]
    pub fn test_tokenize_merges_comparisons() {
        let tokens = tokenize("a ! = 1 and b >= 2 and c < = 3 and d <> 4").expect("Failed to tokenize");
        let ops: Vec<String> = tokens.iter().filter(|t| t.kind == crate::parser::TokenKind::Symbol).map(|t| t.text.clone()).collect();
        assert_eq!(ops, vec!["!=", ">=", "<=", "!="]);
    }

    #[test]
    pub fn test_tokenize_is_not_null() {
        let tokens = tokenize("select a from t where a IS NOT NULL").expect("Failed to tokenize");
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some("is not null"));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    pub fn test_tokenize_fetch_first() {
        let tokens = tokenize("select a from t order by a FETCH FIRST 5 ROWS ONLY;").expect("Failed to tokenize");
        assert_eq!(texts(&tokens[tokens.len() - 2..]), vec!["limit", "5"]);

        let tokens = tokenize("select a from t offset 10 rows fetch next 1 row only").expect("Failed to tokenize");
        assert_eq!(texts(&tokens), vec!["select", "a", "from", "t", "limit", "1"]);
    }

    #[test]
    pub fn test_tokenize_keeps_literals_whole() {
        let tokens = tokenize("select a from t where b = 'Hello World; it''s' or c = \"x y\"").expect("Failed to tokenize");
        let literals: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == crate::parser::TokenKind::Literal)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(literals, vec!["Hello World; it's", "x y"]);
    }

    #[test]
    pub fn test_tokenize_literal_is_not_a_keyword() {
        let tokens = tokenize("select a from t where b = 'select'").expect("Failed to tokenize");
        let last = tokens.last().expect("token");
        assert!(!last.is("select"));
    }

    #[test]
    pub fn test_tokenize_unbalanced_quote() {
        match tokenize("select a from t where b = 'oops") {
            Err(TokenizeError::UnbalancedQuote { quote, position }) => {
                assert_eq!(quote, '\'');
                assert_eq!(position, 26);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    pub fn test_tokenize_numbers_and_star_references() {
        let tokens = tokenize("select t.*, 3.5, count(*) from t -- trailing comment").expect("Failed to tokenize");
        assert_eq!(texts(&tokens), vec!["select", "t.*", ",", "3.5", ",", "count", "(", "*", ")", "from", "t"]);
    }

    #[test]
    pub fn test_tokenize_minus_reads_as_except() {
        let tokens = tokenize("select a from t minus select a from u").expect("Failed to tokenize");
        assert!(tokens[4].is("except"));
    }
}
