use crate::{
    parser::{AliasMap, ParseError, QueryParser, SqlError, Token, ast::SqlQuery, tokenize},
    schema::Schema,
};

/// Parse a token stream into a query tree resolved against `schema`.
pub fn parse(tokens: Vec<Token>, schema: &Schema) -> Result<SqlQuery, ParseError> {
    check_parentheses(&tokens)?;
    let aliases = AliasMap::scan(&tokens, schema)?;

    let mut parser = QueryParser::new(tokens, schema, &aliases);
    let query = SqlQuery::parse(&mut parser)?;

    while parser.current_is(";") {
        parser.next();
    }
    if !parser.eof() {
        return ParseError::new("unexpected trailing token", &parser).err();
    }

    Ok(query)
}

/// Tokenize and parse SQL text.
pub fn parse_sql(text: &str, schema: &Schema) -> Result<SqlQuery, SqlError> {
    let tokens = tokenize(text)?;
    Ok(parse(tokens, schema)?)
}

fn check_parentheses(tokens: &[Token]) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (position, token) in tokens.iter().enumerate() {
        if token.is("(") {
            depth += 1;
        } else if token.is(")") {
            if depth == 0 {
                return ParseError::at("unmatched closing parenthesis", position, Some(token)).err();
            }
            depth -= 1;
        }
    }
    if depth > 0 {
        return ParseError::at("unclosed parenthesis", tokens.len(), None).err();
    }
    Ok(())
}
