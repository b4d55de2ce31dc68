use crate::{
    parser::{AGG_OPS, COND_OPS, ParseError, QueryParser, Token, TokenKind, UNIT_OPS, WHERE_OPS, is_reserved},
    schema::{ALL_COLUMNS_MARKER, CanonicalId, ROWNUM_MARKER},
};

/// Resolves column references to canonical identifiers.
pub struct ColumnResolver;

impl ColumnResolver {
    /// Resolve the column reference at the cursor and consume its tokens.
    ///
    /// A function call around a column resolves to the wrapped column; when
    /// the call's arguments do not start with a resolvable column it stands
    /// for all columns.
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<CanonicalId, ParseError> {
        let Some(token) = parser.current().cloned() else {
            return ParseError::new("expected a column", parser).err();
        };

        if Self::is_function_call(parser) {
            return Self::parse_function(parser, default_tables);
        }

        let id = Self::resolve_token(parser, &token, default_tables)?;
        parser.next();
        Ok(id)
    }

    /// A non-reserved, non-aggregate word immediately followed by `(`.
    pub fn is_function_call(parser: &QueryParser) -> bool {
        parser.current().is_some_and(|t| {
            t.is_word() && !is_reserved(&t.text) && !AGG_OPS.contains(&t.text.as_str())
        }) && parser.peek_is(1, "(")
    }

    fn parse_function(parser: &mut QueryParser, default_tables: &[String]) -> Result<CanonicalId, ParseError> {
        let open = parser.position + 1;
        let Some(close) = parser.matching_paren(open) else {
            return ParseError::new("unclosed function call", parser).err();
        };

        let mut arguments = parser.span(open + 1, close);
        let id = Self::parse(&mut arguments, default_tables).unwrap_or_else(|_| parser.schema.resolve_all());

        parser.position = close + 1;
        Ok(id)
    }

    fn resolve_token(parser: &QueryParser, token: &Token, default_tables: &[String]) -> Result<CanonicalId, ParseError> {
        let text = token.text.as_str();
        match token.kind {
            TokenKind::Number => ParseError::new("numeric literal where a column was expected", parser).err(),
            TokenKind::Literal => ParseError::new("string literal where a column was expected", parser).err(),
            TokenKind::Symbol if text == ALL_COLUMNS_MARKER => Ok(parser.schema.resolve_all()),
            TokenKind::Symbol if UNIT_OPS.contains(&text) || WHERE_OPS.contains(&text) => {
                ParseError::new("operator where a column was expected", parser).err()
            }
            TokenKind::Symbol => ParseError::new("unexpected symbol where a column was expected", parser).err(),
            TokenKind::Word if WHERE_OPS.contains(&text) || COND_OPS.contains(&text) => {
                ParseError::new("operator where a column was expected", parser).err()
            }
            TokenKind::Word if text == ROWNUM_MARKER => Ok(parser.schema.rownum()),
            TokenKind::Word if text.contains('.') => Self::resolve_qualified(parser, text),
            TokenKind::Word => parser
                .schema
                .find_in(default_tables, text)
                .or_else(|| parser.schema.find_anywhere(text))
                .ok_or_else(|| ParseError::new("unknown column", parser)),
        }
    }

    fn resolve_qualified(parser: &QueryParser, text: &str) -> Result<CanonicalId, ParseError> {
        let mut parts = text.rsplit('.');
        let column = parts.next().unwrap_or_default();
        let alias = parts.next().unwrap_or_default();

        let Some(table) = parser.aliases.resolve(alias) else {
            return ParseError::new("unknown table alias", parser).err();
        };
        if column == ALL_COLUMNS_MARKER {
            return Ok(parser.schema.resolve_all());
        }

        parser
            .schema
            .resolve(table, column)
            .map_err(|e| ParseError::new(&e.to_string(), parser))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{AliasMap, ColumnResolver, ParseError, QueryParser, tokenize},
        schema::{CanonicalId, Schema},
    };

    fn mk_schema() -> Schema {
        Schema::build([
            ("patients", vec!["subject_id", "gender"]),
            ("prescriptions", vec!["subject_id", "drug"]),
        ])
        .expect("Failed to build schema")
    }

    fn resolve(sql: &str, default_tables: &[&str]) -> Result<(CanonicalId, usize), ParseError> {
        let schema = mk_schema();
        let tokens = tokenize(sql).expect("Failed to tokenize");
        let aliases = AliasMap::scan(&tokens, &schema)?;
        let mut parser = QueryParser::new(tokens, &schema, &aliases);
        let tables: Vec<String> = default_tables.iter().map(|t| t.to_string()).collect();
        let id = ColumnResolver::parse(&mut parser, &tables)?;
        Ok((id, parser.position))
    }

    #[test]
    pub fn test_unqualified_prefers_source_tables() {
        let (id, _) = resolve("subject_id", &["prescriptions"]).expect("Failed to resolve");
        assert_eq!(id.as_str(), "__prescriptions.subject_id__");

        let (id, _) = resolve("subject_id", &[]).expect("Failed to resolve");
        assert_eq!(id.as_str(), "__patients.subject_id__");

        let (id, _) = resolve("drug", &["patients"]).expect("Failed to resolve");
        assert_eq!(id.as_str(), "__prescriptions.drug__");
    }

    #[test]
    pub fn test_function_resolves_to_wrapped_column() {
        let (id, position) = resolve("lower(trim(drug)) , x", &["prescriptions"]).expect("Failed to resolve");
        assert_eq!(id.as_str(), "__prescriptions.drug__");
        assert_eq!(position, 7);

        let (id, _) = resolve("substr(drug, 1, 3)", &["prescriptions"]).expect("Failed to resolve");
        assert_eq!(id.as_str(), "__prescriptions.drug__");
    }

    #[test]
    pub fn test_unresolvable_function_is_all_columns() {
        let (id, position) = resolve("to_char(sysdate, 'YYYY')", &["patients"]).expect("Failed to resolve");
        assert!(id.is_all_columns());
        assert_eq!(position, 6);
    }

    #[test]
    pub fn test_rejections() {
        assert_eq!(resolve("=", &[]).unwrap_err().reason, "operator where a column was expected");
        assert_eq!(resolve("not", &[]).unwrap_err().reason, "operator where a column was expected");
        assert_eq!(resolve("42", &[]).unwrap_err().reason, "numeric literal where a column was expected");
        assert_eq!(resolve("weight", &["patients"]).unwrap_err().reason, "unknown column");
        assert_eq!(resolve("z.gender", &[]).unwrap_err().reason, "unknown table alias");
    }

    #[test]
    pub fn test_markers() {
        let (id, _) = resolve("*", &[]).expect("Failed to resolve");
        assert!(id.is_all_columns());
        let (id, _) = resolve("ROWNUM", &[]).expect("Failed to resolve");
        assert!(id.is_rownum());
        let (id, _) = resolve("patients.*", &[]).expect("Failed to resolve");
        assert!(id.is_all_columns());
    }
}
