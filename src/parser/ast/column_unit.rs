use crate::{
    parser::{AGG_OPS, ColumnResolver, ParseError, QueryParser, ast::AggOp},
    schema::CanonicalId,
};

/// An optionally aggregated, optionally distinct column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColUnit {
    pub agg: AggOp,
    pub column: CanonicalId,
    pub distinct: bool,
}

impl ColUnit {
    pub fn new(column: CanonicalId) -> Self {
        Self { agg: AggOp::None, column, distinct: false }
    }

    /// Aggregate function at the cursor, when it is followed by `(`.
    pub fn aggregate_call(parser: &QueryParser) -> Option<AggOp> {
        let token = parser.current()?;
        if token.is_word() && AGG_OPS.contains(&token.text.as_str()) && parser.peek_is(1, "(") {
            return AggOp::try_from(token.text.as_str()).ok();
        }
        None
    }

    /// A function call whose first argument is an aggregate call, like
    /// `round(avg(x), 2)`. Returns the bounds of the call's parentheses.
    pub fn wrapped_aggregate(parser: &QueryParser) -> Option<(usize, usize)> {
        if !ColumnResolver::is_function_call(parser) {
            return None;
        }
        let first_argument = parser.peek(2)?;
        if !(first_argument.is_word() && AGG_OPS.contains(&first_argument.text.as_str()) && parser.peek_is(3, "(")) {
            return None;
        }
        let open = parser.position + 1;
        parser.matching_paren(open).map(|close| (open, close))
    }

    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        let is_block = parser.current_is("(");
        if is_block {
            parser.next();
        }

        let unit = if let Some(agg) = Self::aggregate_call(parser) {
            parser.jump(2);
            let distinct = Self::parse_distinct(parser);
            let column = ColumnResolver::parse(parser, default_tables)?;
            parser.expect(")", "unclosed aggregate call")?;
            ColUnit { agg, column, distinct }
        } else if let Some((open, close)) = Self::wrapped_aggregate(parser) {
            let mut arguments = parser.span(open + 1, close);
            let unit = Self::parse(&mut arguments, default_tables)?;
            parser.position = close + 1;
            unit
        } else {
            let distinct = Self::parse_distinct(parser);
            let column = ColumnResolver::parse(parser, default_tables)?;
            ColUnit { agg: AggOp::None, column, distinct }
        };

        if is_block {
            parser.expect(")", "unclosed column block")?;
        }

        Ok(unit)
    }

    fn parse_distinct(parser: &mut QueryParser) -> bool {
        let distinct = parser.current_is("distinct");
        if distinct {
            parser.next();
        }
        distinct
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        visitor(&mut self.column);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{AliasMap, QueryParser, ast::{AggOp, ColUnit}, tokenize},
        schema::Schema,
    };

    fn parse(sql: &str) -> ColUnit {
        let schema = Schema::build([("chartevents", vec!["itemid", "valuenum"])]).expect("Failed to build schema");
        let aliases = AliasMap::default();
        let tokens = tokenize(sql).expect("Failed to tokenize");
        let mut parser = QueryParser::new(tokens, &schema, &aliases);
        let unit = ColUnit::parse(&mut parser, &["chartevents".to_string()]).expect("Failed to parse column unit");
        assert!(parser.eof(), "unconsumed tokens in {}", sql);
        unit
    }

    #[test]
    pub fn test_aggregate_distinct() {
        let unit = parse("count(distinct itemid)");
        assert_eq!(unit.agg, AggOp::Count);
        assert!(unit.distinct);
        assert_eq!(unit.column.as_str(), "__chartevents.itemid__");
    }

    #[test]
    pub fn test_block_column() {
        let unit = parse("(valuenum)");
        assert_eq!(unit.agg, AggOp::None);
        assert_eq!(unit.column.base_name(), "valuenum");
    }

    #[test]
    pub fn test_function_around_aggregate_keeps_aggregate() {
        assert_eq!(parse("round(avg(valuenum), 2)"), parse("avg(valuenum)"));
    }
}
