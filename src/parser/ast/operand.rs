use crate::{
    parser::{ParseError, QueryParser, ast::{ColUnit, Literal, SqlQuery, ValUnit}},
    schema::CanonicalId,
};

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Value(ValUnit),
    Query(Box<SqlQuery>),
}

impl Operand {
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        let is_block = parser.current_is("(");
        if is_block {
            parser.next();
        }

        let operand = if parser.current_is("select") {
            Operand::Query(Box::new(SqlQuery::parse(parser)?))
        } else if let Some(literal) = Literal::parse(parser) {
            if is_block && parser.current_is(",") {
                Operand::Literal(Self::parse_list(parser, literal)?)
            } else {
                Operand::Literal(literal)
            }
        } else {
            Operand::Value(ValUnit::from(ColUnit::parse(parser, default_tables)?))
        };

        if is_block {
            parser.expect(")", "unclosed operand block")?;
        }

        Ok(operand)
    }

    fn parse_list(parser: &mut QueryParser, first: Literal) -> Result<Literal, ParseError> {
        let mut items = vec![first];
        while parser.current_is(",") {
            parser.next();
            match Literal::parse(parser) {
                Some(literal) => items.push(literal),
                None => return ParseError::new("expected a literal in value list", parser).err(),
            }
        }
        Ok(Literal::List(items))
    }

    pub fn as_query(&self) -> Option<&SqlQuery> {
        match self {
            Operand::Query(query) => Some(query),
            _ => None,
        }
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        match self {
            Operand::Literal(_) => {}
            Operand::Value(value) => value.visit_columns_mut(visitor),
            Operand::Query(query) => query.visit_columns_mut(visitor),
        }
    }
}
