use crate::{
    parser::{JOIN_MODIFIERS, ParseError, QueryParser, is_reserved, table_part,
        ast::{Condition, SqlQuery}},
    schema::CanonicalId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TableUnit {
    Table(CanonicalId),
    Query(Box<SqlQuery>),
}

/// Source tables (or subqueries) in declaration order, with every `ON`
/// predicate joined into one condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FromClause {
    pub table_units: Vec<TableUnit>,
    pub conditions: Condition,
}

impl FromClause {
    /// Parse the clause starting at `FROM`. Also returns the names of the
    /// tables it declares, used to resolve unqualified columns.
    pub fn parse(parser: &mut QueryParser) -> Result<(Self, Vec<String>), ParseError> {
        parser.expect("from", "expected from")?;

        let mut clause = FromClause::default();
        let mut default_tables: Vec<String> = vec![];

        while !parser.eof() {
            if parser.current_is_any(&["join", ","]) || parser.current_is_any(&JOIN_MODIFIERS) {
                parser.next();
                continue;
            }

            if parser.current_is("(") {
                parser.next();
                if !parser.current_is("select") {
                    return ParseError::new("expected a subquery", parser).err();
                }
                let query = SqlQuery::parse(parser)?;
                parser.expect(")", "unclosed subquery")?;
                clause.table_units.push(TableUnit::Query(Box::new(query)));
                Self::skip_alias(parser, None);
            } else {
                let (id, table) = Self::parse_table(parser)?;
                clause.table_units.push(TableUnit::Table(id));
                Self::skip_alias(parser, Some(&table));
                default_tables.push(table);
            }

            if parser.current_is("on") {
                parser.next();
                let condition = Condition::parse(parser, &default_tables)?;
                clause.conditions.append(condition);
            }

            if parser.at_clause_end() {
                break;
            }
        }

        Ok((clause, default_tables))
    }

    fn parse_table(parser: &mut QueryParser) -> Result<(CanonicalId, String), ParseError> {
        let name = match parser.current() {
            Some(token) if token.is_word() => table_part(&token.text).to_string(),
            _ => return ParseError::new("expected a table", parser).err(),
        };
        let id = parser
            .schema
            .resolve_table(&name)
            .map_err(|e| ParseError::new(&e.to_string(), parser))?;
        parser.next();
        Ok((id, name))
    }

    fn skip_alias(parser: &mut QueryParser, table: Option<&str>) {
        if parser.current_is("as") {
            parser.jump(2);
            return;
        }
        let is_alias = parser.current().is_some_and(|t| {
            t.is_word()
                && !is_reserved(&t.text)
                && table.is_none_or(|table| parser.aliases.is_alias_of(&t.text, table))
        });
        if is_alias {
            parser.next();
        }
    }

    pub fn subqueries(&self) -> impl Iterator<Item = &SqlQuery> {
        self.table_units.iter().filter_map(|unit| match unit {
            TableUnit::Query(query) => Some(query.as_ref()),
            TableUnit::Table(_) => None,
        })
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        for unit in self.table_units.iter_mut() {
            if let TableUnit::Query(query) = unit {
                query.visit_columns_mut(visitor);
            }
        }
        self.conditions.visit_columns_mut(visitor);
    }
}
