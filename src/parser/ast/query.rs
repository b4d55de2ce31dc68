use crate::{
    parser::{ParseError, QueryParser, SET_OPS,
        ast::{ColUnit, Condition, FromClause, GroupBy, LimitParser, OrderBy, Select, SetOp}},
    schema::CanonicalId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub op: SetOp,
    pub query: Box<SqlQuery>,
}

/// Canonical tree of one SELECT statement. At most one set operation hangs
/// off a query; chains nest through the right-hand query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlQuery {
    pub select: Select,
    pub from: FromClause,
    pub r#where: Condition,
    pub group_by: Vec<ColUnit>,
    pub having: Condition,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
    pub set_operation: Option<SetOperation>,
}

impl SqlQuery {
    /// Parse one (possibly parenthesized) query at the cursor, followed by
    /// any set operation.
    pub fn parse(parser: &mut QueryParser) -> Result<Self, ParseError> {
        let is_block = parser.current_is("(");
        if is_block {
            parser.next();
        }
        if !parser.current_is("select") {
            return ParseError::new("expected select", parser).err();
        }

        // FROM is parsed first so the select list resolves against its tables
        let select_position = parser.position;
        let Some(from_position) = parser.find_at_depth("from") else {
            return ParseError::new("missing from clause", parser).err();
        };
        parser.position = from_position;
        let (from, default_tables) = FromClause::parse(parser)?;
        let after_from = parser.position;

        parser.position = select_position;
        let select = Select::parse(parser, &default_tables)?;
        if parser.position != from_position {
            return ParseError::new("unexpected token in select list", parser).err();
        }
        parser.position = after_from;

        let r#where = Self::parse_condition(parser, "where", &default_tables)?;
        let group_by = GroupBy::parse(parser, &default_tables)?;
        let having = Self::parse_condition(parser, "having", &default_tables)?;
        let order_by = OrderBy::parse(parser, &default_tables, &select)?;
        let limit = LimitParser::parse(parser);

        while parser.current_is(";") {
            parser.next();
        }
        if is_block {
            parser.expect(")", "unclosed query block")?;
        }

        let mut query = SqlQuery { select, from, r#where, group_by, having, order_by, limit, set_operation: None };

        if parser.current_is_any(&SET_OPS) {
            let op = parser.current().and_then(|t| SetOp::try_from(t.text.as_str()).ok());
            parser.next();
            if parser.current_is("all") {
                parser.next();
            }
            if let Some(op) = op {
                let nested = SqlQuery::parse(parser)?;
                query.set_operation = Some(SetOperation { op, query: Box::new(nested) });
            }
        }

        Ok(query)
    }

    fn parse_condition(parser: &mut QueryParser, keyword: &str, default_tables: &[String]) -> Result<Condition, ParseError> {
        if !parser.current_is(keyword) {
            return Ok(Condition::default());
        }
        parser.next();
        Condition::parse(parser, default_tables)
    }

    pub fn set_query(&self, op: SetOp) -> Option<&SqlQuery> {
        self.set_operation
            .as_ref()
            .filter(|set| set.op == op)
            .map(|set| set.query.as_ref())
    }

    pub fn intersect(&self) -> Option<&SqlQuery> {
        self.set_query(SetOp::Intersect)
    }

    pub fn union(&self) -> Option<&SqlQuery> {
        self.set_query(SetOp::Union)
    }

    pub fn except(&self) -> Option<&SqlQuery> {
        self.set_query(SetOp::Except)
    }

    /// Subqueries used as predicate operands (join, filter and having) and
    /// the set-operation query.
    pub fn nested_queries(&self) -> Vec<&SqlQuery> {
        let mut nested: Vec<&SqlQuery> = self
            .from
            .conditions
            .subqueries()
            .chain(self.r#where.subqueries())
            .chain(self.having.subqueries())
            .collect();
        if let Some(set) = &self.set_operation {
            nested.push(&set.query);
        }
        nested
    }

    /// Apply `visitor` to every column identifier, nested queries included.
    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        self.select.visit_columns_mut(visitor);
        self.from.visit_columns_mut(visitor);
        self.r#where.visit_columns_mut(visitor);
        for column in self.group_by.iter_mut() {
            column.visit_columns_mut(visitor);
        }
        self.having.visit_columns_mut(visitor);
        if let Some(order) = self.order_by.as_mut() {
            order.visit_columns_mut(visitor);
        }
        if let Some(set) = self.set_operation.as_mut() {
            set.query.visit_columns_mut(visitor);
        }
    }
}
