use crate::{
    parser::{COND_OPS, IS_NOT_NULL, ParseError, QueryParser, TokenKind, WHERE_OPS,
        ast::{ColUnit, LogicOp, Operand, SqlQuery, ValUnit, WhereOp}},
    schema::CanonicalId,
};

/// A single comparison: `[NOT] value op first [AND second]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CondUnit {
    pub negated: bool,
    pub op: WhereOp,
    pub val_unit: ValUnit,
    pub first: Option<Operand>,
    pub second: Option<Operand>,
}

/// Flattened predicate list; `connectives[i]` joins `units[i]` and `units[i + 1]`.
/// Parenthesized groups are flattened in textual order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub units: Vec<CondUnit>,
    pub connectives: Vec<LogicOp>,
}

impl CondUnit {
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        if parser.current_is("exists") || (parser.current_is("not") && parser.peek_is(1, "exists")) {
            return Self::parse_exists(parser, default_tables);
        }

        let val_unit = ValUnit::parse(parser, default_tables)?;

        let negated = parser.current_is("not");
        if negated {
            parser.next();
        }

        if parser.current_is(IS_NOT_NULL) {
            parser.next();
            return Ok(CondUnit { negated, op: WhereOp::IsNotNull, val_unit, first: None, second: None });
        }

        let op = parser
            .current()
            .filter(|t| t.kind != TokenKind::Literal)
            .and_then(|t| WhereOp::try_from(t.text.as_str()).ok());
        let Some(op) = op else {
            return ParseError::new("expected a comparison operator", parser).err();
        };
        parser.next();

        let first = Some(Operand::parse(parser, default_tables)?);
        let second = if op == WhereOp::Between {
            parser.expect("and", "between without and")?;
            Some(Operand::parse(parser, default_tables)?)
        } else {
            None
        };

        Ok(CondUnit { negated, op, val_unit, first, second })
    }

    fn parse_exists(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        let negated = parser.current_is("not");
        if negated {
            parser.next();
        }
        parser.next();

        let operand = Operand::parse(parser, default_tables)?;
        if operand.as_query().is_none() {
            return ParseError::new("exists without a subquery", parser).err();
        }

        Ok(CondUnit {
            negated,
            op: WhereOp::Exists,
            val_unit: ValUnit::from(ColUnit::new(parser.schema.resolve_all())),
            first: Some(operand),
            second: None,
        })
    }

    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.first.iter().chain(self.second.iter())
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        self.val_unit.visit_columns_mut(visitor);
        for operand in self.first.iter_mut().chain(self.second.iter_mut()) {
            operand.visit_columns_mut(visitor);
        }
    }
}

impl Condition {
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        let mut condition = Condition::default();
        let mut open_groups = 0usize;

        loop {
            while Self::opens_group(parser) {
                open_groups += 1;
                parser.next();
            }

            condition.units.push(CondUnit::parse(parser, default_tables)?);

            while open_groups > 0 && parser.current_is(")") {
                open_groups -= 1;
                parser.next();
            }

            if !parser.current_is_any(&COND_OPS) {
                break;
            }
            let connective = parser.current().and_then(|t| LogicOp::try_from(t.text.as_str()).ok());
            if let Some(connective) = connective {
                condition.connectives.push(connective);
            }
            parser.next();
        }

        if open_groups > 0 {
            return ParseError::new("unclosed predicate group", parser).err();
        }

        Ok(condition)
    }

    /// `(` opening a group of predicates rather than a subquery or an
    /// arithmetic block.
    fn opens_group(parser: &QueryParser) -> bool {
        if !parser.current_is("(") || parser.peek_is(1, "select") {
            return false;
        }
        let Some(close) = parser.matching_paren(parser.position) else {
            return false;
        };

        let mut depth = 0usize;
        for token in &parser.tokens[parser.position + 1..close] {
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && (token.is_any(&WHERE_OPS) || token.is_any(&COND_OPS)) {
                return true;
            }
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Join `other` onto this condition with `AND`.
    pub fn append(&mut self, other: Condition) {
        if !self.units.is_empty() && !other.units.is_empty() {
            self.connectives.push(LogicOp::And);
        }
        self.units.extend(other.units);
        self.connectives.extend(other.connectives);
    }

    pub fn has_or(&self) -> bool {
        self.connectives.contains(&LogicOp::Or)
    }

    pub fn has_op(&self, op: WhereOp) -> bool {
        self.units.iter().any(|u| u.op == op)
    }

    pub fn subqueries(&self) -> impl Iterator<Item = &SqlQuery> {
        self.units.iter().flat_map(|u| u.operands()).filter_map(Operand::as_query)
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        for unit in self.units.iter_mut() {
            unit.visit_columns_mut(visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{AliasMap, QueryParser, ast::{Condition, Literal, LogicOp, Operand, WhereOp}, tokenize},
        schema::Schema,
    };

    fn parse(sql: &str) -> (Condition, bool) {
        let schema = Schema::build([
            ("patients", vec!["subject_id", "gender", "dob"]),
            ("admissions", vec!["hadm_id", "subject_id", "admission_type"]),
        ])
        .expect("Failed to build schema");
        let aliases = AliasMap::default();
        let tokens = tokenize(sql).expect("Failed to tokenize");
        let mut parser = QueryParser::new(tokens, &schema, &aliases);
        let condition = Condition::parse(&mut parser, &["patients".to_string()]).expect("Failed to parse condition");
        (condition, parser.eof())
    }

    #[test]
    pub fn test_connectives_interleave() {
        let (condition, eof) = parse("gender = 'F' and subject_id > 10 or dob is not null");
        assert!(eof);
        assert_eq!(condition.units.len(), 3);
        assert_eq!(condition.connectives, vec![LogicOp::And, LogicOp::Or]);
        assert_eq!(condition.units[2].op, WhereOp::IsNotNull);
        assert!(condition.units[2].first.is_none());
    }

    #[test]
    pub fn test_between_and_negation() {
        let (condition, eof) = parse("subject_id not between 1 and 5");
        assert!(eof);
        let unit = &condition.units[0];
        assert!(unit.negated);
        assert_eq!(unit.op, WhereOp::Between);
        assert!(unit.second.is_some());
        assert!(condition.connectives.is_empty());
    }

    #[test]
    pub fn test_in_list_and_is_null() {
        let (condition, _) = parse("gender in ('F', 'M') and dob is null");
        match &condition.units[0].first {
            Some(Operand::Literal(Literal::List(items))) => assert_eq!(items.len(), 2),
            other => panic!("unexpected operand {:?}", other),
        }
        assert_eq!(condition.units[1].first, Some(Operand::Literal(Literal::Null)));
    }

    #[test]
    pub fn test_grouped_predicates_are_flattened() {
        let (condition, eof) = parse("(gender = 'F' or gender = 'M') and (subject_id + subject_id) > 3");
        assert!(eof);
        assert_eq!(condition.units.len(), 3);
        assert_eq!(condition.connectives, vec![LogicOp::Or, LogicOp::And]);
    }

    #[test]
    pub fn test_subquery_operand() {
        let (condition, eof) = parse("subject_id in (select subject_id from admissions where admission_type = 'EMERGENCY')");
        assert!(eof);
        assert_eq!(condition.subqueries().count(), 1);
    }

    #[test]
    pub fn test_not_exists() {
        let (condition, eof) = parse("not exists (select hadm_id from admissions)");
        assert!(eof);
        assert!(condition.units[0].negated);
        assert_eq!(condition.units[0].op, WhereOp::Exists);
        assert!(condition.units[0].val_unit.left.column.is_all_columns());
    }

    #[test]
    pub fn test_stops_at_clause_keyword() {
        let (condition, eof) = parse("gender = 'F' order by dob");
        assert!(!eof);
        assert_eq!(condition.units.len(), 1);
    }
}
