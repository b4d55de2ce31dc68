use crate::{
    parser::{ORDER_OPS, ParseError, QueryParser, TokenKind,
        ast::{OrderDirection, Select, ValUnit}},
    schema::CanonicalId,
};

/// ORDER BY items sharing one direction (the last one written wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
    pub direction: OrderDirection,
    pub items: Vec<ValUnit>,
}

impl OrderBy {
    /// Parse an optional ORDER BY. Select aliases and 1-based select
    /// positions are replaced by the select item they name.
    pub fn parse(parser: &mut QueryParser, default_tables: &[String], select: &Select) -> Result<Option<Self>, ParseError> {
        if !(parser.current_is("order") && parser.peek_is(1, "by")) {
            return Ok(None);
        }
        parser.jump(2);

        let mut order = OrderBy::default();
        loop {
            let item = Self::parse_item(parser, default_tables, select)?;
            order.items.push(item);

            if parser.current_is_any(&ORDER_OPS) {
                order.direction = if parser.current_is("desc") { OrderDirection::Desc } else { OrderDirection::Asc };
                parser.next();
            }
            if parser.current_is("nulls") && (parser.peek_is(1, "first") || parser.peek_is(1, "last")) {
                parser.jump(2);
            }

            if !parser.current_is(",") {
                break;
            }
            parser.next();
        }

        Ok(Some(order))
    }

    fn parse_item(parser: &mut QueryParser, default_tables: &[String], select: &Select) -> Result<ValUnit, ParseError> {
        let alias = parser
            .current()
            .filter(|t| matches!(t.kind, TokenKind::Word | TokenKind::Literal))
            .and_then(|t| select.aliases.get(&t.text.to_lowercase()))
            .cloned();
        if let Some(value) = alias {
            parser.next();
            return Ok(value);
        }

        let position = parser
            .current()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text.parse::<usize>());
        match position {
            Some(Ok(position)) => {
                let Some(item) = position.checked_sub(1).and_then(|i| select.items.get(i)) else {
                    return ParseError::new("order position out of range", parser).err();
                };
                parser.next();
                Ok(item.folded())
            }
            Some(Err(_)) => ParseError::new("numeric literal where a column was expected", parser).err(),
            None => ValUnit::parse(parser, default_tables),
        }
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        for item in self.items.iter_mut() {
            item.visit_columns_mut(visitor);
        }
    }
}
