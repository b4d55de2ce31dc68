use indexmap::IndexMap;

use crate::{
    parser::{ParseError, QueryParser, TokenKind, is_reserved,
        ast::{AggOp, ColUnit, UnitOp, ValUnit}},
    schema::CanonicalId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub agg: AggOp,
    pub val_unit: ValUnit,
}

impl SelectItem {
    /// The item as a single value unit, with the item-level aggregate moved
    /// onto its column when that loses nothing (`count(x)` -> `count(x)`
    /// column unit). Used where only value units can appear, like ORDER BY.
    pub fn folded(&self) -> ValUnit {
        if self.agg != AggOp::None && self.val_unit.op == UnitOp::None && self.val_unit.left.agg == AggOp::None {
            return ValUnit::from(ColUnit { agg: self.agg, ..self.val_unit.left.clone() });
        }
        self.val_unit.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    /// Lower-cased alias -> folded value unit of the aliased item.
    pub aliases: IndexMap<String, ValUnit>,
}

impl Select {
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        parser.expect("select", "expected select")?;

        let mut select = Select::default();
        if parser.current_is("distinct") {
            select.distinct = true;
            parser.next();
        }

        while !parser.at_clause_end() {
            let item = Self::parse_item(parser, default_tables)?;

            if let Some(alias) = Self::parse_alias(parser) {
                select.aliases.insert(alias, item.folded());
            }
            select.items.push(item);

            if !parser.current_is(",") {
                break;
            }
            parser.next();
        }

        Ok(select)
    }

    fn parse_item(parser: &mut QueryParser, default_tables: &[String]) -> Result<SelectItem, ParseError> {
        if let Some((open, close)) = ColUnit::wrapped_aggregate(parser) {
            let mut arguments = parser.span(open + 1, close);
            let item = Self::parse_item(&mut arguments, default_tables)?;
            parser.position = close + 1;
            return Ok(item);
        }

        let agg = match ColUnit::aggregate_call(parser) {
            Some(agg) => {
                parser.next();
                agg
            }
            None => AggOp::None,
        };
        let val_unit = ValUnit::parse(parser, default_tables)?;

        Ok(SelectItem { agg, val_unit })
    }

    fn parse_alias(parser: &mut QueryParser) -> Option<String> {
        if parser.current_is("as") {
            parser.next();
            let alias = parser.current().map(|t| t.text.to_lowercase());
            parser.next();
            return alias;
        }

        let alias = parser
            .current()
            .filter(|t| (t.kind == TokenKind::Word && !is_reserved(&t.text)) || t.kind == TokenKind::Literal)
            .map(|t| t.text.to_lowercase());
        if alias.is_some() {
            parser.next();
        }
        alias
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        for item in self.items.iter_mut() {
            item.val_unit.visit_columns_mut(visitor);
        }
        for value in self.aliases.values_mut() {
            value.visit_columns_mut(visitor);
        }
    }
}
