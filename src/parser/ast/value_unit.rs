use crate::{
    parser::{ParseError, QueryParser, UNIT_OPS, ast::{ColUnit, UnitOp}},
    schema::CanonicalId,
};

/// A column unit or a binary arithmetic expression over two column units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValUnit {
    pub op: UnitOp,
    pub left: ColUnit,
    pub right: Option<ColUnit>,
}

impl From<ColUnit> for ValUnit {
    fn from(left: ColUnit) -> Self {
        Self { op: UnitOp::None, left, right: None }
    }
}

impl ValUnit {
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Self, ParseError> {
        let is_block = parser.current_is("(");
        if is_block {
            parser.next();
        }

        let left = ColUnit::parse(parser, default_tables)?;
        let mut unit = ValUnit::from(left);

        if parser.current_is_any(&UNIT_OPS) {
            if let Some(op) = parser.current().and_then(|t| UnitOp::try_from(t.text.as_str()).ok()) {
                parser.next();
                unit.op = op;
                unit.right = Some(ColUnit::parse(parser, default_tables)?);
            }
        }

        if is_block && parser.current_is(")") {
            parser.next();
        }

        Ok(unit)
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColUnit> {
        std::iter::once(&self.left).chain(self.right.iter())
    }

    pub fn visit_columns_mut(&mut self, visitor: &mut dyn FnMut(&mut CanonicalId)) {
        self.left.visit_columns_mut(visitor);
        if let Some(right) = self.right.as_mut() {
            right.visit_columns_mut(visitor);
        }
    }
}
