use crate::parser::{ParseError, QueryParser, ast::ColUnit};

pub struct GroupBy;

impl GroupBy {
    pub fn parse(parser: &mut QueryParser, default_tables: &[String]) -> Result<Vec<ColUnit>, ParseError> {
        if !(parser.current_is("group") && parser.peek_is(1, "by")) {
            return Ok(vec![]);
        }
        parser.jump(2);

        let mut columns = vec![];
        loop {
            columns.push(ColUnit::parse(parser, default_tables)?);
            if !parser.current_is(",") {
                break;
            }
            parser.next();
        }

        Ok(columns)
    }
}
